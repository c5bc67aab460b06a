use axum::{Json, Router, routing::get};
use serde::Serialize;

use super::AppState;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use url::Url;

    use super::router;
    use crate::application::posts_service::PostsService;
    use crate::application::users_service::UsersService;
    use crate::data::post_repository::PostRepository;
    use crate::data::user_repository::UserRepository;
    use crate::presentation::AppState;
    use crate::test_support::{InMemoryPostRepository, InMemoryUserRepository, test_assembler};

    fn app(posts: InMemoryPostRepository) -> Router {
        let posts: Arc<dyn PostRepository> = Arc::new(posts);
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());
        let state = AppState::new(
            Arc::new(PostsService::new(posts, test_assembler())),
            Arc::new(UsersService::new(users)),
        );
        router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request must build");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body must be json")
        };
        (status, value)
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["data"]
            .as_array()
            .expect("data must be an array")
            .iter()
            .map(|post| post["id"].as_i64().expect("id must be a number"))
            .collect()
    }

    fn relative(next: &Value) -> String {
        let url = Url::parse(next.as_str().expect("next must be a string"))
            .expect("next must be absolute");
        format!("{}?{}", url.path(), url.query().unwrap_or_default())
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let app = app(InMemoryPostRepository::default());
        let (status, body) = send(&app, "GET", "/healthz", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn cursor_pages_walk_to_the_end_through_next_links() {
        let app = app(InMemoryPostRepository::with_posts(5));

        let (status, first) = send(&app, "GET", "/posts?take=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(first["cursor"], json!({ "after": 2 }));
        assert_eq!(first["count"], json!(2));
        assert_eq!(
            first["next"],
            json!("http://localhost:3000/posts?take=2&order__createdAt=ASC&where__id__more_than=2")
        );

        let (_, second) = send(&app, "GET", &relative(&first["next"]), None).await;
        assert_eq!(ids(&second), vec![3, 4]);
        assert_eq!(second["cursor"], json!({ "after": 4 }));

        let (_, last) = send(&app, "GET", &relative(&second["next"]), None).await;
        assert_eq!(ids(&last), vec![5]);
        assert_eq!(last["cursor"], json!({ "after": null }));
        assert_eq!(last["count"], json!(1));
        assert_eq!(last["next"], Value::Null);
    }

    #[tokio::test]
    async fn descending_pages_continue_below_the_last_id() {
        let app = app(InMemoryPostRepository::with_posts(5));

        let (status, body) = send(&app, "GET", "/posts?take=2&order__createdAt=DESC", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![5, 4]);
        assert_eq!(
            body["next"],
            json!("http://localhost:3000/posts?take=2&order__createdAt=DESC&where__id__less_than=4")
        );
    }

    #[tokio::test]
    async fn passthrough_keys_are_echoed_and_old_cursor_is_replaced() {
        let app = app(InMemoryPostRepository::with_posts(5));

        let (_, body) = send(
            &app,
            "GET",
            "/posts?take=2&tag=rust&where__id__more_than=1",
            None,
        )
        .await;

        assert_eq!(ids(&body), vec![2, 3]);
        assert_eq!(
            body["next"],
            json!("http://localhost:3000/posts?take=2&order__createdAt=ASC&tag=rust&where__id__more_than=3")
        );
    }

    #[tokio::test]
    async fn next_link_repeats_take_as_sent() {
        let app = app(InMemoryPostRepository::with_posts(5));

        let (_, body) = send(&app, "GET", "/posts?take=02", None).await;

        assert_eq!(ids(&body), vec![1, 2]);
        assert_eq!(
            body["next"],
            json!("http://localhost:3000/posts?take=02&order__createdAt=ASC&where__id__more_than=2")
        );
    }

    #[tokio::test]
    async fn page_number_mode_returns_total_without_cursor() {
        let app = app(InMemoryPostRepository::with_posts(5));

        let (status, body) = send(&app, "GET", "/posts?take=2&page=2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![3, 4]);
        assert_eq!(body["total"], json!(5));
        assert!(body.get("next").is_none());
        assert!(body.get("cursor").is_none());
    }

    #[tokio::test]
    async fn malformed_query_values_are_rejected() {
        let app = app(InMemoryPostRepository::with_posts(5));

        for uri in [
            "/posts?take=abc",
            "/posts?order__createdAt=sideways",
            "/posts?order__createdAt=desc",
            "/posts?where__id__more_than=x",
            "/posts?take=101",
        ] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_internal_error() {
        let repo = InMemoryPostRepository::with_posts(5);
        repo.fail_reads();
        let app = app(repo);

        let (status, body) = send(&app, "GET", "/posts", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[tokio::test]
    async fn post_crud_round() {
        let app = app(InMemoryPostRepository::with_posts(1));

        let (status, created) = send(
            &app,
            "POST",
            "/posts",
            Some(json!({ "author_id": 1, "title": "Hello", "content": "World", "image": "cat.jpg" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], json!(2));
        assert_eq!(created["like_count"], json!(0));
        assert_eq!(created["comment_count"], json!(0));
        assert_eq!(created["image"], json!("/public/posts/cat.jpg"));

        let (status, updated) = send(
            &app,
            "PATCH",
            "/posts/2",
            Some(json!({ "title": "Renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], json!("Renamed"));
        assert_eq!(updated["content"], json!("World"));

        let (status, deleted) = send(&app, "DELETE", "/posts/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({ "id": 2 }));

        let (status, _) = send(&app, "GET", "/posts/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_post_rejects_empty_title() {
        let app = app(InMemoryPostRepository::default());

        let (status, _) = send(
            &app,
            "POST",
            "/posts",
            Some(json!({ "author_id": 1, "title": "", "content": "World" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn random_posts_are_generated_for_author() {
        let repo = InMemoryPostRepository::with_posts(5);
        let app = app(repo.clone());

        let (status, body) = send(&app, "POST", "/posts/random", Some(json!({ "author_id": 1 }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "created": 100 }));
        assert_eq!(repo.snapshot().len(), 105);
    }

    #[tokio::test]
    async fn users_are_created_and_listed_without_password() {
        let app = app(InMemoryPostRepository::default());
        let payload = json!({ "nickname": "reader", "email": "reader@example.com", "password": "secret1" });

        let (status, created) = send(&app, "POST", "/users", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["nickname"], json!("reader"));
        assert_eq!(created["role"], json!("user"));
        assert!(created.get("password").is_none());
        assert!(created.get("password_hash").is_none());

        let (status, _) = send(&app, "POST", "/users", Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, listed) = send(&app, "GET", "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_email() {
        let app = app(InMemoryPostRepository::default());

        let (status, _) = send(
            &app,
            "POST",
            "/users",
            Some(json!({ "nickname": "reader", "email": "not-an-email", "password": "secret1" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
