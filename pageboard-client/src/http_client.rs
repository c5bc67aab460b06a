use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::models::{Post, PostsPage, PostsQuery, User};

#[derive(Debug, Serialize)]
struct CreateUserRequestDto<'a> {
    nickname: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    author_id: i64,
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpdatePostRequestDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GeneratePostsRequestDto {
    author_id: i64,
}

#[derive(Debug, Deserialize)]
struct GeneratedPostsDto {
    created: usize,
}

#[derive(Debug, Deserialize)]
struct DeletedPostDto {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `pageboard-server`.
pub struct PageboardClient {
    base_url: String,
    client: Client,
}

impl PageboardClient {
    /// Создаёт клиент с базовым URL сервера, например `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> ClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error.unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        ClientError::from_http_status(status, Some(message))
    }

    /// отправляет запрос и разбирает успешный json-ответ
    async fn send<TRes>(request: RequestBuilder) -> ClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request.send().await.map_err(ClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(ClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(&self, method: Method, path: &str, body: &TReq) -> ClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let request = self.client.request(method, self.endpoint(path)).json(body);
        Self::send(request).await
    }

    /// Регистрирует пользователя. Пароль хранится на сервере только в виде хеша.
    pub async fn create_user(&self, nickname: &str, email: &str, password: &str) -> ClientResult<User> {
        let payload = CreateUserRequestDto {
            nickname,
            email,
            password,
        };
        self.send_json(Method::POST, "/users", &payload).await
    }

    /// Возвращает всех пользователей, упорядоченных по id.
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        Self::send(self.client.get(self.endpoint("/users"))).await
    }

    /// Создаёт пост от имени `author_id`.
    pub async fn create_post(
        &self,
        author_id: i64,
        title: &str,
        content: &str,
        image: Option<&str>,
    ) -> ClientResult<Post> {
        let payload = CreatePostRequestDto {
            author_id,
            title,
            content,
            image,
        };
        self.send_json(Method::POST, "/posts", &payload).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> ClientResult<Post> {
        Self::send(self.client.get(self.endpoint(&format!("/posts/{id}")))).await
    }

    /// Частично обновляет пост: отправляются только заданные поля.
    pub async fn update_post(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> ClientResult<Post> {
        let payload = UpdatePostRequestDto { title, content };
        self.send_json(Method::PATCH, &format!("/posts/{id}"), &payload)
            .await
    }

    /// Удаляет пост и возвращает его id.
    pub async fn delete_post(&self, id: i64) -> ClientResult<i64> {
        let dto: DeletedPostDto =
            Self::send(self.client.delete(self.endpoint(&format!("/posts/{id}")))).await?;
        Ok(dto.id)
    }

    /// Генерирует 100 постов для `author_id` и возвращает их количество.
    pub async fn generate_posts(&self, author_id: i64) -> ClientResult<usize> {
        let dto: GeneratedPostsDto = self
            .send_json(
                Method::POST,
                "/posts/random",
                &GeneratePostsRequestDto { author_id },
            )
            .await?;
        Ok(dto.created)
    }

    /// Запрашивает страницу постов.
    ///
    /// С `page` сервер отвечает `NumberedPage`, иначе `CursorPage`.
    pub async fn paginate_posts(&self, query: &PostsQuery) -> ClientResult<PostsPage> {
        let request = self
            .client
            .get(self.endpoint("/posts"))
            .query(&query.to_pairs());
        Self::send(request).await
    }

    /// Запрашивает страницу по абсолютной `next`-ссылке из предыдущего ответа.
    pub async fn follow_next(&self, next: &str) -> ClientResult<PostsPage> {
        let url = Url::parse(next).map_err(|err| ClientError::InvalidUrl(format!("{next}: {err}")))?;
        Self::send(self.client.get(url)).await
    }
}
