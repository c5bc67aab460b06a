use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Никнейм.
    pub nickname: String,
    /// Email.
    pub email: String,
    /// Роль: `user` или `admin`.
    pub role: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Заголовок.
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// Публичный путь к изображению, например `/public/posts/cat.jpg`.
    pub image: Option<String>,
    /// Количество лайков.
    pub like_count: i32,
    /// Количество комментариев.
    pub comment_count: i32,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Курсор страницы: id последнего элемента полной страницы.
pub struct Cursor {
    /// `None`, если страница неполная или пустая.
    pub after: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Страница курсорного режима.
pub struct CursorPage {
    /// Посты страницы.
    pub data: Vec<Post>,
    /// Курсор.
    pub cursor: Cursor,
    /// Количество постов на странице.
    pub count: usize,
    /// Абсолютная ссылка на следующую страницу.
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Страница постраничного режима (`page`).
pub struct NumberedPage {
    /// Посты страницы.
    pub data: Vec<Post>,
    /// Общее количество постов.
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Ответ `GET /posts`: форма зависит от режима пагинации.
pub enum PostsPage {
    /// Курсорный режим.
    Cursor(CursorPage),
    /// Постраничный режим.
    Numbered(NumberedPage),
}

impl PostsPage {
    /// Посты страницы независимо от режима.
    pub fn posts(&self) -> &[Post] {
        match self {
            PostsPage::Cursor(page) => &page.data,
            PostsPage::Numbered(page) => &page.data,
        }
    }

    /// Ссылка на следующую страницу; есть только в курсорном режиме.
    pub fn next(&self) -> Option<&str> {
        match self {
            PostsPage::Cursor(page) => page.next.as_deref(),
            PostsPage::Numbered(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Направление сортировки по дате создания.
pub enum Order {
    /// По возрастанию.
    Asc,
    /// По убыванию.
    Desc,
}

impl Order {
    /// Значение параметра `order__createdAt`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Параметры `GET /posts`. Незаданные поля не отправляются.
pub struct PostsQuery {
    /// Размер страницы.
    pub take: Option<u32>,
    /// Номер страницы; включает постраничный режим.
    pub page: Option<u32>,
    /// Сортировка по `createdAt`.
    pub order: Option<Order>,
    /// Курсор `where__id__less_than`.
    pub id_less_than: Option<i64>,
    /// Курсор `where__id__more_than`.
    pub id_more_than: Option<i64>,
    /// Дополнительные параметры; сервер переносит их в `next`.
    pub extra: Vec<(String, String)>,
}

impl PostsQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(take) = self.take {
            pairs.push(("take".to_string(), take.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order__createdAt".to_string(), order.as_str().to_string()));
        }
        if let Some(id) = self.id_less_than {
            pairs.push(("where__id__less_than".to_string(), id.to_string()));
        }
        if let Some(id) = self.id_more_than {
            pairs.push(("where__id__more_than".to_string(), id.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}
