//! Клиентская библиотека для работы с pageboard-server по HTTP.
//!
//! `PageboardClient` покрывает пользователей, CRUD постов и оба режима
//! пагинации `GET /posts`: курсорный (`next`-ссылки) и постраничный
//! (`page` + `total`).
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{ClientError, ClientResult};
pub use http_client::PageboardClient;
pub use models::{Cursor, CursorPage, NumberedPage, Order, Post, PostsPage, PostsQuery, User};
