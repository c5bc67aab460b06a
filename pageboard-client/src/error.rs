use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `pageboard-client`.
pub enum ClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Ресурс уже существует (например, занятый nickname или email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Некорректный запрос или ошибка валидации на сервере.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Внутренняя ошибка сервера.
    #[error("server error: {0}")]
    Server(String),

    /// Некорректный URL (базовый адрес или `next`-ссылка).
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Результат операций `pageboard-client`.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
