use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Public folder that post images are served from.
pub(crate) const POST_PUBLIC_IMAGE_PATH: &str = "public/posts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
    pub(crate) like_count: i32,
    pub(crate) comment_count: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("author_id", self.author_id)?;
        Ok(Self {
            author_id: self.author_id,
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            image: normalize_image(self.image),
        })
    }
}

/// Partial update: blank or missing fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let title = match non_blank(self.title) {
            Some(title) => Some(normalize_title(&title)?),
            None => None,
        };
        let content = non_blank(self.content);

        Ok(Self { title, content })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        author_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            author_id,
            title,
            content,
            image: None,
            like_count: 0,
            comment_count: 0,
            created_at,
            updated_at,
        })
    }

    pub(crate) fn with_image(mut self, image: Option<String>) -> Self {
        self.image = normalize_image(image);
        self
    }

    pub(crate) fn with_counters(
        mut self,
        like_count: i32,
        comment_count: i32,
    ) -> Result<Self, DomainError> {
        if like_count < 0 {
            return Err(DomainError::Validation {
                field: "like_count",
                message: "must be >= 0",
            });
        }
        if comment_count < 0 {
            return Err(DomainError::Validation {
                field: "comment_count",
                message: "must be >= 0",
            });
        }
        self.like_count = like_count;
        self.comment_count = comment_count;
        Ok(self)
    }

    /// Image reference as exposed to clients, e.g. `/public/posts/cat.jpg`.
    pub(crate) fn public_image_path(&self) -> Option<String> {
        self.image
            .as_deref()
            .map(|image| format!("/{POST_PUBLIC_IMAGE_PATH}/{image}"))
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_image(image: Option<String>) -> Option<String> {
    non_blank(image)
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}
