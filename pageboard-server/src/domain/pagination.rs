//! Request and response shapes of post pagination.
//!
//! A request arrives as a flat list of query pairs. The recognized keys are
//! parsed into typed fields; every other key is kept verbatim so it can be
//! replayed into the `next` link of a cursor page.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::post::Post;

pub(crate) const TAKE_KEY: &str = "take";
pub(crate) const PAGE_KEY: &str = "page";
pub(crate) const ORDER_CREATED_AT_KEY: &str = "order__createdAt";
pub(crate) const ID_LESS_THAN_KEY: &str = "where__id__less_than";
pub(crate) const ID_MORE_THAN_KEY: &str = "where__id__more_than";

pub(crate) const DEFAULT_TAKE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact upper-case spellings are accepted.
impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(DomainError::Validation {
                field: ORDER_CREATED_AT_KEY,
                message: "must be ASC or DESC",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaginatePostsQuery {
    pub(crate) take: u32,
    /// `take` as it appeared in the query string, echoed into `next`.
    pub(crate) take_raw: Option<String>,
    pub(crate) page: Option<u32>,
    pub(crate) order_created_at: SortOrder,
    pub(crate) id_less_than: Option<i64>,
    pub(crate) id_more_than: Option<i64>,
    /// Unrecognized keys in arrival order; echoed, never interpreted.
    pub(crate) filters: Vec<(String, String)>,
}

impl Default for PaginatePostsQuery {
    fn default() -> Self {
        Self {
            take: DEFAULT_TAKE,
            take_raw: None,
            page: None,
            order_created_at: SortOrder::Asc,
            id_less_than: None,
            id_more_than: None,
            filters: Vec::new(),
        }
    }
}

impl PaginatePostsQuery {
    /// Parses decoded query-string pairs. A repeated recognized key keeps its
    /// last value; repeated passthrough keys are all kept.
    pub(crate) fn from_pairs<I, K, V>(pairs: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::default();

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                TAKE_KEY => {
                    query.take = parse_number(TAKE_KEY, &value)?;
                    query.take_raw = Some(value);
                }
                PAGE_KEY => query.page = Some(parse_number(PAGE_KEY, &value)?),
                ORDER_CREATED_AT_KEY => query.order_created_at = value.parse()?,
                ID_LESS_THAN_KEY => {
                    query.id_less_than = Some(parse_number(ID_LESS_THAN_KEY, &value)?)
                }
                ID_MORE_THAN_KEY => {
                    query.id_more_than = Some(parse_number(ID_MORE_THAN_KEY, &value)?)
                }
                _ => query.filters.push((key, value)),
            }
        }

        Ok(query)
    }

    /// Page number when page-number mode applies; `page=0` counts as absent.
    pub(crate) fn page_number(&self) -> Option<u32> {
        self.page.filter(|page| *page > 0)
    }

    /// Truthy non-cursor parameters of a cursor-mode request, as sent, in a
    /// fixed order: `take`, `order__createdAt`, then passthrough keys.
    /// Absent `take` and order fall back to their defaults.
    pub(crate) fn echo_pairs(&self) -> Vec<(&str, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);

        if self.take > 0 {
            let take = self
                .take_raw
                .clone()
                .unwrap_or_else(|| self.take.to_string());
            pairs.push((TAKE_KEY, take));
        }
        pairs.push((ORDER_CREATED_AT_KEY, self.order_created_at.to_string()));

        for (key, value) in &self.filters {
            if !value.is_empty() {
                pairs.push((key.as_str(), value.clone()));
            }
        }

        pairs
    }
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, DomainError> {
    value.trim().parse().map_err(|_| DomainError::Validation {
        field,
        message: "must be an integer",
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageCursor {
    pub(crate) after: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CursorPage {
    pub(crate) data: Vec<Post>,
    pub(crate) cursor: PageCursor,
    pub(crate) count: usize,
    pub(crate) next: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberedPage {
    pub(crate) data: Vec<Post>,
    pub(crate) total: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PostsPage {
    Cursor(CursorPage),
    Numbered(NumberedPage),
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TAKE, DomainError, PaginatePostsQuery, SortOrder};

    #[test]
    fn from_pairs_defaults_when_empty() {
        let query = PaginatePostsQuery::from_pairs(Vec::<(String, String)>::new())
            .expect("empty query must parse");

        assert_eq!(query.take, DEFAULT_TAKE);
        assert_eq!(query.order_created_at, SortOrder::Asc);
        assert!(query.page.is_none());
        assert!(query.id_less_than.is_none());
        assert!(query.id_more_than.is_none());
    }

    #[test]
    fn from_pairs_parses_recognized_keys_and_keeps_others() {
        let query = PaginatePostsQuery::from_pairs([
            ("take", "5"),
            ("order__createdAt", "DESC"),
            ("where__id__less_than", "40"),
            ("where__likeCount__more_than", "3"),
        ])
        .expect("query must parse");

        assert_eq!(query.take, 5);
        assert_eq!(query.order_created_at, SortOrder::Desc);
        assert_eq!(query.id_less_than, Some(40));
        assert_eq!(
            query.filters,
            vec![("where__likeCount__more_than".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn from_pairs_rejects_non_numeric_take() {
        let err = PaginatePostsQuery::from_pairs([("take", "many")])
            .expect_err("take must be numeric");

        assert!(matches!(err, DomainError::Validation { field: "take", .. }));
    }

    #[test]
    fn from_pairs_rejects_unknown_order() {
        let err = PaginatePostsQuery::from_pairs([("order__createdAt", "SIDEWAYS")])
            .expect_err("order must be ASC or DESC");

        assert!(matches!(
            err,
            DomainError::Validation {
                field: "order__createdAt",
                ..
            }
        ));
    }

    #[test]
    fn from_pairs_rejects_lower_case_order() {
        for value in ["desc", "Asc", " DESC"] {
            let err = PaginatePostsQuery::from_pairs([("order__createdAt", value)])
                .expect_err("order must match exactly");
            assert!(matches!(
                err,
                DomainError::Validation {
                    field: "order__createdAt",
                    ..
                }
            ));
        }
    }

    #[test]
    fn echo_pairs_keep_take_as_sent() {
        let query = PaginatePostsQuery::from_pairs([("take", "02"), ("order__createdAt", "DESC")])
            .expect("query must parse");

        assert_eq!(query.take, 2);
        assert_eq!(
            query.echo_pairs(),
            vec![
                ("take", "02".to_string()),
                ("order__createdAt", "DESC".to_string())
            ]
        );
    }

    #[test]
    fn echo_pairs_never_include_page() {
        let query = PaginatePostsQuery::from_pairs([("page", "0"), ("take", "3")])
            .expect("query must parse");

        let keys: Vec<&str> = query.echo_pairs().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["take", "order__createdAt"]);
    }

    #[test]
    fn page_zero_is_not_a_page_number() {
        let query = PaginatePostsQuery::from_pairs([("page", "0")]).expect("query must parse");
        assert_eq!(query.page, Some(0));
        assert!(query.page_number().is_none());
    }

    #[test]
    fn echo_pairs_skip_falsy_values_and_cursor_bounds() {
        let query = PaginatePostsQuery::from_pairs([
            ("where__id__more_than", "10"),
            ("take", "0"),
            ("tag", ""),
            ("author", "7"),
        ])
        .expect("query must parse");

        let keys: Vec<&str> = query.echo_pairs().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["order__createdAt", "author"]);
    }
}
