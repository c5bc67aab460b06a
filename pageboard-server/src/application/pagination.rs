//! Cursor pagination over post identifiers.
//!
//! A cursor page is self-describing: its `next` link replays every filter and
//! sort parameter of the request it answers and moves only the id bound.

use url::Url;

use crate::data::post_repository::PostFilter;
use crate::domain::pagination::{
    CursorPage, ID_LESS_THAN_KEY, ID_MORE_THAN_KEY, PageCursor, PaginatePostsQuery, SortOrder,
};
use crate::domain::post::Post;

/// Builds the id predicate for a cursor request.
///
/// `where__id__less_than` wins over `where__id__more_than`. A zero bound is
/// treated as absent, so `where__id__more_than=0` reads the first page.
pub(crate) fn cursor_filter(query: &PaginatePostsQuery) -> PostFilter {
    if let Some(bound) = query.id_less_than.filter(|bound| *bound != 0) {
        PostFilter::IdLessThan(bound)
    } else if let Some(bound) = query.id_more_than.filter(|bound| *bound != 0) {
        PostFilter::IdMoreThan(bound)
    } else {
        PostFilter::All
    }
}

/// Query key that carries the cursor of the next page.
pub(crate) fn next_cursor_key(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => ID_MORE_THAN_KEY,
        SortOrder::Desc => ID_LESS_THAN_KEY,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CursorPageAssembler {
    posts_url: Url,
}

impl CursorPageAssembler {
    /// `posts_url` is the absolute URL of the posts listing, e.g.
    /// `http://localhost:3000/posts`.
    pub(crate) fn new(posts_url: Url) -> Self {
        Self { posts_url }
    }

    pub(crate) fn assemble(&self, posts: Vec<Post>, query: &PaginatePostsQuery) -> CursorPage {
        let after = last_item_id(&posts, query.take);
        let next = after.map(|last_id| self.next_url(last_id, query).to_string());

        CursorPage {
            count: posts.len(),
            data: posts,
            cursor: PageCursor { after },
            next,
        }
    }

    fn next_url(&self, last_id: i64, query: &PaginatePostsQuery) -> Url {
        let mut url = self.posts_url.clone();
        url.set_query(None);

        {
            let mut params = url.query_pairs_mut();
            for (key, value) in query.echo_pairs() {
                params.append_pair(key, &value);
            }
            params.append_pair(
                next_cursor_key(query.order_created_at),
                &last_id.to_string(),
            );
        }

        url
    }
}

// Only a full page has a successor; a short page is the end of the data.
fn last_item_id(posts: &[Post], take: u32) -> Option<i64> {
    let is_full = u32::try_from(posts.len()).is_ok_and(|len| len > 0 && len == take);
    if is_full {
        posts.last().map(|post| post.id)
    } else {
        None
    }
}
