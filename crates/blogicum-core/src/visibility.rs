//! Public visibility of posts.
//!
//! [`is_visible`] is the single definition of what the public may read.
//! [`PostQuery`] carries that predicate (as `visible_at`) together with the
//! extra equality filters a feed needs, so every store applies the same rule
//! whether it evaluates it in memory or compiles it to SQL.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Location, Post};

/// Whether `post` is publicly visible at `now`.
///
/// `category` is the post's category as currently stored, or `None` when the
/// post has none (or it was deleted).
pub fn is_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published
        && post.pub_date <= now
        && category.is_some_and(|c| post.category_id == Some(c.id) && c.is_published)
}

/// Filter over posts understood by every [`crate::ports::PostRepository`].
///
/// Results are always ordered by `pub_date` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Restrict to posts publicly visible at this instant.
    pub visible_at: Option<DateTime<Utc>>,
    pub post_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Raw `is_published` flag, independent of the visibility rule.
    pub is_published: Option<bool>,
    /// Case-insensitive match on post title, category title or slug, and
    /// location name.
    pub search: Option<String>,
}

impl PostQuery {
    /// Every post regardless of visibility.
    pub fn all() -> Self {
        Self::default()
    }

    /// Posts the public may see at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, post_id: Uuid) -> Self {
        self.post_id = Some(post_id);
        self
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    /// Blank terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    /// Evaluate the query against one post and its resolved references.
    pub fn matches(
        &self,
        post: &Post,
        category: Option<&Category>,
        location: Option<&Location>,
    ) -> bool {
        if let Some(now) = self.visible_at {
            if !is_visible(post, category, now) {
                return false;
            }
        }
        if self.post_id.is_some_and(|id| post.id != id) {
            return false;
        }
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        if self.category_id.is_some() && post.category_id != self.category_id {
            return false;
        }
        if self.is_published.is_some_and(|flag| post.is_published != flag) {
            return false;
        }
        match &self.search {
            Some(term) => search_matches(term, post, category, location),
            None => true,
        }
    }
}

fn search_matches(
    term: &str,
    post: &Post,
    category: Option<&Category>,
    location: Option<&Location>,
) -> bool {
    let needle = term.to_lowercase();
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

    hit(&post.title)
        || category.is_some_and(|c| hit(&c.title) || hit(&c.slug))
        || location.is_some_and(|l| hit(&l.name))
}
