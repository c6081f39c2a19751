use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Comment;

/// Post entity - a publishable article.
///
/// `is_published` and `pub_date` gate public visibility together with the
/// publication state of the category, see [`crate::visibility::is_visible`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post owned by `author_id`.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: None,
            location_id: None,
            title,
            text,
            image: None,
            pub_date,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}

/// A post annotated with the number of comments attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub comment_count: u64,
}

/// Everything the detail page shows: the post and its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: PostSummary,
    pub comments: Vec<Comment>,
}
