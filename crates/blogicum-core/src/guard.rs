//! Request-level permission checks.
//!
//! Every mutating service operation calls these explicitly, first thing,
//! before any validation or persistence happens.

use uuid::Uuid;

use crate::domain::{Comment, Post, Requester};
use crate::error::DomainError;

/// Content that belongs to exactly one author.
pub trait Authored {
    fn author_id(&self) -> Uuid;

    /// The post whose public page represents this content.
    fn post_id(&self) -> Uuid;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn post_id(&self) -> Uuid {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn post_id(&self) -> Uuid {
        self.post_id
    }
}

/// Reject anonymous callers.
pub fn require_auth(requester: Option<&Requester>) -> Result<&Requester, DomainError> {
    requester.ok_or(DomainError::Unauthorized)
}

/// Reject anyone but the author of `resource`.
///
/// The error names the post whose detail view the caller is sent to.
pub fn require_owner<R: Authored>(resource: &R, requester: &Requester) -> Result<(), DomainError> {
    if resource.author_id() == requester.user_id {
        return Ok(());
    }

    tracing::warn!(
        user_id = %requester.user_id,
        post_id = %resource.post_id(),
        "Mutation attempted on content owned by another user"
    );
    Err(DomainError::Forbidden {
        post_id: resource.post_id(),
    })
}

/// Reject anonymous and non-staff callers.
pub fn require_staff(requester: Option<&Requester>) -> Result<&Requester, DomainError> {
    let requester = require_auth(requester)?;
    if !requester.is_staff {
        return Err(DomainError::PermissionDenied);
    }
    Ok(requester)
}
