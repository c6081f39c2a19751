//! Services - the operations the presentation layer calls.
//!
//! Each operation receives the requester (and the current time where
//! visibility matters) explicitly and runs its permission checks before
//! touching any input.

mod admin;
mod blog;
mod profile;

pub use admin::{AdminPostFilter, AdminService};
pub use blog::BlogService;
pub use profile::ProfileService;

use crate::domain::Page;
use crate::error::DomainError;

/// Pages past the end of a non-empty feed do not exist.
fn ensure_in_range<T>(page: Page<T>) -> Result<Page<T>, DomainError> {
    if page.in_range() {
        Ok(page)
    } else {
        Err(DomainError::not_found("page", page.page))
    }
}
