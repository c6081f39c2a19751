//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! Entities, the post visibility rules, the ownership guard and the
//! services that orchestrate them. Persistence is reached only through the
//! traits in [`ports`].

pub mod domain;
pub mod error;
pub mod forms;
pub mod guard;
pub mod ports;
pub mod services;
pub mod visibility;

pub use error::DomainError;
pub use services::{AdminService, BlogService, ProfileService};
pub use visibility::{PostQuery, is_visible};
