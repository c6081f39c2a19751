//! # Blogicum Shared
//!
//! Wire types of the HTTP API, kept free of server-side dependencies so a
//! client can depend on them directly.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, PageResponse};
