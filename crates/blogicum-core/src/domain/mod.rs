//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod page;
mod post;
mod requester;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use location::Location;
pub use page::{DEFAULT_PER_PAGE, Page, PageRequest};
pub use post::{Post, PostDetail, PostSummary};
pub use requester::Requester;
pub use user::User;
