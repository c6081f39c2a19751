use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Page, PageRequest, Post, PostSummary, User};
use crate::error::RepoError;
use crate::visibility::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite every column of an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Dependent rows follow the schema rules: posts and comments of a
    /// deleted user or post are removed, posts of a deleted category or
    /// location lose the reference.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Categories in creation order.
    async fn list(&self, published_only: bool) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// Locations in creation order.
    async fn list(&self, published_only: bool) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
///
/// Both query methods must honour every field of [`PostQuery`], including
/// the visibility rule carried by `visible_at`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Matching posts with comment counts, newest `pub_date` first.
    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError>;

    /// The first matching post with its comment count.
    async fn find_one(&self, query: &PostQuery) -> Result<Option<PostSummary>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first.
    async fn list_for_post(
        &self,
        post_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<Comment>, RepoError>;
}

/// The full set of stores a service needs.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
