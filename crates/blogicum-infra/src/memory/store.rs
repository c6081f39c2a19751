//! A single in-memory store implementing every repository port.
//!
//! Rows live in insertion-ordered vectors behind one async `RwLock`, so
//! cascades touching several tables happen under a single write lock.
//! Unique and foreign-key rules match the Postgres schema.
//! Note: Data is lost on process restart.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    Category, Comment, Location, Page, PageRequest, Post, PostSummary, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    Repositories, UserRepository,
};
use blogicum_core::visibility::PostQuery;

trait Row: Clone {
    fn id(&self) -> Uuid;
}

impl Row for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Row for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Row for Location {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Row for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Row for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn find<T: Row>(rows: &[T], id: Uuid) -> Option<T> {
    rows.iter().find(|r| r.id() == id).cloned()
}

fn insert<T: Row>(rows: &mut Vec<T>, row: T) -> Result<T, RepoError> {
    if rows.iter().any(|r| r.id() == row.id()) {
        return Err(RepoError::Constraint(format!("duplicate key {}", row.id())));
    }
    rows.push(row.clone());
    Ok(row)
}

fn replace<T: Row>(rows: &mut [T], row: T) -> Result<T, RepoError> {
    let slot = rows
        .iter_mut()
        .find(|r| r.id() == row.id())
        .ok_or(RepoError::NotFound)?;
    *slot = row.clone();
    Ok(row)
}

fn remove<T: Row>(rows: &mut Vec<T>, id: Uuid) -> Result<(), RepoError> {
    let before = rows.len();
    rows.retain(|r| r.id() != id);
    if rows.len() == before {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Tables {
    fn check_unique_username(&self, user: &User) -> Result<(), RepoError> {
        if self
            .users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        Ok(())
    }

    fn check_unique_slug(&self, category: &Category) -> Result<(), RepoError> {
        if self
            .categories
            .iter()
            .any(|c| c.slug == category.slug && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                category.slug
            )));
        }
        Ok(())
    }

    fn check_post_references(&self, post: &Post) -> Result<(), RepoError> {
        let missing = |what: &str, id: Uuid| RepoError::Constraint(format!("{what} {id} missing"));

        if !self.users.iter().any(|u| u.id == post.author_id) {
            return Err(missing("author", post.author_id));
        }
        if let Some(id) = post.category_id {
            if !self.categories.iter().any(|c| c.id == id) {
                return Err(missing("category", id));
            }
        }
        if let Some(id) = post.location_id {
            if !self.locations.iter().any(|l| l.id == id) {
                return Err(missing("location", id));
            }
        }
        Ok(())
    }

    fn check_comment_references(&self, comment: &Comment) -> Result<(), RepoError> {
        if !self.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} missing",
                comment.post_id
            )));
        }
        if !self.users.iter().any(|u| u.id == comment.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} missing",
                comment.author_id
            )));
        }
        Ok(())
    }

    /// Matching posts, newest `pub_date` first, with published comment counts.
    fn summaries(&self, query: &PostQuery) -> Vec<PostSummary> {
        let mut matched: Vec<&Post> = self
            .posts
            .iter()
            .filter(|post| {
                let category = post
                    .category_id
                    .and_then(|id| self.categories.iter().find(|c| c.id == id));
                let location = post
                    .location_id
                    .and_then(|id| self.locations.iter().find(|l| l.id == id));
                query.matches(post, category, location)
            })
            .collect();

        matched.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        matched
            .into_iter()
            .map(|post| PostSummary {
                comment_count: self
                    .comments
                    .iter()
                    .filter(|c| c.post_id == post.id && c.is_published)
                    .count() as u64,
                post: post.clone(),
            })
            .collect()
    }

    fn delete_post_cascade(&mut self, post_id: Uuid) {
        self.posts.retain(|p| p.id != post_id);
        self.comments.retain(|c| c.post_id != post_id);
    }
}

/// In-memory blog store.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out this store behind every port.
    pub fn repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            categories: self.clone(),
            locations: self.clone(),
            posts: self.clone(),
            comments: self,
        }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(find(&self.tables.read().await.users, id))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_username(&user)?;
        insert(&mut tables.users, user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_username(&user)?;
        replace(&mut tables.users, user)
    }

    /// Cascades to the user's posts (and their comments) and comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.users, id)?;

        let owned: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.delete_post_cascade(post_id);
        }
        tables.comments.retain(|c| c.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(find(&self.tables.read().await.categories, id))
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_slug(&category)?;
        insert(&mut tables.categories, category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_unique_slug(&category)?;
        replace(&mut tables.categories, category)
    }

    /// Posts keep existing with the category cleared.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.categories, id)?;
        for post in tables.posts.iter_mut().filter(|p| p.category_id == Some(id)) {
            post.category_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| !published_only || c.is_published)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.created_at);
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(find(&self.tables.read().await.locations, id))
    }

    async fn insert(&self, location: Location) -> Result<Location, RepoError> {
        insert(&mut self.tables.write().await.locations, location)
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        replace(&mut self.tables.write().await.locations, location)
    }

    /// Posts keep existing with the location cleared.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.locations, id)?;
        for post in tables.posts.iter_mut().filter(|p| p.location_id == Some(id)) {
            post.location_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryBlogStore {
    async fn list(&self, published_only: bool) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .iter()
            .filter(|l| !published_only || l.is_published)
            .cloned()
            .collect();
        locations.sort_by_key(|l| l.created_at);
        Ok(locations)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(find(&self.tables.read().await.posts, id))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_references(&post)?;
        insert(&mut tables.posts, post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_references(&post)?;
        replace(&mut tables.posts, post)
    }

    /// Cascades to the post's comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if find(&tables.posts, id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.delete_post_cascade(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Page::from_all(tables.summaries(query), page))
    }

    async fn find_one(&self, query: &PostQuery) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.summaries(query).into_iter().next())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(find(&self.tables.read().await.comments, id))
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_comment_references(&comment)?;
        insert(&mut tables.comments, comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_comment_references(&comment)?;
        replace(&mut tables.comments, comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove(&mut self.tables.write().await.comments, id)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && (!published_only || c.is_published))
            .cloned()
            .collect();
        // Stable: equal timestamps keep insertion order.
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}
