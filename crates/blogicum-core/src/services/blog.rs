use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ensure_in_range;
use crate::domain::{
    Category, Comment, Location, Page, PageRequest, Post, PostDetail, PostSummary, Requester,
    User,
};
use crate::error::DomainError;
use crate::forms::{CommentForm, PostForm};
use crate::guard::{require_auth, require_owner};
use crate::ports::Repositories;
use crate::visibility::PostQuery;

/// Feeds, post detail and the author-facing post and comment mutations.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Home feed.
    pub async fn list_public_posts(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        let posts = self.repos.posts.list(&PostQuery::public(now), page).await?;
        ensure_in_range(posts)
    }

    /// Feed of one published category.
    pub async fn list_posts_by_category(
        &self,
        slug: &str,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(Category, Page<PostSummary>), DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let query = PostQuery::public(now).in_category(category.id);
        let posts = self.repos.posts.list(&query, page).await?;
        Ok((category, ensure_in_range(posts)?))
    }

    /// Profile feed: everything for the owner, the public view for others.
    pub async fn list_posts_by_author(
        &self,
        username: &str,
        requester: Option<&Requester>,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(User, Page<PostSummary>), DomainError> {
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let is_owner = requester.is_some_and(|r| r.user_id == author.id);
        let query = if is_owner {
            PostQuery::all()
        } else {
            PostQuery::public(now)
        }
        .by_author(author.id);

        let posts = self.repos.posts.list(&query, page).await?;
        Ok((author, ensure_in_range(posts)?))
    }

    /// A single post with its published comments.
    ///
    /// Authors always see their own posts; everyone else only visible ones.
    pub async fn get_post_detail(
        &self,
        post_id: Uuid,
        requester: Option<&Requester>,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self
            .repos
            .posts
            .find_one(&PostQuery::all().with_id(post_id))
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let is_author = requester.is_some_and(|r| r.user_id == post.post.author_id);
        let post = if is_author {
            post
        } else {
            self.find_visible(post_id, now).await?
        };

        let comments = self.repos.comments.list_for_post(post_id, true).await?;
        Ok(PostDetail { post, comments })
    }

    pub async fn create_post(
        &self,
        requester: Option<&Requester>,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let requester = require_auth(requester)?;
        form.validate()?;
        self.check_references(&form).await?;

        let mut post = Post::new(
            requester.user_id,
            form.title.clone(),
            form.text.clone(),
            form.pub_date,
        );
        apply_form(&mut post, form);

        let post = self.repos.posts.insert(post).await?;
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        requester: Option<&Requester>,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let requester = require_auth(requester)?;
        let mut post = self.load_post(post_id).await?;
        require_owner(&post, requester)?;

        form.validate()?;
        self.check_references(&form).await?;
        apply_form(&mut post, form);

        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    /// Deletes the post together with its comments.
    pub async fn delete_post(
        &self,
        post_id: Uuid,
        requester: Option<&Requester>,
    ) -> Result<(), DomainError> {
        let requester = require_auth(requester)?;
        let post = self.load_post(post_id).await?;
        require_owner(&post, requester)?;

        self.repos.posts.delete(post.id).await?;
        tracing::info!(post_id = %post.id, "Post deleted");
        Ok(())
    }

    /// Comment on a publicly visible post.
    ///
    /// The target always goes through the public filter, so not even the
    /// post's author can comment on it while it is hidden.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        requester: Option<&Requester>,
        form: CommentForm,
        now: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        let requester = require_auth(requester)?;
        let post = self.find_visible(post_id, now).await?;
        form.validate()?;

        let comment = Comment::new(post.post.id, requester.user_id, form.text);
        let comment = self.repos.comments.insert(comment).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: Option<&Requester>,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let requester = require_auth(requester)?;
        let mut comment = self.load_comment(post_id, comment_id).await?;
        require_owner(&comment, requester)?;

        form.validate()?;
        comment.text = form.text;

        let comment = self.repos.comments.update(comment).await?;
        tracing::info!(comment_id = %comment.id, "Comment updated");
        Ok(comment)
    }

    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: Option<&Requester>,
    ) -> Result<(), DomainError> {
        let requester = require_auth(requester)?;
        let comment = self.load_comment(post_id, comment_id).await?;
        require_owner(&comment, requester)?;

        self.repos.comments.delete(comment.id).await?;
        tracing::info!(comment_id = %comment.id, "Comment deleted");
        Ok(())
    }

    /// Categories offered to authors.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list(true).await?)
    }

    /// Locations offered to authors.
    pub async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.repos.locations.list(true).await?)
    }

    async fn find_visible(
        &self,
        post_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PostSummary, DomainError> {
        self.repos
            .posts
            .find_one(&PostQuery::public(now).with_id(post_id))
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn load_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// A comment is only addressable under the post it belongs to.
    async fn load_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }

    async fn check_references(&self, form: &PostForm) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        if let Some(category_id) = form.category_id {
            if self.repos.categories.find_by_id(category_id).await?.is_none() {
                errors.push(format!("category {category_id} does not exist"));
            }
        }
        if let Some(location_id) = form.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                errors.push(format!("location {location_id} does not exist"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}

fn apply_form(post: &mut Post, form: PostForm) {
    post.title = form.title;
    post.text = form.text;
    post.image = form.image;
    post.pub_date = form.pub_date;
    post.location_id = form.location_id;
    post.category_id = form.category_id;
}
