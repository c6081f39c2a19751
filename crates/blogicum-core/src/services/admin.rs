use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Page, PageRequest, Post, PostSummary, Requester};
use crate::error::DomainError;
use crate::forms::{CategoryForm, LocationForm, PublicationForm};
use crate::guard::require_staff;
use crate::ports::Repositories;
use crate::visibility::PostQuery;

/// Filters for the staff post listing.
#[derive(Debug, Clone, Default)]
pub struct AdminPostFilter {
    pub search: Option<String>,
    pub is_published: Option<bool>,
}

impl AdminPostFilter {
    fn into_query(self) -> PostQuery {
        let mut query = PostQuery::all();
        if let Some(term) = self.search {
            query = query.search(term);
        }
        if let Some(flag) = self.is_published {
            query = query.published(flag);
        }
        query
    }
}

/// Staff-only management of shared references and moderation.
#[derive(Clone)]
pub struct AdminService {
    repos: Repositories,
}

impl AdminService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_categories(
        &self,
        requester: Option<&Requester>,
    ) -> Result<Vec<Category>, DomainError> {
        require_staff(requester)?;
        Ok(self.repos.categories.list(false).await?)
    }

    pub async fn create_category(
        &self,
        requester: Option<&Requester>,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        require_staff(requester)?;
        form.validate()?;
        self.ensure_slug_free(&form.slug, None).await?;

        let category = Category::new(form.title, form.description, form.slug, form.is_published);
        let category = self.repos.categories.insert(category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        requester: Option<&Requester>,
        category_id: Uuid,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        require_staff(requester)?;
        let mut category = self.load_category(category_id).await?;
        form.validate()?;
        self.ensure_slug_free(&form.slug, Some(category_id)).await?;

        category.title = form.title;
        category.description = form.description;
        category.slug = form.slug;
        category.is_published = form.is_published;

        Ok(self.repos.categories.update(category).await?)
    }

    /// Posts in the category stay, with their category cleared.
    pub async fn delete_category(
        &self,
        requester: Option<&Requester>,
        category_id: Uuid,
    ) -> Result<(), DomainError> {
        require_staff(requester)?;
        let category = self.load_category(category_id).await?;
        self.repos.categories.delete(category.id).await?;
        tracing::info!(category_id = %category.id, "Category deleted");
        Ok(())
    }

    pub async fn list_locations(
        &self,
        requester: Option<&Requester>,
    ) -> Result<Vec<Location>, DomainError> {
        require_staff(requester)?;
        Ok(self.repos.locations.list(false).await?)
    }

    pub async fn create_location(
        &self,
        requester: Option<&Requester>,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        require_staff(requester)?;
        form.validate()?;

        let location = self
            .repos
            .locations
            .insert(Location::new(form.name, form.is_published))
            .await?;
        tracing::info!(location_id = %location.id, "Location created");
        Ok(location)
    }

    pub async fn update_location(
        &self,
        requester: Option<&Requester>,
        location_id: Uuid,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        require_staff(requester)?;
        let mut location = self.load_location(location_id).await?;
        form.validate()?;

        location.name = form.name;
        location.is_published = form.is_published;
        Ok(self.repos.locations.update(location).await?)
    }

    /// Posts at the location stay, with their location cleared.
    pub async fn delete_location(
        &self,
        requester: Option<&Requester>,
        location_id: Uuid,
    ) -> Result<(), DomainError> {
        require_staff(requester)?;
        let location = self.load_location(location_id).await?;
        self.repos.locations.delete(location.id).await?;
        tracing::info!(location_id = %location.id, "Location deleted");
        Ok(())
    }

    /// Every post, visible or not, newest `pub_date` first.
    pub async fn list_posts(
        &self,
        requester: Option<&Requester>,
        filter: AdminPostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        require_staff(requester)?;
        let posts = self.repos.posts.list(&filter.into_query(), page).await?;
        super::ensure_in_range(posts)
    }

    pub async fn set_post_publication(
        &self,
        requester: Option<&Requester>,
        post_id: Uuid,
        form: PublicationForm,
    ) -> Result<Post, DomainError> {
        require_staff(requester)?;
        let mut post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        post.is_published = form.is_published;
        post.pub_date = form.pub_date;

        let post = self.repos.posts.update(post).await?;
        tracing::info!(
            post_id = %post.id,
            is_published = post.is_published,
            pub_date = %post.pub_date,
            "Post publication changed"
        );
        Ok(post)
    }

    pub async fn set_comment_published(
        &self,
        requester: Option<&Requester>,
        comment_id: Uuid,
        is_published: bool,
    ) -> Result<Comment, DomainError> {
        require_staff(requester)?;
        let mut comment = self
            .repos
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        comment.is_published = is_published;
        Ok(self.repos.comments.update(comment).await?)
    }

    /// Removes the user along with every post and comment they wrote.
    pub async fn delete_user(
        &self,
        requester: Option<&Requester>,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        require_staff(requester)?;
        if self.repos.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("user", user_id));
        }
        self.repos.users.delete(user_id).await?;
        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, owner: Option<Uuid>) -> Result<(), DomainError> {
        match self.repos.categories.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(format!(
                "Category with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }

    async fn load_category(&self, category_id: Uuid) -> Result<Category, DomainError> {
        self.repos
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", category_id))
    }

    async fn load_location(&self, location_id: Uuid) -> Result<Location, DomainError> {
        self.repos
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| DomainError::not_found("location", location_id))
    }
}
