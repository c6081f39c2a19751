//! Shared fixtures for service tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use blogicum_core::domain::{Category, Location, Post, Requester, User};
use blogicum_core::forms::PostForm;
use blogicum_core::ports::{BaseRepository, Repositories};
use blogicum_core::{AdminService, BlogService};
use blogicum_infra::InMemoryBlogStore;

pub struct World {
    pub repos: Repositories,
    pub blog: BlogService,
    pub admin: AdminService,
    pub now: DateTime<Utc>,
}

impl World {
    pub fn new() -> Self {
        let repos = Arc::new(InMemoryBlogStore::new()).repositories();
        Self {
            blog: BlogService::new(repos.clone()),
            admin: AdminService::new(repos.clone()),
            repos,
            now: Utc::now(),
        }
    }

    pub fn yesterday(&self) -> DateTime<Utc> {
        self.now - TimeDelta::days(1)
    }

    pub fn tomorrow(&self) -> DateTime<Utc> {
        self.now + TimeDelta::days(1)
    }

    pub async fn user(&self, username: &str) -> (User, Requester) {
        let user = self
            .repos
            .users
            .insert(User::new(
                username.to_string(),
                format!("{username}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap();
        let requester = Requester::from(&user);
        (user, requester)
    }

    pub async fn staff(&self, username: &str) -> Requester {
        let (_, requester) = self.user(username).await;
        requester.staff()
    }

    pub async fn category(&self, slug: &str, is_published: bool) -> Category {
        self.repos
            .categories
            .insert(Category::new(
                slug.to_uppercase(),
                format!("About {slug}"),
                slug.to_string(),
                is_published,
            ))
            .await
            .unwrap()
    }

    pub async fn location(&self, name: &str) -> Location {
        self.repos
            .locations
            .insert(Location::new(name.to_string(), true))
            .await
            .unwrap()
    }

    /// Insert a post directly, bypassing the service.
    pub async fn post(
        &self,
        author: &User,
        category: Option<&Category>,
        pub_date: DateTime<Utc>,
        is_published: bool,
    ) -> Post {
        let mut post = Post::new(
            author.id,
            format!("Post by {}", author.username),
            "Body".to_string(),
            pub_date,
        );
        post.category_id = category.map(|c| c.id);
        post.is_published = is_published;
        self.repos.posts.insert(post).await.unwrap()
    }

    pub async fn visible_post(&self, author: &User, category: &Category) -> Post {
        self.post(author, Some(category), self.yesterday(), true).await
    }
}

pub fn post_form(category: &Category, pub_date: DateTime<Utc>) -> PostForm {
    PostForm {
        title: "Fresh post".to_string(),
        text: "Some text".to_string(),
        image: None,
        pub_date,
        location_id: None,
        category_id: Some(category.id),
    }
}
