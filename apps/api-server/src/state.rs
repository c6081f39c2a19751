//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{PasswordService, Repositories, TokenService};
use blogicum_core::{AdminService, BlogService, ProfileService};
use blogicum_infra::{Argon2PasswordService, InMemoryBlogStore, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub profiles: ProfileService,
    pub admin: AdminService,
    pub tokens: Arc<dyn TokenService>,
    pub per_page: u64,
    /// Backing store, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let (repos, storage) = open_store(config).await;

        tracing::info!(storage, "Application state initialized");
        Self::from_repositories(repos, tokens, passwords, config.posts_per_page, storage)
    }

    pub fn from_repositories(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        per_page: u64,
        storage: &'static str,
    ) -> Self {
        Self {
            blog: BlogService::new(repos.clone()),
            profiles: ProfileService::new(repos.users.clone(), passwords),
            admin: AdminService::new(repos),
            tokens,
            per_page,
            storage,
        }
    }
}

fn in_memory() -> (Repositories, &'static str) {
    (Arc::new(InMemoryBlogStore::new()).repositories(), "memory")
}

#[cfg(feature = "postgres")]
async fn open_store(config: &AppConfig) -> (Repositories, &'static str) {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match blogicum_infra::database::connect(db_config).await {
        Ok(conn) => (blogicum_infra::postgres_repositories(conn), "postgres"),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &AppConfig) -> (Repositories, &'static str) {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory store");
    in_memory()
}
