//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, IntoCondition, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Page, PageRequest, PostSummary, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, Repositories,
    UserRepository,
};
use blogicum_core::visibility::PostQuery;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity, PostWithCount};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Wire every port to the same connection pool.
pub fn postgres_repositories(db: DbConn) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        locations: Arc::new(PostgresLocationRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db)),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Category>, RepoError> {
        let mut select = CategoryEntity::find().order_by_asc(category::Column::CreatedAt);
        if published_only {
            select = select.filter(category::Column::IsPublished.eq(true));
        }

        let result = select.all(&self.db).await.map_err(query_error)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list(&self, published_only: bool) -> Result<Vec<Location>, RepoError> {
        let mut select = LocationEntity::find().order_by_asc(location::Column::CreatedAt);
        if published_only {
            select = select.filter(location::Column::IsPublished.eq(true));
        }

        let result = select.all(&self.db).await.map_err(query_error)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// LIKE pattern matching `term` anywhere, with wildcards in `term` escaped.
fn contains_pattern(term: &str) -> LikeExpr {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Compile a [`PostQuery`] into a select of posts with published comment
/// counts.
///
/// The visibility rule needs the category row, so it is joined whenever
/// `visible_at` or a search term is present.
pub(crate) fn post_summaries(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find()
        .column_as(
            Expr::col((CommentEntity, comment::Column::Id)).count(),
            "comment_count",
        )
        .join(
            JoinType::LeftJoin,
            post::Relation::Comments.def().on_condition(|_posts, comments| {
                Expr::col((comments, comment::Column::IsPublished))
                    .eq(true)
                    .into_condition()
            }),
        );

    if let Some(now) = query.visible_at {
        select = select
            .join(JoinType::InnerJoin, post::Relation::Category.def())
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now))
            .filter(category::Column::IsPublished.eq(true));
    } else if query.search.is_some() {
        select = select.join(JoinType::LeftJoin, post::Relation::Category.def());
    }

    if let Some(term) = &query.search {
        select = select
            .join(JoinType::LeftJoin, post::Relation::Location.def())
            .filter(
                Condition::any()
                    .add(Expr::col((PostEntity, post::Column::Title)).ilike(contains_pattern(term)))
                    .add(
                        Expr::col((CategoryEntity, category::Column::Title))
                            .ilike(contains_pattern(term)),
                    )
                    .add(
                        Expr::col((CategoryEntity, category::Column::Slug))
                            .ilike(contains_pattern(term)),
                    )
                    .add(
                        Expr::col((LocationEntity, location::Column::Name))
                            .ilike(contains_pattern(term)),
                    ),
            );
    }

    if let Some(id) = query.post_id {
        select = select.filter(post::Column::Id.eq(id));
    }
    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(flag) = query.is_published {
        select = select.filter(post::Column::IsPublished.eq(flag));
    }

    select
        .group_by(post::Column::Id)
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::CreatedAt)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let paginator = post_summaries(query)
            .into_model::<PostWithCount>()
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(query_error)?;
        if !page.fits(total) {
            return Ok(Page::new(Vec::new(), page, total));
        }
        let rows = paginator
            .fetch_page(page.page.saturating_sub(1))
            .await
            .map_err(query_error)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }

    async fn find_one(&self, query: &PostQuery) -> Result<Option<PostSummary>, RepoError> {
        let row = post_summaries(query)
            .into_model::<PostWithCount>()
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let mut select = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt);
        if published_only {
            select = select.filter(comment::Column::IsPublished.eq(true));
        }

        let result = select.all(&self.db).await.map_err(query_error)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}
