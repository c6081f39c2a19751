//! Feeds and post authoring.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_shared::dto::{PageQuery, PostRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=N
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_of(&state, &query);
    let posts = state.blog.list_public_posts(Utc::now(), page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::summary)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let requester = identity.requester();
    let post = state
        .blog
        .create_post(Some(&requester), views::post_form(body.into_inner()))
        .await?;
    let author = state.profiles.current_user(Some(&requester)).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, views::profile_url(&author.username)))
        .json(views::post(post)))
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let requester = identity.requester();
    let detail = state
        .blog
        .get_post_detail(path.into_inner(), requester.as_ref(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(views::detail(detail)))
}

/// PUT /api/posts/{post_id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .update_post(
            path.into_inner(),
            Some(&identity.requester()),
            views::post_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, views::post_url(post.id)))
        .json(views::post(post)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let requester = identity.requester();
    state
        .blog
        .delete_post(path.into_inner(), Some(&requester))
        .await?;
    // Token usernames go stale after a rename.
    let author = state.profiles.current_user(Some(&requester)).await?;

    Ok(views::see_other(views::profile_url(&author.username)))
}
