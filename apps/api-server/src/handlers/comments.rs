//! Comment handlers. Every response points back at the post.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_shared::dto::CommentRequest;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let comment = state
        .blog
        .create_comment(
            post_id,
            Some(&identity.requester()),
            views::comment_form(body.into_inner()),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, views::post_url(post_id)))
        .json(views::comment(comment)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .update_comment(
            post_id,
            comment_id,
            Some(&identity.requester()),
            views::comment_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, views::post_url(post_id)))
        .json(views::comment(comment)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .blog
        .delete_comment(post_id, comment_id, Some(&identity.requester()))
        .await?;

    Ok(views::see_other(views::post_url(post_id)))
}
