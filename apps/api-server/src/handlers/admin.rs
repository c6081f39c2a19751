//! Staff-only management endpoints under `/api/admin`.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::services::AdminPostFilter;
use blogicum_shared::dto::{
    AdminPostQuery, CategoryRequest, LocationRequest, ModerationRequest, PublicationRequest,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let categories = state
        .admin
        .list_categories(Some(&identity.requester()))
        .await?;
    let body: Vec<_> = categories.into_iter().map(views::category).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .admin
        .create_category(
            Some(&identity.requester()),
            views::category_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Created().json(views::category(category)))
}

pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .admin
        .update_category(
            Some(&identity.requester()),
            path.into_inner(),
            views::category_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(views::category(category)))
}

pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .admin
        .delete_category(Some(&identity.requester()), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_locations(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let locations = state
        .admin
        .list_locations(Some(&identity.requester()))
        .await?;
    let body: Vec<_> = locations.into_iter().map(views::location).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .admin
        .create_location(
            Some(&identity.requester()),
            views::location_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Created().json(views::location(location)))
}

pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .admin
        .update_location(
            Some(&identity.requester()),
            path.into_inner(),
            views::location_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(views::location(location)))
}

pub async fn delete_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .admin
        .delete_location(Some(&identity.requester()), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/posts?search=term&is_published=false&page=N
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<AdminPostQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = views::page_request(&state, query.page);
    let filter = AdminPostFilter {
        search: query.search,
        is_published: query.is_published,
    };

    let posts = state
        .admin
        .list_posts(Some(&identity.requester()), filter, page)
        .await?;
    Ok(HttpResponse::Ok().json(views::page_response(posts, views::summary)))
}

/// PUT /api/admin/posts/{post_id}/publication
pub async fn set_post_publication(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublicationRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .admin
        .set_post_publication(
            Some(&identity.requester()),
            path.into_inner(),
            views::publication_form(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// PUT /api/admin/comments/{comment_id}/publication
pub async fn set_comment_published(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ModerationRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .admin
        .set_comment_published(
            Some(&identity.requester()),
            path.into_inner(),
            body.is_published,
        )
        .await?;
    Ok(HttpResponse::Ok().json(views::comment(comment)))
}

/// DELETE /api/admin/users/{user_id}
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .admin
        .delete_user(Some(&identity.requester()), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
