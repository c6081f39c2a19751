//! Category feed and the reference lists offered to authors.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_shared::dto::{CategoryFeedResponse, PageQuery};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.blog.list_categories().await?;
    let body: Vec<_> = categories.into_iter().map(views::category).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/categories/{slug}?page=N
pub async fn category_feed(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_of(&state, &query);
    let (category, posts) = state
        .blog
        .list_posts_by_category(&path, Utc::now(), page)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: views::category(category),
        posts: views::page_response(posts, views::summary),
    }))
}

/// GET /api/locations
pub async fn list_locations(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations = state.blog.list_locations().await?;
    let body: Vec<_> = locations.into_iter().map(views::location).collect();
    Ok(HttpResponse::Ok().json(body))
}
