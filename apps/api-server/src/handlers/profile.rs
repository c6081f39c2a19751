//! Author profiles.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;

use blogicum_shared::dto::{PageQuery, ProfileFeedResponse, UpdateProfileRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=N
///
/// The owner sees every post they wrote, drafts and scheduled ones
/// included; everyone else sees the public feed.
pub async fn profile_feed(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_of(&state, &query);
    let requester = identity.requester();
    let (author, posts) = state
        .blog
        .list_posts_by_author(&path, requester.as_ref(), Utc::now(), page)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileFeedResponse {
        profile: views::profile(author),
        posts: views::page_response(posts, views::summary),
    }))
}

/// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .profiles
        .update_profile(
            Some(&identity.requester()),
            views::profile_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, views::profile_url(&user.username)))
        .json(views::user(user)))
}
