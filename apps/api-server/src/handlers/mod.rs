//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{post_id}", web::get().to(posts::get_post))
                    .route("/{post_id}", web::put().to(posts::update_post))
                    .route("/{post_id}", web::delete().to(posts::delete_post))
                    .route(
                        "/{post_id}/comments",
                        web::post().to(comments::create_comment),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update_comment),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete_comment),
                    ),
            )
            .route("/categories", web::get().to(categories::list_categories))
            .route(
                "/categories/{slug}",
                web::get().to(categories::category_feed),
            )
            .route("/locations", web::get().to(categories::list_locations))
            .route("/profile", web::put().to(profile::update_profile))
            .route("/profile/{username}", web::get().to(profile::profile_feed))
            // Staff routes
            .service(
                web::scope("/admin")
                    .route("/categories", web::get().to(admin::list_categories))
                    .route("/categories", web::post().to(admin::create_category))
                    .route(
                        "/categories/{category_id}",
                        web::put().to(admin::update_category),
                    )
                    .route(
                        "/categories/{category_id}",
                        web::delete().to(admin::delete_category),
                    )
                    .route("/locations", web::get().to(admin::list_locations))
                    .route("/locations", web::post().to(admin::create_location))
                    .route(
                        "/locations/{location_id}",
                        web::put().to(admin::update_location),
                    )
                    .route(
                        "/locations/{location_id}",
                        web::delete().to(admin::delete_location),
                    )
                    .route("/posts", web::get().to(admin::list_posts))
                    .route(
                        "/posts/{post_id}/publication",
                        web::put().to(admin::set_post_publication),
                    )
                    .route(
                        "/comments/{comment_id}/publication",
                        web::put().to(admin::set_comment_published),
                    )
                    .route("/users/{user_id}", web::delete().to(admin::delete_user)),
            ),
    );
}
