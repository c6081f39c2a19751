//! HTTP tests against the in-memory store.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use blogicum_core::domain::{Category, User};
use blogicum_core::ports::{BaseRepository, Repositories, TokenService};
use blogicum_infra::{
    Argon2PasswordService, HashingCost, InMemoryBlogStore, JwtConfig, JwtTokenService,
};

use crate::state::AppState;

struct Harness {
    state: AppState,
    repos: Repositories,
    tokens: Arc<dyn TokenService>,
}

impl Harness {
    fn new() -> Self {
        let repos = Arc::new(InMemoryBlogStore::new()).repositories();
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        }));
        let passwords = Arc::new(Argon2PasswordService::with_cost(HashingCost::minimal()).unwrap());
        let state = AppState::from_repositories(repos.clone(), tokens.clone(), passwords, 2, "memory");
        Self {
            state,
            repos,
            tokens,
        }
    }

    async fn user(&self, username: &str, is_staff: bool) -> (User, String) {
        let mut user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "unused".to_string(),
        );
        user.is_staff = is_staff;
        let user = self.repos.users.insert(user).await.unwrap();
        let token = self
            .tokens
            .generate_token(user.id, &user.username, user.roles())
            .unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        self.repos
            .categories
            .insert(Category::new(
                slug.to_string(),
                String::new(),
                slug.to_string(),
                is_published,
            ))
            .await
            .unwrap()
    }
}

macro_rules! app {
    ($harness:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(super::configure_routes),
        )
        .await
    };
}

fn post_body(category: &Category, days_from_now: i64) -> Value {
    json!({
        "title": "Morning news",
        "text": "All quiet.",
        "pub_date": Utc::now() + TimeDelta::days(days_from_now),
        "category_id": category.id,
    })
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = actix_test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_register_login_and_me() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "jane",
            "email": "jane@example.com",
            "password": "correct horse",
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "jane", "password": "correct horse"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["token_type"], "Bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = actix_test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "jane");
    assert_eq!(body["is_staff"], false);

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "jane", "password": "wrong password"}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_create_post_requires_token() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_body(&news, -1))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_post_lifecycle_and_ownership_redirect() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let (_, intruder) = harness.user("intruder", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author.clone()))
        .set_json(post_body(&news, -1))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(location(&resp), "/api/profile/author");
    let created: Value = actix_test::read_body_json(resp).await;
    let post_id = created["id"].as_str().unwrap().to_string();

    let req = actix_test::TestRequest::get().uri("/api/posts").to_request();
    let feed: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["total"], 1);
    assert_eq!(feed["items"][0]["id"], post_id.as_str());
    assert_eq!(feed["items"][0]["comment_count"], 0);

    let mut hijack = post_body(&news, -1);
    hijack["title"] = json!("Hijacked");
    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header((header::AUTHORIZATION, intruder.clone()))
        .set_json(hijack)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/api/posts/{post_id}"));

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header((header::AUTHORIZATION, intruder))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let detail: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["title"], "Morning news");

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header((header::AUTHORIZATION, author))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/api/profile/author");

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_scheduled_post_visible_only_to_author() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author.clone()))
        .set_json(post_body(&news, 3))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let req = actix_test::TestRequest::get().uri(&uri).to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, author.clone()))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = actix_test::TestRequest::get()
        .uri("/api/profile/author")
        .insert_header((header::AUTHORIZATION, author))
        .to_request();
    let own: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["posts"]["total"], 1);

    let req = actix_test::TestRequest::get()
        .uri("/api/profile/author")
        .to_request();
    let public: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(public["profile"]["username"], "author");
    assert_eq!(public["posts"]["total"], 0);
}

#[actix_rt::test]
async fn test_invalid_post_is_unprocessable() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let app = app!(harness);

    let mut body = post_body(&news, -1);
    body["title"] = json!("");
    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author))
        .set_json(body)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let problem: Value = actix_test::read_body_json(resp).await;
    assert!(!problem["errors"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let harness = Harness::new();
    let (_, author) = harness.user("author", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_category_feed_and_listing() {
    let harness = Harness::new();
    harness.category("news", true).await;
    harness.category("drafts", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::get().uri("/api/categories").to_request();
    let listing: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let req = actix_test::TestRequest::get()
        .uri("/api/categories/news")
        .to_request();
    let feed: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["category"]["slug"], "news");
    assert_eq!(feed["posts"]["total_pages"], 1);

    let req = actix_test::TestRequest::get()
        .uri("/api/categories/drafts")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_feed_pagination() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let app = app!(harness);

    for _ in 0..3 {
        let req = actix_test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, author.clone()))
            .set_json(post_body(&news, -1))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = actix_test::TestRequest::get()
        .uri("/api/posts?page=2")
        .to_request();
    let page: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["total_pages"], 2);

    let req = actix_test::TestRequest::get()
        .uri("/api/posts?page=3")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = actix_test::TestRequest::get()
        .uri("/api/posts?page=18446744073709551615")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_renamed_author_redirects_to_new_profile() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::put()
        .uri("/api/profile")
        .insert_header((header::AUTHORIZATION, author.clone()))
        .set_json(json!({"username": "renamed", "email": "author@example.com"}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author.clone()))
        .set_json(post_body(&news, -1))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(location(&resp), "/api/profile/renamed");
    let created: Value = actix_test::read_body_json(resp).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/profile/renamed")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", created["id"].as_str().unwrap()))
        .insert_header((header::AUTHORIZATION, author))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/api/profile/renamed");
}

#[actix_rt::test]
async fn test_comment_flow() {
    let harness = Harness::new();
    let news = harness.category("news", true).await;
    let (_, author) = harness.user("author", false).await;
    let (_, reader) = harness.user("reader", false).await;
    let app = app!(harness);

    let req = actix_test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, author.clone()))
        .set_json(post_body(&news, -1))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, req).await;
    let post_uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let req = actix_test::TestRequest::post()
        .uri(&format!("{post_uri}/comments"))
        .insert_header((header::AUTHORIZATION, reader))
        .set_json(json!({"text": "Nice one"}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(location(&resp), post_uri);
    let comment: Value = actix_test::read_body_json(resp).await;
    let comment_uri = format!("{post_uri}/comments/{}", comment["id"].as_str().unwrap());

    let req = actix_test::TestRequest::put()
        .uri(&comment_uri)
        .insert_header((header::AUTHORIZATION, author))
        .set_json(json!({"text": "Edited by someone else"}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = actix_test::TestRequest::get().uri(&post_uri).to_request();
    let detail: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comment_count"], 1);
    assert_eq!(detail["comments"][0]["text"], "Nice one");
}

#[actix_rt::test]
async fn test_admin_routes_require_staff() {
    let harness = Harness::new();
    let (_, regular) = harness.user("regular", false).await;
    let (_, staff) = harness.user("moderator", true).await;
    let app = app!(harness);

    let body = json!({"title": "Travel", "slug": "travel"});

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, regular))
        .set_json(body.clone())
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, staff.clone()))
        .set_json(body.clone())
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = actix_test::TestRequest::post()
        .uri("/api/admin/categories")
        .insert_header((header::AUTHORIZATION, staff))
        .set_json(body)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
