mod common;

use blogicum_core::DomainError;
use blogicum_core::domain::{PageRequest, Requester};
use blogicum_core::forms::CommentForm;
use blogicum_core::ports::{BaseRepository, CommentRepository};
use common::{World, post_form};
use uuid::Uuid;

fn page() -> PageRequest {
    PageRequest::first(10)
}

fn comment(text: &str) -> CommentForm {
    CommentForm {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_public_feed_matches_visibility_predicate() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let published = world.category("news", true).await;
    let hidden = world.category("drafts", false).await;

    let visible = world.visible_post(&author, &published).await;
    world
        .post(&author, Some(&published), world.tomorrow(), true)
        .await;
    world
        .post(&author, Some(&published), world.yesterday(), false)
        .await;
    world.post(&author, Some(&hidden), world.yesterday(), true).await;
    world.post(&author, None, world.yesterday(), true).await;

    let feed = world
        .blog
        .list_public_posts(world.now, page())
        .await
        .unwrap();

    assert_eq!(feed.total, 1);
    assert_eq!(feed.items[0].post.id, visible.id);
}

#[tokio::test]
async fn test_feed_is_newest_first_and_paginated() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let news = world.category("news", true).await;

    for days in 1..=12 {
        world
            .post(
                &author,
                Some(&news),
                world.now - chrono::TimeDelta::days(days),
                true,
            )
            .await;
    }

    let first = world
        .blog
        .list_public_posts(world.now, PageRequest::new(1, 10))
        .await
        .unwrap();
    let second = world
        .blog
        .list_public_posts(world.now, PageRequest::new(2, 10))
        .await
        .unwrap();

    assert_eq!(first.items.len(), 10);
    assert_eq!(second.items.len(), 2);
    assert_eq!(first.total_pages(), 2);
    assert!(
        first
            .items
            .windows(2)
            .all(|w| w[0].post.pub_date >= w[1].post.pub_date)
    );

    let beyond = world
        .blog
        .list_public_posts(world.now, PageRequest::new(3, 10))
        .await;
    assert!(matches!(beyond, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_category_feed_hides_future_posts() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let news = world.category("news", true).await;
    let other = world.category("other", true).await;

    let a = world.post(&author, Some(&news), world.yesterday(), true).await;
    world
        .post(&author, Some(&news), world.tomorrow(), true)
        .await;
    world.visible_post(&author, &other).await;

    let (category, feed) = world
        .blog
        .list_posts_by_category("news", world.now, page())
        .await
        .unwrap();

    assert_eq!(category.id, news.id);
    let ids: Vec<Uuid> = feed.items.iter().map(|s| s.post.id).collect();
    assert_eq!(ids, vec![a.id]);
}

#[tokio::test]
async fn test_unpublished_or_missing_category_is_not_found() {
    let world = World::new();
    world.category("hidden", false).await;

    for slug in ["hidden", "missing"] {
        let result = world
            .blog
            .list_posts_by_category(slug, world.now, page())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })), "{slug}");
    }
}

#[tokio::test]
async fn test_profile_feed_depends_on_viewer() {
    let world = World::new();
    let (author, author_req) = world.user("author").await;
    let (_, reader) = world.user("reader").await;
    let news = world.category("news", true).await;

    let visible = world.visible_post(&author, &news).await;
    world.post(&author, Some(&news), world.tomorrow(), true).await;
    world.post(&author, Some(&news), world.yesterday(), false).await;
    world.post(&author, None, world.yesterday(), true).await;

    let (_, own) = world
        .blog
        .list_posts_by_author("author", Some(&author_req), world.now, page())
        .await
        .unwrap();
    assert_eq!(own.total, 4);

    let (_, public) = world
        .blog
        .list_posts_by_author("author", Some(&reader), world.now, page())
        .await
        .unwrap();
    assert_eq!(public.total, 1);
    assert_eq!(public.items[0].post.id, visible.id);

    let (_, anonymous) = world
        .blog
        .list_posts_by_author("author", None, world.now, page())
        .await
        .unwrap();
    assert_eq!(anonymous.total, 1);

    let missing = world
        .blog
        .list_posts_by_author("nobody", None, world.now, page())
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_author_sees_own_hidden_post_others_do_not() {
    let world = World::new();
    let (author, author_req) = world.user("author").await;
    let (_, reader) = world.user("reader").await;
    let news = world.category("news", true).await;
    let scheduled = world.post(&author, Some(&news), world.tomorrow(), true).await;

    let detail = world
        .blog
        .get_post_detail(scheduled.id, Some(&author_req), world.now)
        .await
        .unwrap();
    assert_eq!(detail.post.post.id, scheduled.id);

    for viewer in [Some(&reader), None] {
        let result = world
            .blog
            .get_post_detail(scheduled.id, viewer, world.now)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

#[tokio::test]
async fn test_post_detail_lists_published_comments_in_order() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let (_, reader) = world.user("reader").await;
    let staff = world.staff("moderator").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;

    let first = world
        .blog
        .create_comment(post.id, Some(&reader), comment("first"), world.now)
        .await
        .unwrap();
    let hidden = world
        .blog
        .create_comment(post.id, Some(&reader), comment("spam"), world.now)
        .await
        .unwrap();
    world
        .admin
        .set_comment_published(Some(&staff), hidden.id, false)
        .await
        .unwrap();
    let last = world
        .blog
        .create_comment(post.id, Some(&reader), comment("last"), world.now)
        .await
        .unwrap();

    let detail = world
        .blog
        .get_post_detail(post.id, None, world.now)
        .await
        .unwrap();

    let ids: Vec<Uuid> = detail.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, last.id]);
    assert_eq!(detail.post.comment_count, detail.comments.len() as u64);
}

#[tokio::test]
async fn test_create_post_binds_author() {
    let world = World::new();
    let (author, author_req) = world.user("author").await;
    let news = world.category("news", true).await;

    let post = world
        .blog
        .create_post(Some(&author_req), post_form(&news, world.yesterday()))
        .await
        .unwrap();

    assert_eq!(post.author_id, author.id);
    assert!(post.is_published);
    assert_eq!(post.category_id, Some(news.id));
}

#[tokio::test]
async fn test_create_post_requires_authentication() {
    let world = World::new();
    let news = world.category("news", true).await;

    let result = world
        .blog
        .create_post(None, post_form(&news, world.now))
        .await;

    assert!(matches!(result, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_create_post_rejects_unknown_references() {
    let world = World::new();
    let (_, author_req) = world.user("author").await;
    let news = world.category("news", true).await;

    let mut form = post_form(&news, world.now);
    form.location_id = Some(Uuid::new_v4());
    let result = world.blog.create_post(Some(&author_req), form).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    let mut form = post_form(&news, world.now);
    form.category_id = Some(Uuid::new_v4());
    let result = world.blog.create_post(Some(&author_req), form).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_non_author_cannot_update_or_delete_post() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let (_, intruder) = world.user("intruder").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;

    let mut form = post_form(&news, world.now);
    form.title = "Hijacked".to_string();
    let update = world
        .blog
        .update_post(post.id, Some(&intruder), form)
        .await;
    assert!(matches!(update, Err(DomainError::Forbidden { post_id }) if post_id == post.id));

    let delete = world.blog.delete_post(post.id, Some(&intruder)).await;
    assert!(matches!(delete, Err(DomainError::Forbidden { .. })));

    let stored = world.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored, post);
}

#[tokio::test]
async fn test_guard_runs_before_validation() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let (_, intruder) = world.user("intruder").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;

    let mut form = post_form(&news, world.now);
    form.title = String::new();
    let result = world.blog.update_post(post.id, Some(&intruder), form).await;

    assert!(matches!(result, Err(DomainError::Forbidden { .. })));
}

#[tokio::test]
async fn test_author_updates_and_deletes_post() {
    let world = World::new();
    let (author, author_req) = world.user("author").await;
    let news = world.category("news", true).await;
    let place = world.location("Harbour").await;
    let post = world.visible_post(&author, &news).await;

    let mut form = post_form(&news, world.tomorrow());
    form.title = "Rewritten".to_string();
    form.location_id = Some(place.id);
    form.image = Some("posts/harbour.jpg".to_string());
    let updated = world
        .blog
        .update_post(post.id, Some(&author_req), form)
        .await
        .unwrap();
    assert_eq!(updated.title, "Rewritten");
    assert_eq!(updated.location_id, Some(place.id));
    assert_eq!(updated.pub_date, world.tomorrow());
    assert_eq!(updated.author_id, author.id);

    world
        .blog
        .delete_post(post.id, Some(&author_req))
        .await
        .unwrap();
    assert!(world.repos.posts.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_is_appended_to_thread() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let (visitor, visitor_req) = world.user("visitor").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;

    let created = world
        .blog
        .create_comment(post.id, Some(&visitor_req), comment("Great read"), world.now)
        .await
        .unwrap();

    let thread = world
        .repos
        .comments
        .list_for_post(post.id, false)
        .await
        .unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].id, created.id);
    assert_eq!(thread[0].author_id, visitor.id);
}

#[tokio::test]
async fn test_author_cannot_comment_on_own_hidden_post() {
    let world = World::new();
    let (author, author_req) = world.user("author").await;
    let news = world.category("news", true).await;
    let scheduled = world.post(&author, Some(&news), world.tomorrow(), true).await;

    let result = world
        .blog
        .create_comment(scheduled.id, Some(&author_req), comment("note"), world.now)
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_comment_mutations_are_guarded() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let (_, commenter) = world.user("commenter").await;
    let (_, intruder) = world.user("intruder").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;
    let other_post = world.visible_post(&author, &news).await;

    let created = world
        .blog
        .create_comment(post.id, Some(&commenter), comment("v1"), world.now)
        .await
        .unwrap();

    let denied = world
        .blog
        .update_comment(post.id, created.id, Some(&intruder), comment("pwned"))
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden { post_id }) if post_id == post.id));

    let wrong_post = world
        .blog
        .delete_comment(other_post.id, created.id, Some(&commenter))
        .await;
    assert!(matches!(wrong_post, Err(DomainError::NotFound { .. })));

    let edited = world
        .blog
        .update_comment(post.id, created.id, Some(&commenter), comment("v2"))
        .await
        .unwrap();
    assert_eq!(edited.text, "v2");

    world
        .blog
        .delete_comment(post.id, created.id, Some(&commenter))
        .await
        .unwrap();
    assert!(
        world
            .repos
            .comments
            .find_by_id(created.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_anonymous_comment_is_unauthorized() {
    let world = World::new();
    let (author, _) = world.user("author").await;
    let news = world.category("news", true).await;
    let post = world.visible_post(&author, &news).await;

    let result = world
        .blog
        .create_comment(post.id, None::<&Requester>, comment("hi"), world.now)
        .await;

    assert!(matches!(result, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_authoring_lists_only_published_references() {
    let world = World::new();
    world.category("news", true).await;
    world.category("hidden", false).await;
    world.location("Harbour").await;

    let categories = world.blog.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "news");
    assert_eq!(world.blog.list_locations().await.unwrap().len(), 1);
}
