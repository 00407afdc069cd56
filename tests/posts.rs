mod common;

use common::{seed_forum, seed_post, seed_user, setup_db};
use forum_backend::build_app;
use poem::http::StatusCode;
use poem::test::TestClient;
use serde_json::json;

#[tokio::test]
async fn create_post_requires_author_and_forum() {
    let db = setup_db().await;
    let u = seed_user(&db, "alice", "alice@example.com").await;
    let f = seed_forum(&db, u.id, "general").await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post("/api/posts")
        .body_json(&json!({"content": "hi", "forum_id": f.id, "user_id": 999}))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let resp = cli
        .post("/api/posts")
        .body_json(&json!({"content": "hi", "forum_id": 999, "user_id": u.id}))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let resp = cli
        .post("/api/posts")
        .body_json(&json!({"title": "t", "content": "hi", "forum_id": f.id, "user_id": u.id}))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let created = body.value().object();
    assert_eq!(created.get("likes_count").i64(), 0);
    assert_eq!(created.get("comments_count").i64(), 0);
    assert_eq!(created.get("author").object().get("username").string(), "alice");
}

#[tokio::test]
async fn post_lists_are_newest_first_and_paginated() {
    let db = setup_db().await;
    let u = seed_user(&db, "alice", "alice@example.com").await;
    let f = seed_forum(&db, u.id, "general").await;
    let g = seed_forum(&db, u.id, "offtopic").await;
    for i in 0..5 {
        seed_post(&db, u.id, f.id, &format!("post {i}"), i).await;
    }
    seed_post(&db, u.id, g.id, "elsewhere", 99).await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .get(format!("/api/posts?forum_id={}&skip=1&limit=2", f.id))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let page = body.value().array();
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).object().get("content").string(), "post 3");
    assert_eq!(page.get(1).object().get("content").string(), "post 2");

    let resp = cli.get("/api/trending/posts?limit=2").send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let trending = body.value().array();
    assert_eq!(trending.len(), 2);
    assert_eq!(trending.get(0).object().get("content").string(), "elsewhere");
}

#[tokio::test]
async fn only_the_author_may_delete_a_post() {
    let db = setup_db().await;
    let author = seed_user(&db, "alice", "alice@example.com").await;
    let other = seed_user(&db, "bob", "bob@example.com").await;
    let f = seed_forum(&db, author.id, "general").await;
    let p = seed_post(&db, author.id, f.id, "mine", 0).await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .delete(format!("/api/posts/{}?user_id={}", p.id, other.id))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = cli
        .delete(format!("/api/posts/{}?user_id={}", p.id, author.id))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get(format!("/api/posts/{}", p.id)).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_round_trip_and_delete() {
    let db = setup_db().await;
    let author = seed_user(&db, "alice", "alice@example.com").await;
    let commenter = seed_user(&db, "bob", "bob@example.com").await;
    let f = seed_forum(&db, author.id, "general").await;
    let p = seed_post(&db, author.id, f.id, "discuss", 0).await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post("/api/comments")
        .body_json(&json!({"content": "nice", "post_id": p.id, "user_id": commenter.id}))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let comment = body.value().object().get("id").i64();

    let resp = cli.get(format!("/api/posts/{}/comments", p.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let comments = body.value().array();
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments.get(0).object().get("author").object().get("username").string(),
        "bob"
    );

    let resp = cli.get(format!("/api/posts/{}", p.id)).send().await;
    let body = resp.json().await;
    assert_eq!(body.value().object().get("comments_count").i64(), 1);

    let resp = cli
        .delete(format!("/api/comments/{comment}?user_id={}", author.id))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = cli
        .delete(format!("/api/comments/{comment}?user_id={}", commenter.id))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get(format!("/api/posts/{}", p.id)).send().await;
    let body = resp.json().await;
    assert_eq!(body.value().object().get("comments_count").i64(), 0);
}

#[tokio::test]
async fn forums_filter_by_category() {
    let db = setup_db().await;
    let u = seed_user(&db, "alice", "alice@example.com").await;
    seed_forum(&db, u.id, "games").await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post(format!("/api/forums?user_id={}", u.id))
        .body_json(&json!({"name": "cinema", "category": "movie"}))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get("/api/forums?category=movie").send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let forums = body.value().array();
    assert_eq!(forums.len(), 1);
    assert_eq!(forums.get(0).object().get("name").string(), "cinema");

    // duplicate forum name conflicts
    let resp = cli
        .post(format!("/api/forums?user_id={}", u.id))
        .body_json(&json!({"name": "cinema", "category": "art"}))
        .send()
        .await;
    resp.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_updates_and_activity() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice", "alice@example.com").await;
    let bob = seed_user(&db, "bob", "bob@example.com").await;
    let f = seed_forum(&db, alice.id, "general").await;
    let p = seed_post(&db, alice.id, f.id, "talk here", 0).await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post("/api/status")
        .body_json(&json!({"content": "feeling good", "user_id": alice.id}))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get(format!("/api/users/{}/status", alice.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let statuses = body.value().array();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses.get(0).object().get("content").string(), "feeling good");

    // bob has no activity until he comments
    let resp = cli.get(format!("/api/users/{}/activity", bob.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    assert_eq!(body.value().array().len(), 0);

    cli.post("/api/comments")
        .body_json(&json!({"content": "me too", "post_id": p.id, "user_id": bob.id}))
        .send()
        .await
        .assert_status_is_ok();

    let resp = cli.get(format!("/api/users/{}/activity", bob.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let activity = body.value().array();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity.get(0).object().get("content").string(), "talk here");
}
