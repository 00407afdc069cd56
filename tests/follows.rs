mod common;

use common::{seed_user, setup_db};
use forum_backend::build_app;
use poem::http::StatusCode;
use poem::test::TestClient;
use serde_json::json;

#[tokio::test]
async fn follow_is_not_a_toggle() {
    let db = setup_db().await;
    let a = seed_user(&db, "a", "a@example.com").await;
    let b = seed_user(&db, "b", "b@example.com").await;
    let cli = TestClient::new(build_app(db));

    let edge = json!({"follower_id": a.id, "following_id": b.id});

    let resp = cli.post("/api/follow").body_json(&edge).send().await;
    resp.assert_status_is_ok();

    // repeating the follow is a conflict, not a silent success
    let resp = cli.post("/api/follow").body_json(&edge).send().await;
    resp.assert_status(StatusCode::CONFLICT);

    let resp = cli.post("/api/unfollow").body_json(&edge).send().await;
    resp.assert_status_is_ok();

    // unfollowing a non-edge is a bad request
    let resp = cli.post("/api/unfollow").body_json(&edge).send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let db = setup_db().await;
    let a = seed_user(&db, "a", "a@example.com").await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post("/api/follow")
        .body_json(&json!({"follower_id": a.id, "following_id": a.id}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn follow_requires_both_users() {
    let db = setup_db().await;
    let a = seed_user(&db, "a", "a@example.com").await;
    let cli = TestClient::new(build_app(db));

    let resp = cli
        .post("/api/follow")
        .body_json(&json!({"follower_id": a.id, "following_id": 999}))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn follower_counts_and_lists_come_from_the_edge_set() {
    let db = setup_db().await;
    let a = seed_user(&db, "a", "a@example.com").await;
    let b = seed_user(&db, "b", "b@example.com").await;
    let c = seed_user(&db, "c", "c@example.com").await;
    let cli = TestClient::new(build_app(db));

    for follower in [a.id, b.id] {
        let resp = cli
            .post("/api/follow")
            .body_json(&json!({"follower_id": follower, "following_id": c.id}))
            .send()
            .await;
        resp.assert_status_is_ok();
    }
    let resp = cli
        .post("/api/follow")
        .body_json(&json!({"follower_id": c.id, "following_id": a.id}))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.get(format!("/api/users/{}", c.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let profile = body.value().object();
    assert_eq!(profile.get("followers_count").i64(), 2);
    assert_eq!(profile.get("following_count").i64(), 1);

    let resp = cli.get(format!("/api/users/{}/followers", c.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let followers = body.value().array();
    assert_eq!(followers.len(), 2);

    let resp = cli.get(format!("/api/users/{}/following", c.id)).send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let following = body.value().array();
    assert_eq!(following.len(), 1);
    assert_eq!(following.get(0).object().get("username").string(), "a");
}
