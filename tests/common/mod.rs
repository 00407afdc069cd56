#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use forum_backend::entities::forum::ForumCategory;
use forum_backend::entities::{forum, post, user};
use forum_backend::migration::{Migrator, MigratorTrait};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps sqlite's `:memory:` database alive for the whole test.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

/// Deterministic timestamps so newest-first ordering is unambiguous.
pub fn ts(offset_secs: i64) -> DateTimeWithTimeZone {
    (Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)).into()
}

pub async fn seed_user(db: &DatabaseConnection, username: &str, email: &str) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_owned()),
        email: Set(email.to_owned()),
        created_at: Set(ts(0)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_forum(db: &DatabaseConnection, creator: i64, name: &str) -> forum::Model {
    forum::ActiveModel {
        name: Set(name.to_owned()),
        category: Set(ForumCategory::Game),
        created_by: Set(Some(creator)),
        created_at: Set(ts(0)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed forum")
}

pub async fn seed_post(
    db: &DatabaseConnection,
    author: i64,
    forum: i64,
    content: &str,
    offset_secs: i64,
) -> post::Model {
    post::ActiveModel {
        content: Set(content.to_owned()),
        author_id: Set(author),
        forum_id: Set(forum),
        created_at: Set(ts(offset_secs)),
        updated_at: Set(ts(offset_secs)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed post")
}
