use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use validator::Validate;

use crate::api::{dto, load_user, page, AppState};
use crate::entities::{comment, post, user};
use crate::error;

#[derive(Debug, Object, Validate)]
struct UserCreateRequest {
    #[validate(length(min = 1, max = 50))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(max = 1000))]
    bio: Option<String>,
}

#[derive(Debug, Object, Validate)]
struct UserUpdateRequest {
    #[validate(length(min = 1, max = 50))]
    username: Option<String>,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(max = 1000))]
    bio: Option<String>,
    #[validate(length(max = 255))]
    avatar_url: Option<String>,
}

pub struct UsersApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl UsersApi {
    /// Create a user
    #[oai(path = "/users", method = "post")]
    async fn create_user(
        &self,
        Json(req): Json<UserCreateRequest>,
    ) -> poem::Result<Json<dto::UserResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;

        if user::Entity::find()
            .filter(user::Column::Email.eq(req.email.as_str()))
            .one(&txn)
            .await
            .map_err(error::db)?
            .is_some()
        {
            return Err(error::conflict("Email already exists"));
        }
        if user::Entity::find()
            .filter(user::Column::Username.eq(req.username.as_str()))
            .one(&txn)
            .await
            .map_err(error::db)?
            .is_some()
        {
            return Err(error::conflict("Username already taken"));
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let created = user::ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            bio: Set(req.bio),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(created.into()))
    }

    /// List users
    #[oai(path = "/users", method = "get")]
    async fn list_users(
        &self,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::UserResponse>>> {
        let (skip, limit) = page(skip, limit);
        let rows = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.state.db)
            .await
            .map_err(error::db)?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }

    /// Full profile, with follower/following/post counts
    #[oai(path = "/users/:id", method = "get")]
    async fn get_user(&self, Path(id): Path<i64>) -> poem::Result<Json<dto::UserProfileResponse>> {
        let db = &self.state.db;
        let u = load_user(db, id).await?;
        let profile = dto::project_profile(db, u).await.map_err(error::db)?;
        Ok(Json(profile))
    }

    /// Partial update
    #[oai(path = "/users/:id", method = "put")]
    async fn update_user(
        &self,
        Path(id): Path<i64>,
        Json(req): Json<UserUpdateRequest>,
    ) -> poem::Result<Json<dto::UserResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let existing = load_user(&txn, id).await?;

        if let Some(username) = &req.username {
            if user::Entity::find()
                .filter(user::Column::Username.eq(username.as_str()))
                .filter(user::Column::Id.ne(id))
                .one(&txn)
                .await
                .map_err(error::db)?
                .is_some()
            {
                return Err(error::conflict("Username already taken"));
            }
        }
        if let Some(email) = &req.email {
            if user::Entity::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .filter(user::Column::Id.ne(id))
                .one(&txn)
                .await
                .map_err(error::db)?
                .is_some()
            {
                return Err(error::conflict("Email already exists"));
            }
        }

        let mut am: user::ActiveModel = existing.into();
        if let Some(v) = req.username {
            am.username = Set(v);
        }
        if let Some(v) = req.email {
            am.email = Set(v);
        }
        if let Some(v) = req.bio {
            am.bio = Set(Some(v));
        }
        if let Some(v) = req.avatar_url {
            am.avatar_url = Set(Some(v));
        }
        let updated = am.update(&txn).await.map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(updated.into()))
    }

    /// Posts authored by a user
    #[oai(path = "/users/:id/posts", method = "get")]
    async fn user_posts(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::PostResponse>>> {
        let db = &self.state.db;
        let author = load_user(db, id).await?;
        let (skip, limit) = page(skip, limit);
        let rows = post::Entity::find()
            .filter(post::Column::AuthorId.eq(id))
            .order_by_desc(post::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(
                dto::project_post(db, row, author.clone())
                    .await
                    .map_err(error::db)?,
            );
        }
        Ok(Json(out))
    }

    /// Posts the user recently commented on
    #[oai(path = "/users/:id/activity", method = "get")]
    async fn user_activity(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::PostResponse>>> {
        let db = &self.state.db;
        load_user(db, id).await?;
        let (skip, limit) = page(skip, limit);
        let rows = post::Entity::find()
            .join(JoinType::InnerJoin, post::Relation::Comment.def())
            .filter(comment::Column::AuthorId.eq(id))
            .order_by_desc(comment::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let author = load_user(db, row.author_id).await?;
            out.push(dto::project_post(db, row, author).await.map_err(error::db)?);
        }
        Ok(Json(out))
    }
}
