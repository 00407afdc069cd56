//! Follow edges. Unlike likes and votes these are not toggles: following an
//! already-followed user is a conflict, unfollowing a non-followed user is a
//! bad request.

use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::api::dto;
use crate::api::{load_user, page, AppState};
use crate::entities::{follow, user};
use crate::error;

#[derive(Debug, Object)]
struct FollowRequest {
    follower_id: i64,
    following_id: i64,
}

pub struct FollowsApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl FollowsApi {
    /// Follow a user
    #[oai(path = "/follow", method = "post")]
    async fn follow(
        &self,
        Json(req): Json<FollowRequest>,
    ) -> poem::Result<Json<dto::MessageResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        load_user(&txn, req.follower_id).await?;
        load_user(&txn, req.following_id).await?;
        if req.follower_id == req.following_id {
            return Err(error::invalid("Cannot follow yourself"));
        }
        if follow::Entity::find_by_id((req.follower_id, req.following_id))
            .one(&txn)
            .await
            .map_err(error::db)?
            .is_some()
        {
            return Err(error::conflict("Already following this user"));
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        follow::ActiveModel {
            follower_id: Set(req.follower_id),
            following_id: Set(req.following_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(dto::MessageResponse {
            message: "Followed successfully".into(),
        }))
    }

    /// Unfollow a user
    #[oai(path = "/unfollow", method = "post")]
    async fn unfollow(
        &self,
        Json(req): Json<FollowRequest>,
    ) -> poem::Result<Json<dto::MessageResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        load_user(&txn, req.follower_id).await?;
        load_user(&txn, req.following_id).await?;
        let edge = follow::Entity::find_by_id((req.follower_id, req.following_id))
            .one(&txn)
            .await
            .map_err(error::db)?
            .ok_or_else(|| error::invalid("Not following this user"))?;
        edge.delete(&txn).await.map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(dto::MessageResponse {
            message: "Unfollowed successfully".into(),
        }))
    }

    /// Users following this user
    #[oai(path = "/users/:id/followers", method = "get")]
    async fn followers(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::UserResponse>>> {
        let db = &self.state.db;
        load_user(db, id).await?;
        let (skip, limit) = page(skip, limit);
        let rows = user::Entity::find()
            .join(JoinType::InnerJoin, follow::Relation::Follower.def().rev())
            .filter(follow::Column::FollowingId.eq(id))
            .order_by_desc(follow::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }

    /// Users this user follows
    #[oai(path = "/users/:id/following", method = "get")]
    async fn following(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::UserResponse>>> {
        let db = &self.state.db;
        load_user(db, id).await?;
        let (skip, limit) = page(skip, limit);
        let rows = user::Entity::find()
            .join(JoinType::InnerJoin, follow::Relation::Following.def().rev())
            .filter(follow::Column::FollowerId.eq(id))
            .order_by_desc(follow::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }
}
