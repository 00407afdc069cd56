//! Like and vote toggles. Each call moves the (user, post) pair exactly one
//! step: likes alternate between present and absent, votes walk a three-state
//! machine (none / upvote / downvote).

use std::sync::Arc;

use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::api::dto;
use crate::api::{load_post, load_user, AppState};
use crate::entities::vote::VoteType;
use crate::entities::{like, vote};
use crate::error;

#[derive(Debug, Object)]
struct LikeRequest {
    post_id: i64,
    user_id: i64,
}

#[derive(Debug, Object)]
struct VoteRequest {
    post_id: i64,
    user_id: i64,
    vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    Removed,
    Switched,
}

/// Insert the like if the pair has none, otherwise remove it.
/// Returns whether the post is liked afterwards.
pub async fn toggle_like<C>(conn: &C, user_id: i64, post_id: i64) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let existing = like::Entity::find()
        .filter(like::Column::UserId.eq(user_id))
        .filter(like::Column::PostId.eq(post_id))
        .one(conn)
        .await?;
    match existing {
        Some(row) => {
            row.delete(conn).await?;
            Ok(false)
        }
        None => {
            let now: DateTimeWithTimeZone = chrono::Utc::now().into();
            like::ActiveModel {
                user_id: Set(user_id),
                post_id: Set(post_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            Ok(true)
        }
    }
}

/// No row: record the vote. Same polarity: un-vote. Opposite: switch in place.
pub async fn apply_vote<C>(
    conn: &C,
    user_id: i64,
    post_id: i64,
    vote_type: VoteType,
) -> Result<VoteOutcome, DbErr>
where
    C: ConnectionTrait,
{
    let existing = vote::Entity::find()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::PostId.eq(post_id))
        .one(conn)
        .await?;
    match existing {
        None => {
            let now: DateTimeWithTimeZone = chrono::Utc::now().into();
            vote::ActiveModel {
                user_id: Set(user_id),
                post_id: Set(post_id),
                vote_type: Set(vote_type),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            Ok(VoteOutcome::Recorded)
        }
        Some(row) if row.vote_type == vote_type => {
            row.delete(conn).await?;
            Ok(VoteOutcome::Removed)
        }
        Some(row) => {
            let mut am: vote::ActiveModel = row.into();
            am.vote_type = Set(vote_type);
            am.update(conn).await?;
            Ok(VoteOutcome::Switched)
        }
    }
}

pub struct EngagementApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl EngagementApi {
    /// Like or unlike a post
    #[oai(path = "/likes", method = "post")]
    async fn like(&self, Json(req): Json<LikeRequest>) -> poem::Result<Json<dto::LikeResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        load_user(&txn, req.user_id).await?;
        load_post(&txn, req.post_id).await?;
        let liked = toggle_like(&txn, req.user_id, req.post_id)
            .await
            .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        let message = if liked {
            "Like successful"
        } else {
            "Unlike successful"
        };
        Ok(Json(dto::LikeResponse {
            message: message.into(),
            liked,
        }))
    }

    /// Upvote or downvote a post
    #[oai(path = "/votes", method = "post")]
    async fn vote(&self, Json(req): Json<VoteRequest>) -> poem::Result<Json<dto::MessageResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        load_user(&txn, req.user_id).await?;
        load_post(&txn, req.post_id).await?;
        let outcome = apply_vote(&txn, req.user_id, req.post_id, req.vote_type)
            .await
            .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        let message = match outcome {
            VoteOutcome::Recorded => format!("{} successful", req.vote_type.as_str()),
            VoteOutcome::Removed => "Vote removed".to_string(),
            VoteOutcome::Switched => format!("Vote changed to {}", req.vote_type.as_str()),
        };
        Ok(Json(dto::MessageResponse { message }))
    }

    /// Vote tallies for a post
    #[oai(path = "/posts/:id/votes", method = "get")]
    async fn post_votes(&self, Path(id): Path<i64>) -> poem::Result<Json<dto::VoteSummaryResponse>> {
        let db = &self.state.db;
        load_post(db, id).await?;
        let summary = dto::vote_summary(db, id).await.map_err(error::db)?;
        Ok(Json(summary))
    }
}
