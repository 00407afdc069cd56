use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use validator::Validate;

use crate::api::dto;
use crate::api::{load_post, load_user, page, AppState};
use crate::entities::{comment, user};
use crate::error;

#[derive(Debug, Object, Validate)]
struct CommentCreateRequest {
    #[validate(length(min = 1))]
    content: String,
    post_id: i64,
    user_id: i64,
}

pub struct CommentsApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl CommentsApi {
    /// Comment on a post
    #[oai(path = "/comments", method = "post")]
    async fn create_comment(
        &self,
        Json(req): Json<CommentCreateRequest>,
    ) -> poem::Result<Json<dto::CommentResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let author = load_user(&txn, req.user_id).await?;
        load_post(&txn, req.post_id).await?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let created = comment::ActiveModel {
            content: Set(req.content),
            author_id: Set(req.user_id),
            post_id: Set(req.post_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(dto::comment_response(created, author)))
    }

    /// Comments on a post, newest first
    #[oai(path = "/posts/:id/comments", method = "get")]
    async fn list_comments(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::CommentResponse>>> {
        let db = &self.state.db;
        load_post(db, id).await?;
        let (skip, limit) = page(skip, limit);
        let rows = comment::Entity::find()
            .find_also_related(user::Entity)
            .filter(comment::Column::PostId.eq(id))
            .order_by_desc(comment::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;

        let mut out = Vec::with_capacity(rows.len());
        for (row, author) in rows {
            let author = author.ok_or_else(|| error::internal("comment author missing"))?;
            out.push(dto::comment_response(row, author));
        }
        Ok(Json(out))
    }

    /// Delete a comment; only its author may do so
    #[oai(path = "/comments/:id", method = "delete")]
    async fn delete_comment(
        &self,
        Path(id): Path<i64>,
        Query(user_id): Query<i64>,
    ) -> poem::Result<Json<dto::MessageResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let c = comment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(error::db)?
            .ok_or_else(|| error::not_found("Comment"))?;
        if c.author_id != user_id {
            return Err(error::forbidden("Not authorized"));
        }
        c.delete(&txn).await.map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;
        Ok(Json(dto::MessageResponse {
            message: "Comment deleted successfully".into(),
        }))
    }
}
