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
use crate::api::{load_forum, load_post, load_user, page, AppState};
use crate::entities::{post, user};
use crate::error;

#[derive(Debug, Object, Validate)]
struct PostCreateRequest {
    #[validate(length(max = 255))]
    title: Option<String>,
    #[validate(length(min = 1))]
    content: String,
    forum_id: i64,
    image_url: Option<String>,
    user_id: i64,
}

pub struct PostsApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl PostsApi {
    /// Create a post
    #[oai(path = "/posts", method = "post")]
    async fn create_post(
        &self,
        Json(req): Json<PostCreateRequest>,
    ) -> poem::Result<Json<dto::PostResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let author = load_user(&txn, req.user_id).await?;
        load_forum(&txn, req.forum_id).await?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let created = post::ActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            image_url: Set(req.image_url),
            author_id: Set(req.user_id),
            forum_id: Set(req.forum_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        let projected = dto::project_post(&txn, created, author)
            .await
            .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(projected))
    }

    /// List posts, newest first
    #[oai(path = "/posts", method = "get")]
    async fn list_posts(
        &self,
        Query(forum_id): Query<Option<i64>>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::PostResponse>>> {
        let db = &self.state.db;
        let (skip, limit) = page(skip, limit);
        let mut q = post::Entity::find().find_also_related(user::Entity);
        if let Some(forum_id) = forum_id {
            q = q.filter(post::Column::ForumId.eq(forum_id));
        }
        let rows = q
            .order_by_desc(post::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;

        let mut out = Vec::with_capacity(rows.len());
        for (row, author) in rows {
            let author = author.ok_or_else(|| error::internal("post author missing"))?;
            out.push(dto::project_post(db, row, author).await.map_err(error::db)?);
        }
        Ok(Json(out))
    }

    #[oai(path = "/posts/:id", method = "get")]
    async fn get_post(&self, Path(id): Path<i64>) -> poem::Result<Json<dto::PostResponse>> {
        let db = &self.state.db;
        let p = load_post(db, id).await?;
        let author = load_user(db, p.author_id).await?;
        let projected = dto::project_post(db, p, author).await.map_err(error::db)?;
        Ok(Json(projected))
    }

    /// Delete a post; only its author may do so
    #[oai(path = "/posts/:id", method = "delete")]
    async fn delete_post(
        &self,
        Path(id): Path<i64>,
        Query(user_id): Query<i64>,
    ) -> poem::Result<Json<dto::MessageResponse>> {
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let p = load_post(&txn, id).await?;
        if p.author_id != user_id {
            return Err(error::forbidden("Not authorized to delete this post"));
        }
        p.delete(&txn).await.map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;
        Ok(Json(dto::MessageResponse {
            message: "Post deleted successfully".into(),
        }))
    }

    /// Most recent posts across all forums
    #[oai(path = "/trending/posts", method = "get")]
    async fn trending_posts(
        &self,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::PostResponse>>> {
        let db = &self.state.db;
        let limit = limit.unwrap_or(10).clamp(1, 100);
        let rows = post::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;

        let mut out = Vec::with_capacity(rows.len());
        for (row, author) in rows {
            let author = author.ok_or_else(|| error::internal("post author missing"))?;
            out.push(dto::project_post(db, row, author).await.map_err(error::db)?);
        }
        Ok(Json(out))
    }
}
