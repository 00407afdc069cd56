use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use validator::Validate;

use crate::api::dto;
use crate::api::{load_user, AppState};
use crate::entities::status_update;
use crate::error;

#[derive(Debug, Object, Validate)]
struct StatusCreateRequest {
    #[validate(length(min = 1))]
    content: String,
    user_id: i64,
}

pub struct StatusApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl StatusApi {
    /// Post a status update
    #[oai(path = "/status", method = "post")]
    async fn create_status(
        &self,
        Json(req): Json<StatusCreateRequest>,
    ) -> poem::Result<Json<dto::StatusUpdateResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;
        let author = load_user(&txn, req.user_id).await?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let created = status_update::ActiveModel {
            content: Set(req.content),
            user_id: Set(req.user_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(dto::status_response(created, author)))
    }

    /// A user's status updates, newest first
    #[oai(path = "/users/:id/status", method = "get")]
    async fn user_status(
        &self,
        Path(id): Path<i64>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::StatusUpdateResponse>>> {
        let db = &self.state.db;
        let author = load_user(db, id).await?;
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(10).clamp(1, 100);
        let rows = status_update::Entity::find()
            .filter(status_update::Column::UserId.eq(id))
            .order_by_desc(status_update::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
            .map_err(error::db)?;
        Ok(Json(
            rows.into_iter()
                .map(|s| dto::status_response(s, author.clone()))
                .collect(),
        ))
    }
}
