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

use crate::api::{load_forum, load_user, page, AppState};
use crate::api::dto;
use crate::entities::forum::{self, ForumCategory};
use crate::error;

#[derive(Debug, Object, Validate)]
struct ForumCreateRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    description: Option<String>,
    category: ForumCategory,
}

pub struct ForumsApi {
    pub state: Arc<AppState>,
}

#[OpenApi]
impl ForumsApi {
    /// Create a forum; the creator is passed explicitly
    #[oai(path = "/forums", method = "post")]
    async fn create_forum(
        &self,
        Query(user_id): Query<i64>,
        Json(req): Json<ForumCreateRequest>,
    ) -> poem::Result<Json<dto::ForumResponse>> {
        req.validate().map_err(|e| error::invalid(e.to_string()))?;
        let txn = self.state.db.begin().await.map_err(error::db)?;
        load_user(&txn, user_id).await?;

        if forum::Entity::find()
            .filter(forum::Column::Name.eq(req.name.as_str()))
            .one(&txn)
            .await
            .map_err(error::db)?
            .is_some()
        {
            return Err(error::conflict("Forum name already exists"));
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let created = forum::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            category: Set(req.category),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(error::db)?;
        txn.commit().await.map_err(error::db)?;

        Ok(Json(created.into()))
    }

    /// List forums, optionally filtered by category
    #[oai(path = "/forums", method = "get")]
    async fn list_forums(
        &self,
        Query(category): Query<Option<ForumCategory>>,
        Query(skip): Query<Option<u64>>,
        Query(limit): Query<Option<u64>>,
    ) -> poem::Result<Json<Vec<dto::ForumResponse>>> {
        let (skip, limit) = page(skip, limit);
        let mut q = forum::Entity::find();
        if let Some(category) = category {
            q = q.filter(forum::Column::Category.eq(category));
        }
        let rows = q
            .order_by_desc(forum::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.state.db)
            .await
            .map_err(error::db)?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/forums/:id", method = "get")]
    async fn get_forum(&self, Path(id): Path<i64>) -> poem::Result<Json<dto::ForumResponse>> {
        let f = load_forum(&self.state.db, id).await?;
        Ok(Json(f.into()))
    }
}
