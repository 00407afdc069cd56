use std::sync::Arc;

use poem::{middleware::Cors, Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

use crate::entities::{forum, post, user};
use crate::error;

pub mod comments;
pub mod dto;
pub mod engagement;
pub mod follows;
pub mod forums;
pub mod posts;
pub mod status;
pub mod users;

pub struct AppState {
    pub db: DatabaseConnection,
}

/// Assemble the full application: API under `/api`, Swagger UI at `/`.
pub fn build_app(db: DatabaseConnection) -> impl Endpoint {
    let state = Arc::new(AppState { db });
    let api = OpenApiService::new(
        (
            users::UsersApi {
                state: state.clone(),
            },
            forums::ForumsApi {
                state: state.clone(),
            },
            posts::PostsApi {
                state: state.clone(),
            },
            comments::CommentsApi {
                state: state.clone(),
            },
            engagement::EngagementApi {
                state: state.clone(),
            },
            follows::FollowsApi {
                state: state.clone(),
            },
            status::StatusApi { state },
        ),
        "Forum API",
        "1.0",
    )
    .server("/api");
    let ui = api.swagger_ui();

    Route::new()
        .nest("/api", api)
        .nest("/", ui)
        .with(Cors::new())
}

pub(crate) async fn load_user<C>(conn: &C, id: i64) -> poem::Result<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(error::db)?
        .ok_or_else(|| error::not_found("User"))
}

pub(crate) async fn load_post<C>(conn: &C, id: i64) -> poem::Result<post::Model>
where
    C: ConnectionTrait,
{
    post::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(error::db)?
        .ok_or_else(|| error::not_found("Post"))
}

pub(crate) async fn load_forum<C>(conn: &C, id: i64) -> poem::Result<forum::Model>
where
    C: ConnectionTrait,
{
    forum::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(error::db)?
        .ok_or_else(|| error::not_found("Forum"))
}

pub(crate) fn page(skip: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    (skip.unwrap_or(0), limit.unwrap_or(20).clamp(1, 100))
}
