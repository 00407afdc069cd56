//! Response shapes. Posts and profiles carry aggregate counts that are
//! recomputed from live child rows on every read, never stored.

use poem_openapi::Object;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::forum::ForumCategory;
use crate::entities::vote::VoteType;
use crate::entities::{comment, follow, forum, like, post, status_update, user, vote};

#[derive(Debug, Clone, Object)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            avatar_url: u.avatar_url,
            bio: u.bio,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Object)]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
}

#[derive(Debug, Object)]
pub struct ForumResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: ForumCategory,
    pub created_at: DateTimeWithTimeZone,
}

impl From<forum::Model> for ForumResponse {
    fn from(f: forum::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            category: f.category,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Object)]
pub struct PostResponse {
    pub id: i64,
    pub title: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub author: UserResponse,
    pub forum_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub likes_count: u64,
    pub comments_count: u64,
    pub votes_count: i64,
}

#[derive(Debug, Object)]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub author: UserResponse,
    pub post_id: i64,
    pub created_at: DateTimeWithTimeZone,
}

pub fn comment_response(c: comment::Model, author: user::Model) -> CommentResponse {
    CommentResponse {
        id: c.id,
        content: c.content,
        author: author.into(),
        post_id: c.post_id,
        created_at: c.created_at,
    }
}

#[derive(Debug, Object)]
pub struct StatusUpdateResponse {
    pub id: i64,
    pub content: String,
    pub user: UserResponse,
    pub created_at: DateTimeWithTimeZone,
}

pub fn status_response(s: status_update::Model, author: user::Model) -> StatusUpdateResponse {
    StatusUpdateResponse {
        id: s.id,
        content: s.content,
        user: author.into(),
        created_at: s.created_at,
    }
}

#[derive(Debug, Object)]
pub struct VoteSummaryResponse {
    pub upvotes: u64,
    pub downvotes: u64,
    pub total: i64,
}

#[derive(Debug, Object)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Object)]
pub struct LikeResponse {
    pub message: String,
    pub liked: bool,
}

pub async fn vote_summary<C>(conn: &C, post_id: i64) -> Result<VoteSummaryResponse, DbErr>
where
    C: ConnectionTrait,
{
    let upvotes = vote::Entity::find()
        .filter(vote::Column::PostId.eq(post_id))
        .filter(vote::Column::VoteType.eq(VoteType::Upvote))
        .count(conn)
        .await?;
    let downvotes = vote::Entity::find()
        .filter(vote::Column::PostId.eq(post_id))
        .filter(vote::Column::VoteType.eq(VoteType::Downvote))
        .count(conn)
        .await?;
    Ok(VoteSummaryResponse {
        upvotes,
        downvotes,
        total: upvotes as i64 - downvotes as i64,
    })
}

pub async fn project_post<C>(
    conn: &C,
    p: post::Model,
    author: user::Model,
) -> Result<PostResponse, DbErr>
where
    C: ConnectionTrait,
{
    let likes_count = like::Entity::find()
        .filter(like::Column::PostId.eq(p.id))
        .count(conn)
        .await?;
    let comments_count = comment::Entity::find()
        .filter(comment::Column::PostId.eq(p.id))
        .count(conn)
        .await?;
    let votes = vote_summary(conn, p.id).await?;
    Ok(PostResponse {
        id: p.id,
        title: p.title,
        content: p.content,
        image_url: p.image_url,
        author: author.into(),
        forum_id: p.forum_id,
        created_at: p.created_at,
        likes_count,
        comments_count,
        votes_count: votes.total,
    })
}

pub async fn project_profile<C>(conn: &C, u: user::Model) -> Result<UserProfileResponse, DbErr>
where
    C: ConnectionTrait,
{
    let followers_count = follow::Entity::find()
        .filter(follow::Column::FollowingId.eq(u.id))
        .count(conn)
        .await?;
    let following_count = follow::Entity::find()
        .filter(follow::Column::FollowerId.eq(u.id))
        .count(conn)
        .await?;
    let posts_count = post::Entity::find()
        .filter(post::Column::AuthorId.eq(u.id))
        .count(conn)
        .await?;
    Ok(UserProfileResponse {
        id: u.id,
        username: u.username,
        email: u.email,
        avatar_url: u.avatar_url,
        bio: u.bio,
        created_at: u.created_at,
        followers_count,
        following_count,
        posts_count,
    })
}
