mod common;

use common::{seed_forum, seed_post, seed_user, setup_db, ts};
use forum_backend::api::engagement::{apply_vote, toggle_like};
use forum_backend::entities::vote::VoteType;
use forum_backend::entities::{comment, follow, like, post, status_update, user, vote};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

// Deleting a user takes their posts with it, and the engagement rows other
// users left on those posts go too.
#[tokio::test]
async fn deleting_a_user_cascades_transitively() {
    let db = setup_db().await;
    let victim = seed_user(&db, "victim", "victim@example.com").await;
    let bystander = seed_user(&db, "bystander", "bystander@example.com").await;
    let f = seed_forum(&db, victim.id, "general").await;
    let p = seed_post(&db, victim.id, f.id, "soon gone", 0).await;

    comment::ActiveModel {
        content: Set("by someone else".to_owned()),
        author_id: Set(bystander.id),
        post_id: Set(p.id),
        created_at: Set(ts(1)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    toggle_like(&db, bystander.id, p.id).await.unwrap();
    apply_vote(&db, bystander.id, p.id, VoteType::Upvote)
        .await
        .unwrap();
    status_update::ActiveModel {
        content: Set("around for now".to_owned()),
        user_id: Set(victim.id),
        created_at: Set(ts(1)),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    follow::ActiveModel {
        follower_id: Set(bystander.id),
        following_id: Set(victim.id),
        created_at: Set(ts(1)),
    }
    .insert(&db)
    .await
    .unwrap();

    user::Entity::delete_by_id(victim.id).exec(&db).await.unwrap();

    assert_eq!(post::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(comment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(like::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(vote::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(status_update::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(follow::Entity::find().count(&db).await.unwrap(), 0);

    // the bystander and the forum survive
    assert!(user::Entity::find_by_id(bystander.id)
        .one(&db)
        .await
        .unwrap()
        .is_some());
}
