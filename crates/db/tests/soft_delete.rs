//! Integration tests for soft-delete behaviour across entity types:
//! deleted rows must vanish from every find/list path while staying in
//! the table.

use sqlx::PgPool;

use helpdesk_core::types::DbId;
use helpdesk_db::models::lookup::{CreateCategory, CreatePriority, CreateRequestType};
use helpdesk_db::models::request::{CreateRequest, RequestFilter};
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{
    CategoryRepo, PriorityRepo, RequestRepo, RequestTypeRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed {
    user_id: DbId,
    category_id: DbId,
    priority_id: DbId,
    type_id: DbId,
}

async fn seed(pool: &PgPool) -> Seed {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Nigar".to_string(),
            surname: "Hasanova".to_string(),
            username: "nigar".to_string(),
            position: None,
            department: None,
            mob_tel_number: None,
            office_tel_number: None,
            allow_notification: true,
            email: "nigar@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            profile_photo_id: None,
            role_id: 2,
        },
    )
    .await
    .unwrap();
    let category = CategoryRepo::create(pool, &CreateCategory { name: "Access".into() })
        .await
        .unwrap();
    let priority = PriorityRepo::create(pool, &CreatePriority { level: "Low".into() })
        .await
        .unwrap();
    let req_type = RequestTypeRepo::create(pool, &CreateRequestType { name: "Change".into() })
        .await
        .unwrap();

    Seed {
        user_id: user.id,
        category_id: category.id,
        priority_id: priority.id,
        type_id: req_type.id,
    }
}

fn new_request(seed: &Seed, header: &str) -> CreateRequest {
    CreateRequest {
        header: header.to_string(),
        text: "details".to_string(),
        user_id: seed.user_id,
        category_id: seed.category_id,
        priority_id: seed.priority_id,
        type_id: seed.type_id,
        file_id: None,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_request_is_hidden_from_find_and_lists(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Hidden soon"))
        .await
        .unwrap();

    RequestRepo::soft_delete(&pool, request.id).await.unwrap();

    assert!(RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .is_none());
    assert!(RequestRepo::find_summary(&pool, request.id)
        .await
        .unwrap()
        .is_none());
    assert!(RequestRepo::find_detail(&pool, request.id)
        .await
        .unwrap()
        .is_none());

    let all = RequestRepo::list(&pool).await.unwrap();
    assert!(all.iter().all(|r| r.id != request.id));

    let filtered = RequestRepo::get_filtered(&pool, &RequestFilter::default())
        .await
        .unwrap();
    assert_eq!(filtered.total_count, 0);
    assert!(filtered.status_counts.is_empty());

    // The row itself is still in the table.
    let raw: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM requests WHERE id = $1")
            .bind(request.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(raw, 1, "soft delete must not physically remove the row");
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_category_is_hidden_from_list(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &CreateCategory { name: "Legacy".into() })
        .await
        .unwrap();

    let deleted = CategoryRepo::soft_delete(&pool, category.id).await.unwrap();
    assert!(deleted, "first delete reports success");

    let again = CategoryRepo::soft_delete(&pool, category.id).await.unwrap();
    assert!(!again, "second delete sees no active row");

    let all = CategoryRepo::list(&pool).await.unwrap();
    assert!(all.iter().all(|c| c.id != category.id));
    assert!(CategoryRepo::find_by_id(&pool, category.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_user_is_hidden_from_find_and_list(pool: PgPool) {
    let seed = seed(&pool).await;

    let deleted = UserRepo::soft_delete(&pool, seed.user_id).await.unwrap();
    assert!(deleted);

    assert!(UserRepo::find_by_id(&pool, seed.user_id)
        .await
        .unwrap()
        .is_none());
    assert!(UserRepo::find_by_username(&pool, "nigar")
        .await
        .unwrap()
        .is_none());

    let all = UserRepo::list(&pool).await.unwrap();
    assert!(all.iter().all(|u| u.id != seed.user_id));
}
