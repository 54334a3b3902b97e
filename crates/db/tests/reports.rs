//! Integration tests for the report aggregator: creation, the by-request
//! lookup contract, and the filtered listing.

use sqlx::PgPool;

use helpdesk_core::types::DbId;
use helpdesk_db::models::lookup::CreateCategory;
use helpdesk_db::models::report::{CreateReport, ReportFilter};
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{CategoryRepo, ReportRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed {
    sender_id: DbId,
    executor_id: DbId,
    category_id: DbId,
}

fn new_user(name: &str, surname: &str, username: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        surname: surname.to_string(),
        username: username.to_string(),
        position: None,
        department: None,
        mob_tel_number: None,
        office_tel_number: None,
        allow_notification: true,
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$test".to_string(),
        profile_photo_id: None,
        role_id: 2,
    }
}

async fn seed(pool: &PgPool) -> Seed {
    let sender = UserRepo::create(pool, &new_user("Leyla", "Aliyeva", "leyla"))
        .await
        .unwrap();
    let executor = UserRepo::create(pool, &new_user("Tural", "Isgandarov", "tural"))
        .await
        .unwrap();
    let category = CategoryRepo::create(pool, &CreateCategory { name: "Billing".into() })
        .await
        .unwrap();

    Seed {
        sender_id: sender.id,
        executor_id: executor.id,
        category_id: category.id,
    }
}

fn new_report(seed: &Seed, request_id: Option<DbId>) -> CreateReport {
    CreateReport {
        user_id: seed.sender_id,
        category_id: seed.category_id,
        priority_id: None,
        type_id: None,
        status_id: None,
        executor_id: Some(seed.executor_id),
        request_id,
        first_operation_date: None,
        operation_time: Some(4),
        planned_operation_time: Some(8),
        result: Some("resolved".to_string()),
        solution: None,
        communication_channel: Some("email".to_string()),
        is_routine: false,
        code: None,
    }
}

// ---------------------------------------------------------------------------
// Creation and hydration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_status_and_hydrates_names(pool: PgPool) {
    let seed = seed(&pool).await;
    let report = ReportRepo::create(&pool, &new_report(&seed, None)).await.unwrap();
    assert_eq!(report.status_id, 1, "status defaults to New");

    let summary = ReportRepo::find_summary(&pool, report.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.sender.as_deref(), Some("Leyla Aliyeva"));
    assert_eq!(summary.executor.as_deref(), Some("Tural Isgandarov"));
    assert_eq!(summary.category_name.as_deref(), Some("Billing"));
    assert_eq!(summary.status_name.as_deref(), Some("New"));
}

// ---------------------------------------------------------------------------
// By-request lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn by_request_returns_none_when_no_report_exists(pool: PgPool) {
    seed(&pool).await;
    let found = ReportRepo::find_by_request_id(&pool, 777).await.unwrap();
    assert!(found.is_none(), "absence is a valid result, not an error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn by_request_returns_most_recent_non_deleted(pool: PgPool) {
    let seed = seed(&pool).await;

    // A request row to hang the reports on.
    let priority_id: DbId =
        sqlx::query_scalar("INSERT INTO priorities (level) VALUES ('High') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let type_id: DbId =
        sqlx::query_scalar("INSERT INTO request_types (name) VALUES ('Incident') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let request_id: DbId = sqlx::query_scalar(
        "INSERT INTO requests (header, text, user_id, category_id, priority_id, type_id)
         VALUES ('Invoice mismatch', 'details', $1, $2, $3, $4)
         RETURNING id",
    )
    .bind(seed.sender_id)
    .bind(seed.category_id)
    .bind(priority_id)
    .bind(type_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let older = ReportRepo::create(&pool, &new_report(&seed, Some(request_id)))
        .await
        .unwrap();
    let newer = ReportRepo::create(&pool, &new_report(&seed, Some(request_id)))
        .await
        .unwrap();
    sqlx::query("UPDATE reports SET created_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(older.id)
        .execute(&pool)
        .await
        .unwrap();

    let found = ReportRepo::find_by_request_id(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, newer.id);

    // Deleting the newest falls back to the older one.
    sqlx::query("UPDATE reports SET deleted_at = NOW() WHERE id = $1")
        .bind(newer.id)
        .execute(&pool)
        .await
        .unwrap();
    let found = ReportRepo::find_by_request_id(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, older.id);
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_searches_joined_display_fields(pool: PgPool) {
    let seed = seed(&pool).await;
    ReportRepo::create(&pool, &new_report(&seed, None)).await.unwrap();

    // Sender full name, case-insensitive.
    let by_sender = ReportFilter {
        search: Some("leyla ali".to_string()),
        ..Default::default()
    };
    let page = ReportRepo::get_filtered(&pool, &by_sender).await.unwrap();
    assert_eq!(page.total_count, 1);

    // Category name.
    let by_category = ReportFilter {
        search: Some("billing".to_string()),
        ..Default::default()
    };
    let page = ReportRepo::get_filtered(&pool, &by_category).await.unwrap();
    assert_eq!(page.total_count, 1);

    // No match.
    let no_match = ReportFilter {
        search: Some("unrelated".to_string()),
        ..Default::default()
    };
    let page = ReportRepo::get_filtered(&pool, &no_match).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_paginates_and_excludes_deleted(pool: PgPool) {
    let seed = seed(&pool).await;
    let mut ids = Vec::new();
    for _ in 0..7 {
        let report = ReportRepo::create(&pool, &new_report(&seed, None)).await.unwrap();
        ids.push(report.id);
    }
    sqlx::query("UPDATE reports SET deleted_at = NOW() WHERE id = $1")
        .bind(ids[0])
        .execute(&pool)
        .await
        .unwrap();

    let filter = ReportFilter {
        page: Some(2),
        page_size: Some(5),
        ..Default::default()
    };
    let page = ReportRepo::get_filtered(&pool, &filter).await.unwrap();
    assert_eq!(page.total_count, 6, "deleted report drops out of the total");
    assert_eq!(page.items.len(), 1);

    let executor_filter = ReportFilter {
        executor_id: Some(seed.executor_id),
        ..Default::default()
    };
    let page = ReportRepo::get_filtered(&pool, &executor_filter).await.unwrap();
    assert_eq!(page.total_count, 6);
}
