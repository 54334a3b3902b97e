//! Integration tests for the request lifecycle: executor claiming, status
//! transitions with their report side effect, history emission, and the
//! delete cascade.

use sqlx::PgPool;

use helpdesk_core::status::{
    STATUS_CLOSED, STATUS_DENIED, STATUS_IN_PROGRESS, STATUS_NEW, STATUS_ON_HOLD,
};
use helpdesk_core::types::DbId;
use helpdesk_db::models::comment::CreateComment;
use helpdesk_db::models::lookup::{CreateCategory, CreatePriority, CreateRequestType};
use helpdesk_db::models::report::CreateReport;
use helpdesk_db::models::request::{ClaimOutcome, CreateRequest};
use helpdesk_db::models::response::CreateResponse;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{
    CategoryRepo, CommentRepo, HistoryRepo, PriorityRepo, ReportRepo, RequestRepo,
    RequestTypeRepo, ResponseRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed {
    user_id: DbId,
    executor_id: DbId,
    category_id: DbId,
    priority_id: DbId,
    type_id: DbId,
}

fn new_user(username: &str, email: &str) -> CreateUser {
    CreateUser {
        name: "Leyla".to_string(),
        surname: "Aliyeva".to_string(),
        username: username.to_string(),
        position: Some("Engineer".to_string()),
        department: None,
        mob_tel_number: None,
        office_tel_number: None,
        allow_notification: true,
        email: email.to_string(),
        password_hash: "$argon2id$test".to_string(),
        profile_photo_id: None,
        role_id: 2,
    }
}

async fn seed(pool: &PgPool) -> Seed {
    let user = UserRepo::create(pool, &new_user("creator", "creator@example.com"))
        .await
        .unwrap();
    let executor = UserRepo::create(pool, &new_user("executor", "executor@example.com"))
        .await
        .unwrap();
    let category = CategoryRepo::create(
        pool,
        &CreateCategory {
            name: "Hardware".to_string(),
        },
    )
    .await
    .unwrap();
    let priority = PriorityRepo::create(
        pool,
        &CreatePriority {
            level: "High".to_string(),
        },
    )
    .await
    .unwrap();
    let req_type = RequestTypeRepo::create(
        pool,
        &CreateRequestType {
            name: "Incident".to_string(),
        },
    )
    .await
    .unwrap();

    Seed {
        user_id: user.id,
        executor_id: executor.id,
        category_id: category.id,
        priority_id: priority.id,
        type_id: req_type.id,
    }
}

fn new_request(seed: &Seed, header: &str, text: &str) -> CreateRequest {
    CreateRequest {
        header: header.to_string(),
        text: text.to_string(),
        user_id: seed.user_id,
        category_id: seed.category_id,
        priority_id: seed.priority_id,
        type_id: seed.type_id,
        file_id: None,
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_to_new_status(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Printer broken", "It smokes"))
        .await
        .unwrap();

    assert_eq!(request.status_id, STATUS_NEW);
    assert!(request.executor_id.is_none());
    assert!(request.first_operation_date.is_none());
}

// ---------------------------------------------------------------------------
// Claiming
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_sets_executor_status_and_first_operation_date(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Printer broken", "no output"))
        .await
        .unwrap();

    let outcome = RequestRepo::claim(&pool, request.id, seed.executor_id)
        .await
        .unwrap();
    assert_eq!(outcome, ClaimOutcome::Claimed);

    let claimed = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claimed.executor_id, Some(seed.executor_id));
    assert_eq!(claimed.status_id, STATUS_IN_PROGRESS);
    assert!(
        claimed.first_operation_date.is_some(),
        "first claim must stamp first_operation_date"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_claim_fails_and_leaves_state_unchanged(pool: PgPool) {
    let seed = seed(&pool).await;
    let other = UserRepo::create(&pool, &new_user("rival", "rival@example.com"))
        .await
        .unwrap();
    let request = RequestRepo::create(&pool, &new_request(&seed, "VPN down", "cannot connect"))
        .await
        .unwrap();

    assert_eq!(
        RequestRepo::claim(&pool, request.id, seed.executor_id)
            .await
            .unwrap(),
        ClaimOutcome::Claimed
    );
    let after_first = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        RequestRepo::claim(&pool, request.id, other.id).await.unwrap(),
        ClaimOutcome::AlreadyTaken
    );

    let after_second = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_second.executor_id, Some(seed.executor_id));
    assert_eq!(
        after_second.first_operation_date,
        after_first.first_operation_date,
        "a losing claim must not touch first_operation_date"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_on_missing_request_reports_not_found(pool: PgPool) {
    let seed = seed(&pool).await;
    let outcome = RequestRepo::claim(&pool, 9999, seed.executor_id).await.unwrap();
    assert_eq!(outcome, ClaimOutcome::NotFound);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_operation_date_survives_later_transitions(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Monitor flicker", "daily"))
        .await
        .unwrap();

    RequestRepo::claim(&pool, request.id, seed.executor_id)
        .await
        .unwrap();
    let stamped = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap()
        .first_operation_date;

    for status in [STATUS_ON_HOLD, STATUS_IN_PROGRESS, STATUS_NEW, STATUS_IN_PROGRESS] {
        RequestRepo::change_status(&pool, request.id, status, seed.executor_id)
            .await
            .unwrap();
    }

    let after = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.first_operation_date, stamped);
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_status_records_transition_label(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Badge reader", "stuck"))
        .await
        .unwrap();

    let label = RequestRepo::change_status(&pool, request.id, STATUS_IN_PROGRESS, seed.executor_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label, "took ownership");

    let history = HistoryRepo::list_by_request(&pool, request.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].description.as_deref(), Some("took ownership"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_status_on_missing_request_returns_none(pool: PgPool) {
    let seed = seed(&pool).await;
    let result = RequestRepo::change_status(&pool, 4242, STATUS_DENIED, seed.user_id)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closing_updates_linked_report(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Disk full", "server-3"))
        .await
        .unwrap();
    ReportRepo::create(
        &pool,
        &CreateReport {
            user_id: seed.user_id,
            category_id: seed.category_id,
            priority_id: Some(seed.priority_id),
            type_id: Some(seed.type_id),
            status_id: None,
            executor_id: Some(seed.executor_id),
            request_id: Some(request.id),
            first_operation_date: None,
            operation_time: None,
            planned_operation_time: None,
            result: None,
            solution: None,
            communication_channel: None,
            is_routine: false,
            code: None,
        },
    )
    .await
    .unwrap();

    let label = RequestRepo::change_status(&pool, request.id, STATUS_CLOSED, seed.executor_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label, "closed the request");

    let report = ReportRepo::find_by_request_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.status_name.as_deref(), Some("Closed"));
    assert!(report.close_date.is_some(), "closing must stamp close_date");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closing_without_report_still_succeeds(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Wifi drops", "floor 2"))
        .await
        .unwrap();

    let label = RequestRepo::change_status(&pool, request.id, STATUS_CLOSED, seed.executor_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label, "closed the request");

    let history = HistoryRepo::list_by_request(&pool, request.id).await.unwrap();
    assert_eq!(history.len(), 1, "history row is appended even without a report");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_is_append_only_one_row_per_operation(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Keyboard", "keys missing"))
        .await
        .unwrap();

    let transitions = [
        STATUS_IN_PROGRESS,
        STATUS_ON_HOLD,
        STATUS_IN_PROGRESS,
        STATUS_DENIED,
        STATUS_NEW,
    ];
    for status in transitions {
        RequestRepo::change_status(&pool, request.id, status, seed.executor_id)
            .await
            .unwrap();
    }

    let count = HistoryRepo::count_by_request(&pool, request.id).await.unwrap();
    assert_eq!(count, transitions.len() as i64);

    // Newest first on read.
    let history = HistoryRepo::list_by_request(&pool, request.id).await.unwrap();
    assert_eq!(
        history[0].description.as_deref(),
        Some("reopened the request")
    );
    for pair in history.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

// ---------------------------------------------------------------------------
// Response side effect and delete cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_on_new_request_moves_it_to_completed(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Password reset", "locked out"))
        .await
        .unwrap();

    ResponseRepo::create(
        &pool,
        &CreateResponse {
            text: "Reset and verified".to_string(),
            request_id: request.id,
            status_id: 1,
            user_id: seed.executor_id,
            file_id: None,
        },
    )
    .await
    .unwrap();

    let after = RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status_id, 3, "New + response => Completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_response_but_not_comments_or_history(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Projector", "no signal"))
        .await
        .unwrap();

    ResponseRepo::create(
        &pool,
        &CreateResponse {
            text: "Replaced the cable".to_string(),
            request_id: request.id,
            status_id: 1,
            user_id: seed.executor_id,
            file_id: None,
        },
    )
    .await
    .unwrap();
    CommentRepo::create(
        &pool,
        &CreateComment {
            text: "Happens every Monday".to_string(),
            request_id: request.id,
            user_id: seed.user_id,
            attachment_id: None,
        },
    )
    .await
    .unwrap();
    RequestRepo::change_status(&pool, request.id, STATUS_IN_PROGRESS, seed.executor_id)
        .await
        .unwrap();

    let cascade = RequestRepo::soft_delete(&pool, request.id)
        .await
        .unwrap()
        .expect("request should be deletable");
    assert!(cascade.file_id.is_none());

    assert!(RequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .is_none());
    assert!(ResponseRepo::find_by_request_id(&pool, request.id)
        .await
        .unwrap()
        .is_none());

    // Comments and history survive for audit.
    let comments = CommentRepo::list_by_request(&pool, request.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let history_count = HistoryRepo::count_by_request(&pool, request.id).await.unwrap();
    assert_eq!(history_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_twice_reports_not_found(pool: PgPool) {
    let seed = seed(&pool).await;
    let request = RequestRepo::create(&pool, &new_request(&seed, "Chair", "broken wheel"))
        .await
        .unwrap();

    assert!(RequestRepo::soft_delete(&pool, request.id)
        .await
        .unwrap()
        .is_some());
    assert!(
        RequestRepo::soft_delete(&pool, request.id)
            .await
            .unwrap()
            .is_none(),
        "second delete must see no active row"
    );
}
