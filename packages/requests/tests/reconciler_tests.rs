// ABOUTME: Integration tests for blood request resolution
// ABOUTME: Approval and stock must move together, including under concurrency

use hemobank_core::{AuthContext, BloodGroup};
use hemobank_requests::{RequestCreateInput, RequestError, RequestStatus, RequestStorage, ResolveAction};
use hemobank_stock::{StockLedger, StockOperation};
use sqlx::SqlitePool;

async fn create_test_db() -> SqlitePool {
    hemobank_storage::connect("sqlite::memory:").await.unwrap()
}

fn admin() -> AuthContext {
    AuthContext::admin(1)
}

async fn seed_recipient(pool: &SqlitePool, name: &str, phone: &str) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO recipients (name, age, sex, phone, blood_group, registered_at)
        VALUES (?, 45, 'Female', ?, 'B+', ?)
        "#,
    )
    .bind(name)
    .bind(phone)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

fn request_for(recipient_id: i64, name: &str, quantity: i64) -> RequestCreateInput {
    RequestCreateInput {
        recipient_id,
        recipient_name: name.to_string(),
        blood_group: BloodGroup::BPositive,
        quantity,
        urgency: Default::default(),
        purpose: Some("Surgery".to_string()),
        hospital: Some("Apollo Hospital".to_string()),
    }
}

#[tokio::test]
async fn submit_requires_matching_recipient_identity() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());

    let id = seed_recipient(&pool, "Meera Pillai", "9000000010").await;

    let request = storage
        .submit(request_for(id, "Meera Pillai", 2))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    assert!(matches!(
        storage
            .submit(request_for(id, "Someone Else", 2))
            .await
            .unwrap_err(),
        RequestError::InvalidRecipient
    ));
    assert!(matches!(
        storage
            .submit(request_for(id + 50, "Meera Pillai", 2))
            .await
            .unwrap_err(),
        RequestError::InvalidRecipient
    ));
}

#[tokio::test]
async fn approve_deducts_stock_and_retains_the_request() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 5, StockOperation::Set)
        .await
        .unwrap();

    let request = storage
        .submit(request_for(rid, "Meera Pillai", 2))
        .await
        .unwrap();

    let resolved = storage
        .resolve(&admin(), request.id, ResolveAction::Approve)
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);

    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 3);

    // The resolved request stays on the books.
    let listed = storage.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, RequestStatus::Approved);
}

#[tokio::test]
async fn reject_leaves_stock_untouched() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 5, StockOperation::Set)
        .await
        .unwrap();

    let request = storage
        .submit(request_for(rid, "Meera Pillai", 2))
        .await
        .unwrap();
    let resolved = storage
        .resolve(&admin(), request.id, ResolveAction::Reject)
        .await
        .unwrap();

    assert_eq!(resolved.status, RequestStatus::Rejected);
    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 5);
}

#[tokio::test]
async fn insufficient_stock_fails_and_keeps_the_request_pending() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 3, StockOperation::Set)
        .await
        .unwrap();

    let request = storage
        .submit(request_for(rid, "Meera Pillai", 10))
        .await
        .unwrap();

    let err = storage
        .resolve(&admin(), request.id, ResolveAction::Approve)
        .await
        .unwrap_err();
    match err {
        RequestError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 3);
            assert_eq!(requested, 10);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing moved: stock intact, request still pending and retryable.
    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 3);
    assert_eq!(
        storage.get(request.id).await.unwrap().status,
        RequestStatus::Pending
    );
}

#[tokio::test]
async fn missing_stock_row_counts_as_empty() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    let request = storage
        .submit(request_for(rid, "Meera Pillai", 1))
        .await
        .unwrap();

    assert!(matches!(
        storage
            .resolve(&admin(), request.id, ResolveAction::Approve)
            .await
            .unwrap_err(),
        RequestError::InsufficientStock { available: 0, .. }
    ));
}

#[tokio::test]
async fn resolving_twice_is_rejected_without_a_second_deduction() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 5, StockOperation::Set)
        .await
        .unwrap();

    let request = storage
        .submit(request_for(rid, "Meera Pillai", 2))
        .await
        .unwrap();
    storage
        .resolve(&admin(), request.id, ResolveAction::Approve)
        .await
        .unwrap();

    for action in [ResolveAction::Approve, ResolveAction::Reject] {
        assert!(matches!(
            storage
                .resolve(&admin(), request.id, action)
                .await
                .unwrap_err(),
            RequestError::AlreadyResolved
        ));
    }

    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 3);
}

#[tokio::test]
async fn resolve_requires_the_admin_role() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    let request = storage
        .submit(request_for(rid, "Meera Pillai", 1))
        .await
        .unwrap();

    assert!(matches!(
        storage
            .resolve(&AuthContext::donor(7), request.id, ResolveAction::Approve)
            .await
            .unwrap_err(),
        RequestError::Unauthorized(_)
    ));
}

#[tokio::test]
async fn sequential_approvals_reconcile_against_the_same_counter() {
    let pool = create_test_db().await;
    let storage = RequestStorage::new(pool.clone());
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 5, StockOperation::Set)
        .await
        .unwrap();

    let first = storage
        .submit(request_for(rid, "Meera Pillai", 2))
        .await
        .unwrap();
    let second = storage
        .submit(request_for(rid, "Meera Pillai", 4))
        .await
        .unwrap();

    storage
        .resolve(&admin(), first.id, ResolveAction::Approve)
        .await
        .unwrap();

    // 3 units left; the second request needs 4 and must fail cleanly.
    assert!(matches!(
        storage
            .resolve(&admin(), second.id, ResolveAction::Approve)
            .await
            .unwrap_err(),
        RequestError::InsufficientStock { available: 3, .. }
    ));

    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 3);
}

#[tokio::test]
async fn concurrent_approvals_never_oversubscribe_stock() {
    // File-backed database so the two resolves run on separate connections.
    let dir = tempfile::tempdir().unwrap();
    let pool = hemobank_storage::connect_file(&dir.path().join("bank.db"))
        .await
        .unwrap();
    let ledger = StockLedger::new(pool.clone());

    let rid = seed_recipient(&pool, "Meera Pillai", "9000000010").await;
    ledger
        .update(&admin(), BloodGroup::BPositive, 4, StockOperation::Set)
        .await
        .unwrap();

    let setup = RequestStorage::new(pool.clone());
    let first = setup
        .submit(request_for(rid, "Meera Pillai", 3))
        .await
        .unwrap();
    let second = setup
        .submit(request_for(rid, "Meera Pillai", 3))
        .await
        .unwrap();

    let pool_a = pool.clone();
    let pool_b = pool.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            RequestStorage::new(pool_a)
                .resolve(&AuthContext::admin(1), first.id, ResolveAction::Approve)
                .await
        }),
        tokio::spawn(async move {
            RequestStorage::new(pool_b)
                .resolve(&AuthContext::admin(1), second.id, ResolveAction::Approve)
                .await
        }),
    );

    let outcomes = [a.unwrap(), b.unwrap()];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();

    // With 4 units and two requests for 3, at most one approval can land,
    // and the stock must reflect exactly the approvals that did.
    assert!(successes <= 1);
    let approved: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM blood_requests WHERE status = 'APPROVED'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(approved as usize, successes);

    let stock = ledger.get(BloodGroup::BPositive).await.unwrap().unwrap();
    assert_eq!(stock.quantity, 4 - 3 * approved);
    assert!(stock.quantity >= 0);
}
