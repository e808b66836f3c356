// ABOUTME: Integration tests for recipient storage
// ABOUTME: Covers registration, duplicate phones, and the identity check

use hemobank_core::{BloodGroup, Sex, UrgencyLevel};
use hemobank_recipients::{RecipientCreateInput, RecipientError, RecipientStorage};
use sqlx::SqlitePool;

async fn create_test_db() -> SqlitePool {
    hemobank_storage::connect("sqlite::memory:").await.unwrap()
}

fn asha() -> RecipientCreateInput {
    RecipientCreateInput {
        name: "Asha Rao".to_string(),
        age: 40,
        sex: Sex::Female,
        phone: "9000000001".to_string(),
        blood_group: BloodGroup::BPositive,
        hospital: Some("Apollo Hospital".to_string()),
        doctor: None,
        address: None,
        urgency: UrgencyLevel::Urgent,
        purpose: Some("Surgery".to_string()),
    }
}

#[tokio::test]
async fn register_and_get_roundtrip() {
    let pool = create_test_db().await;
    let storage = RecipientStorage::new(pool);

    let recipient = storage.register(asha()).await.unwrap();

    assert_eq!(recipient.name, "Asha Rao");
    assert_eq!(recipient.blood_group, BloodGroup::BPositive);
    assert_eq!(recipient.urgency, UrgencyLevel::Urgent);

    let fetched = storage.get(recipient.id).await.unwrap();
    assert_eq!(fetched.phone, "9000000001");
}

#[tokio::test]
async fn duplicate_phone_reports_existing_id() {
    let pool = create_test_db().await;
    let storage = RecipientStorage::new(pool);

    let first = storage.register(asha()).await.unwrap();

    let mut again = asha();
    again.name = "Someone Else".to_string();
    let err = storage.register(again).await.unwrap_err();

    match err {
        RecipientError::DuplicatePhone { existing_id } => assert_eq!(existing_id, first.id),
        other => panic!("expected DuplicatePhone, got {other:?}"),
    }
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn identity_check_requires_both_id_and_name() {
    let pool = create_test_db().await;
    let storage = RecipientStorage::new(pool);

    let recipient = storage.register(asha()).await.unwrap();

    assert!(storage
        .find_by_identity(recipient.id, "Asha Rao")
        .await
        .unwrap()
        .is_some());
    assert!(storage
        .find_by_identity(recipient.id, "Asha Roa")
        .await
        .unwrap()
        .is_none());
    assert!(storage
        .find_by_identity(recipient.id + 1, "Asha Rao")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn list_is_newest_first() {
    let pool = create_test_db().await;
    let storage = RecipientStorage::new(pool);

    let first = storage.register(asha()).await.unwrap();
    let mut second = asha();
    second.phone = "9000000002".to_string();
    second.name = "Bharath Kumar".to_string();
    let second = storage.register(second).await.unwrap();

    let all = storage.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}
