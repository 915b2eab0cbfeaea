//! Unit tests for medicine service

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::medicine::{Medicine, MedicineDraft, MedicineStatus, MedicineUpdate};
use crate::domain::entities::user::User;
use crate::domain::value_objects::ImageUpload;
use crate::errors::{DomainError, ValidationError};
use crate::repositories::{MedicineRepository, MockMedicineRepository, MockUserRepository, UserRepository};
use crate::services::medicine::MedicineService;
use crate::services::sweeper::{ExpirySweeper, SweeperConfig};

use super::mocks::RecordingImageStorage;

struct Harness {
    service: MedicineService,
    medicines: MockMedicineRepository,
    storage: Arc<RecordingImageStorage>,
    donor: User,
}

async fn harness_with(storage: RecordingImageStorage) -> Harness {
    let users = MockUserRepository::new();
    let donor = users
        .create(User::new(
            "Farah".to_string(),
            "farah@example.com".to_string(),
            "9988776655".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();
    let medicines = MockMedicineRepository::new(users);
    let storage = Arc::new(storage);
    let service = MedicineService::new(Arc::new(medicines.clone()), storage.clone());
    Harness {
        service,
        medicines,
        storage,
        donor,
    }
}

async fn harness() -> Harness {
    harness_with(RecordingImageStorage::default()).await
}

fn draft(quantity: i64, expires_in: Duration) -> MedicineDraft {
    MedicineDraft {
        name: Some("Metformin".to_string()),
        description: Some("Sealed strip".to_string()),
        expiry_date: Some(Utc::now() + expires_in),
        quantity: Some(quantity),
        city: Some("Jaipur".to_string()),
    }
}

fn image() -> ImageUpload {
    ImageUpload::new("strip.jpg", Some("image/jpeg".to_string()), vec![0xFF, 0xD8, 0xFF])
}

#[tokio::test]
async fn test_lifecycle_scenario() {
    let h = harness().await;
    let donor = h.donor.id;

    let rejected = h.service.create(donor, draft(0, Duration::days(1)), None).await;
    assert!(matches!(
        rejected,
        Err(DomainError::ValidationErr(ValidationError::OutOfRange { .. }))
    ));

    let item = h.service.create(donor, draft(3, Duration::days(1)), None).await.unwrap();
    assert_eq!(item.status, MedicineStatus::Private);
    assert!(h.service.discover().await.unwrap().is_empty());

    let published = h.service.publish(item.id, donor).await.unwrap();
    assert_eq!(published.status, MedicineStatus::Available);
    let feed = h.service.discover().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].donor.name, "Farah");
    assert_eq!(feed[0].donor.phone, "9988776655");

    let later = Utc::now() + Duration::days(2);
    let sweeper = ExpirySweeper::new(Arc::new(h.medicines.clone()), SweeperConfig::default());
    assert_eq!(sweeper.run_sweep_at(later).await.unwrap().expired, 1);

    assert!(h.service.discover_at(later).await.unwrap().is_empty());
    let mine = h.service.list_mine(donor).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, MedicineStatus::Expired);
}

#[tokio::test]
async fn test_create_requires_fields() {
    let h = harness().await;
    let mut missing_city = draft(1, Duration::days(3));
    missing_city.city = None;

    let result = h.service.create(h.donor.id, missing_city, None).await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { ref field })) if field == "city"
    ));
}

#[tokio::test]
async fn test_create_with_image() {
    let h = harness().await;
    let item = h
        .service
        .create(h.donor.id, draft(1, Duration::days(3)), Some(image()))
        .await
        .unwrap();

    assert_eq!(item.image_url.as_deref(), Some("https://images.test/strip.jpg"));
    assert_eq!(h.storage.upload_count(), 1);
}

#[tokio::test]
async fn test_failed_upload_still_creates_item() {
    let h = harness_with(RecordingImageStorage::failing()).await;
    let item = h
        .service
        .create(h.donor.id, draft(1, Duration::days(3)), Some(image()))
        .await
        .unwrap();

    assert!(item.image_url.is_none());
    assert_eq!(h.storage.upload_count(), 1);
    assert!(h.medicines.find_by_id(item.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_non_owner_is_forbidden_and_nothing_changes() {
    let h = harness().await;
    let item = h.service.create(h.donor.id, draft(4, Duration::days(3)), None).await.unwrap();
    let stranger = Uuid::new_v4();

    let update = MedicineUpdate {
        name: Some("Stolen".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        h.service.update(item.id, stranger, update, None).await,
        Err(DomainError::Forbidden { .. })
    ));
    assert!(matches!(
        h.service.publish(item.id, stranger).await,
        Err(DomainError::Forbidden { .. })
    ));
    assert!(matches!(
        h.service.mark_donated(item.id, stranger).await,
        Err(DomainError::Forbidden { .. })
    ));
    assert!(matches!(
        h.service.delete(item.id, stranger).await,
        Err(DomainError::Forbidden { .. })
    ));

    let stored = h.medicines.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored, item);
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let h = harness().await;
    let result = h.service.publish(Uuid::new_v4(), h.donor.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let result = h.service.delete(Uuid::new_v4(), h.donor.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_applies_supplied_fields_only() {
    let h = harness().await;
    let item = h
        .service
        .create(h.donor.id, draft(4, Duration::days(3)), Some(image()))
        .await
        .unwrap();
    h.service.publish(item.id, h.donor.id).await.unwrap();

    let update = MedicineUpdate {
        quantity: Some(9),
        ..Default::default()
    };
    let updated = h.service.update(item.id, h.donor.id, update, None).await.unwrap();

    assert_eq!(updated.quantity, 9);
    assert_eq!(updated.name, "Metformin");
    assert_eq!(updated.image_url, item.image_url);
    assert_eq!(updated.status, MedicineStatus::Available);

    let invalid = MedicineUpdate {
        quantity: Some(-1),
        ..Default::default()
    };
    assert!(h.service.update(item.id, h.donor.id, invalid, None).await.is_err());
}

#[tokio::test]
async fn test_update_keeps_image_when_upload_fails() {
    let h = harness_with(RecordingImageStorage::failing()).await;
    let mut seeded = Medicine::new(
        h.donor.id,
        "Insulin".to_string(),
        None,
        Utc::now() + Duration::days(10),
        1,
        "Surat".to_string(),
        Some("https://images.test/old.jpg".to_string()),
    );
    seeded.status = MedicineStatus::Private;
    h.medicines.put(seeded.clone()).await;

    let updated = h
        .service
        .update(seeded.id, h.donor.id, MedicineUpdate::default(), Some(image()))
        .await
        .unwrap();
    assert_eq!(updated.image_url.as_deref(), Some("https://images.test/old.jpg"));
}

#[tokio::test]
async fn test_donated_never_reverts() {
    let h = harness().await;
    let item = h.service.create(h.donor.id, draft(2, Duration::days(3)), None).await.unwrap();

    let donated = h.service.mark_donated(item.id, h.donor.id).await.unwrap();
    assert_eq!(donated.status, MedicineStatus::Donated);

    let again = h.service.mark_donated(item.id, h.donor.id).await.unwrap();
    assert_eq!(again.status, MedicineStatus::Donated);

    let result = h.service.publish(item.id, h.donor.id).await;
    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition {
            from: MedicineStatus::Donated,
            to: MedicineStatus::Available
        })
    ));
    assert!(h.service.discover().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_publish_is_idempotent_for_available() {
    let h = harness().await;
    let item = h.service.create(h.donor.id, draft(2, Duration::days(3)), None).await.unwrap();

    h.service.publish(item.id, h.donor.id).await.unwrap();
    let again = h.service.publish(item.id, h.donor.id).await.unwrap();
    assert_eq!(again.status, MedicineStatus::Available);
}

#[tokio::test]
async fn test_past_expiry_cannot_be_published_or_donated() {
    let h = harness().await;
    let item = h
        .service
        .create(h.donor.id, draft(2, Duration::hours(-1)), None)
        .await
        .unwrap();

    let result = h.service.publish(item.id, h.donor.id).await;
    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition {
            from: MedicineStatus::Expired,
            ..
        })
    ));
    assert!(h.service.mark_donated(item.id, h.donor.id).await.is_err());

    let stored = h.medicines.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, MedicineStatus::Private);
}

#[tokio::test]
async fn test_discover_hides_unswept_expired_items() {
    let h = harness().await;
    let mut stale = Medicine::new(
        h.donor.id,
        "Aspirin".to_string(),
        None,
        Utc::now() - Duration::minutes(5),
        1,
        "Agra".to_string(),
        None,
    );
    stale.status = MedicineStatus::Available;
    h.medicines.put(stale).await;

    assert!(h.service.discover().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_dashboard() {
    let h = harness().await;
    let first = h.service.create(h.donor.id, draft(1, Duration::days(3)), None).await.unwrap();
    let second = h.service.create(h.donor.id, draft(1, Duration::days(3)), None).await.unwrap();
    h.service.publish(second.id, h.donor.id).await.unwrap();

    let stats = h.service.dashboard(h.donor.id).await.unwrap();
    assert_eq!(stats.my_medicines, 2);
    assert_eq!(stats.available_medicines, 1);

    h.service.delete(first.id, h.donor.id).await.unwrap();
    let stats = h.service.dashboard(h.donor.id).await.unwrap();
    assert_eq!(stats.my_medicines, 1);
    assert!(h.medicines.find_by_id(first.id).await.unwrap().is_none());
}
