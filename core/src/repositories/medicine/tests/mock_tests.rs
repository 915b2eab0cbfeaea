//! Unit tests for mock medicine repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::medicine::{Medicine, MedicineStatus};
use crate::domain::entities::user::User;
use crate::repositories::medicine::{MedicineRepository, MockMedicineRepository};
use crate::repositories::user::{MockUserRepository, UserRepository};

async fn donor(users: &MockUserRepository, email: &str) -> User {
    users
        .create(User::new(
            "Asha".to_string(),
            email.to_string(),
            "9123456780".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap()
}

fn medicine(donor_id: Uuid, status: MedicineStatus, expires_in: Duration) -> Medicine {
    let mut m = Medicine::new(
        donor_id,
        "Cetirizine".to_string(),
        None,
        Utc::now() + expires_in,
        10,
        "Chennai".to_string(),
        None,
    );
    m.status = status;
    m
}

#[tokio::test]
async fn test_update_status_requires_owner_and_source_status() {
    let users = MockUserRepository::new();
    let repo = MockMedicineRepository::new(users);
    let owner = Uuid::new_v4();
    let m = repo
        .create(medicine(owner, MedicineStatus::Private, Duration::days(5)))
        .await
        .unwrap();

    let moved = repo
        .update_status(m.id, Uuid::new_v4(), &[MedicineStatus::Private], MedicineStatus::Available)
        .await
        .unwrap();
    assert!(!moved);

    let moved = repo
        .update_status(m.id, owner, &[MedicineStatus::Available], MedicineStatus::Donated)
        .await
        .unwrap();
    assert!(!moved);

    let moved = repo
        .update_status(m.id, owner, &[MedicineStatus::Private], MedicineStatus::Available)
        .await
        .unwrap();
    assert!(moved);
    let stored = repo.find_by_id(m.id).await.unwrap().unwrap();
    assert_eq!(stored.status, MedicineStatus::Available);
}

#[tokio::test]
async fn test_update_never_writes_status() {
    let repo = MockMedicineRepository::new(MockUserRepository::new());
    let owner = Uuid::new_v4();
    let m = repo
        .create(medicine(owner, MedicineStatus::Available, Duration::days(5)))
        .await
        .unwrap();

    let mut edited = m.clone();
    edited.name = "Levocetirizine".to_string();
    edited.status = MedicineStatus::Private;
    assert!(repo.update(&edited).await.unwrap());

    let stored = repo.find_by_id(m.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Levocetirizine");
    assert_eq!(stored.status, MedicineStatus::Available);
}

#[tokio::test]
async fn test_delete_scoped_to_owner() {
    let repo = MockMedicineRepository::new(MockUserRepository::new());
    let owner = Uuid::new_v4();
    let m = repo
        .create(medicine(owner, MedicineStatus::Private, Duration::days(1)))
        .await
        .unwrap();

    assert!(!repo.delete(m.id, Uuid::new_v4()).await.unwrap());
    assert!(repo.delete(m.id, owner).await.unwrap());
    assert!(repo.find_by_id(m.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_discoverable_joins_donor_and_orders_by_expiry() {
    let users = MockUserRepository::new();
    let asha = donor(&users, "asha@example.com").await;
    let repo = MockMedicineRepository::new(users);

    let later = repo
        .create(medicine(asha.id, MedicineStatus::Available, Duration::days(20)))
        .await
        .unwrap();
    let sooner = repo
        .create(medicine(asha.id, MedicineStatus::Available, Duration::days(2)))
        .await
        .unwrap();
    repo.create(medicine(asha.id, MedicineStatus::Private, Duration::days(2)))
        .await
        .unwrap();
    repo.create(medicine(asha.id, MedicineStatus::Available, Duration::hours(-1)))
        .await
        .unwrap();
    // Donor without an account is skipped
    repo.create(medicine(Uuid::new_v4(), MedicineStatus::Available, Duration::days(3)))
        .await
        .unwrap();

    let found = repo.find_discoverable(Utc::now()).await.unwrap();
    let ids: Vec<Uuid> = found.iter().map(|d| d.medicine.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);
    assert_eq!(found[0].donor.name, "Asha");
    assert_eq!(found[0].donor.phone, "9123456780");
}

#[tokio::test]
async fn test_expire_overdue_is_idempotent() {
    let repo = MockMedicineRepository::new(MockUserRepository::new());
    let owner = Uuid::new_v4();
    let private = repo
        .create(medicine(owner, MedicineStatus::Private, Duration::hours(-2)))
        .await
        .unwrap();
    let donated = repo
        .create(medicine(owner, MedicineStatus::Donated, Duration::hours(-2)))
        .await
        .unwrap();
    let fresh = repo
        .create(medicine(owner, MedicineStatus::Available, Duration::days(2)))
        .await
        .unwrap();

    let now = Utc::now();
    assert_eq!(repo.expire_overdue(now).await.unwrap(), 1);
    assert_eq!(repo.expire_overdue(now).await.unwrap(), 0);

    let status = |id| {
        let repo = repo.clone();
        async move { repo.find_by_id(id).await.unwrap().unwrap().status }
    };
    assert_eq!(status(private.id).await, MedicineStatus::Expired);
    assert_eq!(status(donated.id).await, MedicineStatus::Donated);
    assert_eq!(status(fresh.id).await, MedicineStatus::Available);
}

#[tokio::test]
async fn test_count_and_list_by_donor() {
    let repo = MockMedicineRepository::new(MockUserRepository::new());
    let owner = Uuid::new_v4();
    let first = repo
        .create(medicine(owner, MedicineStatus::Available, Duration::days(2)))
        .await
        .unwrap();
    let mut second = medicine(owner, MedicineStatus::Private, Duration::days(2));
    second.created_at = first.created_at + Duration::seconds(1);
    let second = repo.create(second).await.unwrap();
    repo.create(medicine(Uuid::new_v4(), MedicineStatus::Available, Duration::days(2)))
        .await
        .unwrap();

    assert_eq!(repo.count_by_donor(owner, None).await.unwrap(), 2);
    assert_eq!(
        repo.count_by_donor(owner, Some(MedicineStatus::Available)).await.unwrap(),
        1
    );

    let mine = repo.find_by_donor(owner).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, second.id);
}
