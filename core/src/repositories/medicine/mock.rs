//! In-memory implementation of MedicineRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::medicine::{DiscoverableMedicine, DonorContact, Medicine, MedicineStatus};
use crate::errors::DomainError;
use crate::repositories::user::{MockUserRepository, UserRepository};

use super::trait_::MedicineRepository;

/// Mock medicine repository.
///
/// Donor contact details for discovery are looked up in the shared
/// `MockUserRepository`; listings whose donor is gone are left out,
/// matching an inner join.
#[derive(Clone)]
pub struct MockMedicineRepository {
    medicines: Arc<RwLock<HashMap<Uuid, Medicine>>>,
    users: MockUserRepository,
}

impl MockMedicineRepository {
    pub fn new(users: MockUserRepository) -> Self {
        Self {
            medicines: Arc::new(RwLock::new(HashMap::new())),
            users,
        }
    }

    /// Overwrite a stored listing, bypassing ownership rules
    pub async fn put(&self, medicine: Medicine) {
        self.medicines.write().await.insert(medicine.id, medicine);
    }
}

#[async_trait]
impl MedicineRepository for MockMedicineRepository {
    async fn create(&self, medicine: Medicine) -> Result<Medicine, DomainError> {
        let mut medicines = self.medicines.write().await;
        medicines.insert(medicine.id, medicine.clone());
        Ok(medicine)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medicine>, DomainError> {
        let medicines = self.medicines.read().await;
        Ok(medicines.get(&id).cloned())
    }

    async fn find_by_donor(&self, donor_id: Uuid) -> Result<Vec<Medicine>, DomainError> {
        let medicines = self.medicines.read().await;
        let mut mine: Vec<Medicine> = medicines
            .values()
            .filter(|m| m.donor_id == donor_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn update(&self, medicine: &Medicine) -> Result<bool, DomainError> {
        let mut medicines = self.medicines.write().await;
        match medicines.get_mut(&medicine.id) {
            Some(stored) if stored.donor_id == medicine.donor_id => {
                let status = stored.status;
                *stored = medicine.clone();
                stored.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        donor_id: Uuid,
        from: &[MedicineStatus],
        to: MedicineStatus,
    ) -> Result<bool, DomainError> {
        let mut medicines = self.medicines.write().await;
        match medicines.get_mut(&id) {
            Some(stored) if stored.donor_id == donor_id && from.contains(&stored.status) => {
                stored.status = to;
                stored.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid, donor_id: Uuid) -> Result<bool, DomainError> {
        let mut medicines = self.medicines.write().await;
        if medicines.get(&id).is_some_and(|m| m.donor_id == donor_id) {
            medicines.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn find_discoverable(&self, now: DateTime<Utc>) -> Result<Vec<DiscoverableMedicine>, DomainError> {
        let candidates: Vec<Medicine> = {
            let medicines = self.medicines.read().await;
            medicines.values().filter(|m| m.is_discoverable(now)).cloned().collect()
        };

        let mut found = Vec::with_capacity(candidates.len());
        for medicine in candidates {
            if let Some(donor) = self.users.find_by_id(medicine.donor_id).await? {
                found.push(DiscoverableMedicine {
                    medicine,
                    donor: DonorContact {
                        name: donor.name,
                        phone: donor.phone,
                    },
                });
            }
        }
        found.sort_by(|a, b| a.medicine.expiry_date.cmp(&b.medicine.expiry_date));
        Ok(found)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut medicines = self.medicines.write().await;
        let mut changed = 0;
        for medicine in medicines.values_mut() {
            if MedicineStatus::EXPIRABLE.contains(&medicine.status) && medicine.is_past_expiry(now) {
                medicine.status = MedicineStatus::Expired;
                medicine.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_by_donor(&self, donor_id: Uuid, status: Option<MedicineStatus>) -> Result<u64, DomainError> {
        let medicines = self.medicines.read().await;
        let count = medicines
            .values()
            .filter(|m| m.donor_id == donor_id)
            .filter(|m| status.map_or(true, |s| m.status == s))
            .count();
        Ok(count as u64)
    }
}
