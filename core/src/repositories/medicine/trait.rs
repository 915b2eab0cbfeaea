//! Medicine repository trait: the Medicine Store.
//!
//! Every owner-initiated write is scoped to `(id, donor_id)` so a single
//! conditional statement both authorizes and applies it. Status writes are
//! further conditioned on the statuses the caller expects to leave, which
//! keeps an owner transition from overwriting a concurrent expiry sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::medicine::{DiscoverableMedicine, Medicine, MedicineStatus};
use crate::errors::DomainError;

#[async_trait]
pub trait MedicineRepository: Send + Sync {
    /// Persist a new listing
    async fn create(&self, medicine: Medicine) -> Result<Medicine, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medicine>, DomainError>;

    /// All listings of a donor, newest first, any status
    async fn find_by_donor(&self, donor_id: Uuid) -> Result<Vec<Medicine>, DomainError>;

    /// Write the editable fields of `medicine` (never status or owner).
    ///
    /// # Returns
    /// * `Ok(true)` - Row owned by `medicine.donor_id` was written
    /// * `Ok(false)` - No such row for that owner
    async fn update(&self, medicine: &Medicine) -> Result<bool, DomainError>;

    /// Move a listing to `to` if it belongs to `donor_id` and its current
    /// status is one of `from`.
    ///
    /// # Returns
    /// * `Ok(true)` - Status written
    /// * `Ok(false)` - Not found for that owner, or status not in `from`
    async fn update_status(
        &self,
        id: Uuid,
        donor_id: Uuid,
        from: &[MedicineStatus],
        to: MedicineStatus,
    ) -> Result<bool, DomainError>;

    /// Remove a listing owned by `donor_id`
    async fn delete(&self, id: Uuid, donor_id: Uuid) -> Result<bool, DomainError>;

    /// Listings with status `available` and expiry strictly after `now`,
    /// joined with donor contact details, soonest expiry first
    async fn find_discoverable(&self, now: DateTime<Utc>) -> Result<Vec<DiscoverableMedicine>, DomainError>;

    /// Batch move `private`/`available` listings with expiry at or before
    /// `now` to `expired`
    ///
    /// # Returns
    /// * `Ok(count)` - Number of listings changed
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Count a donor's listings, optionally only those with `status`
    async fn count_by_donor(&self, donor_id: Uuid, status: Option<MedicineStatus>) -> Result<u64, DomainError>;
}
