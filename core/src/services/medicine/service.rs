//! Medicine service implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::medicine::{
    DashboardStats, DiscoverableMedicine, Medicine, MedicineDraft, MedicineStatus, MedicineUpdate,
};
use crate::domain::value_objects::ImageUpload;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::MedicineRepository;
use crate::services::collaborators::ImageStorage;

/// Lifecycle engine for donor listings.
///
/// Every mutation first checks existence and ownership, then runs one
/// conditional write scoped to `(id, donor_id)`. When that write matches
/// nothing the item is re-read to report what changed underneath.
pub struct MedicineService {
    repository: Arc<dyn MedicineRepository>,
    image_storage: Arc<dyn ImageStorage>,
}

impl MedicineService {
    pub fn new(repository: Arc<dyn MedicineRepository>, image_storage: Arc<dyn ImageStorage>) -> Self {
        Self {
            repository,
            image_storage,
        }
    }

    /// List a new medicine as `private`.
    ///
    /// A failed image upload is logged and the item is created without an
    /// image.
    pub async fn create(
        &self,
        owner_id: Uuid,
        draft: MedicineDraft,
        image: Option<ImageUpload>,
    ) -> DomainResult<Medicine> {
        let draft = draft.validate()?;
        let image_url = self.upload_image(image).await;

        let medicine = Medicine::new(
            owner_id,
            draft.name,
            draft.description,
            draft.expiry_date,
            draft.quantity,
            draft.city,
            image_url,
        );
        let medicine = self.repository.create(medicine).await?;

        info!(medicine_id = %medicine.id, donor_id = %owner_id, "Medicine created");
        Ok(medicine)
    }

    /// Apply the supplied fields; status is never touched.
    ///
    /// The stored image is replaced only by a successfully uploaded new one.
    pub async fn update(
        &self,
        item_id: Uuid,
        caller_id: Uuid,
        update: MedicineUpdate,
        image: Option<ImageUpload>,
    ) -> DomainResult<Medicine> {
        let mut medicine = self.load_owned(item_id, caller_id).await?;
        let update = update.validate()?;
        let image_url = self.upload_image(image).await;

        medicine.apply_update(update, image_url);
        if !self.repository.update(&medicine).await? {
            return Err(self.explain_failed_write(item_id, caller_id).await);
        }

        // Status may have moved concurrently; return what is stored
        self.repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine"))
    }

    /// Remove a listing
    pub async fn delete(&self, item_id: Uuid, caller_id: Uuid) -> DomainResult<()> {
        self.load_owned(item_id, caller_id).await?;

        if !self.repository.delete(item_id, caller_id).await? {
            return Err(self.explain_failed_write(item_id, caller_id).await);
        }

        info!(medicine_id = %item_id, donor_id = %caller_id, "Medicine deleted");
        Ok(())
    }

    /// Make a private listing discoverable.
    ///
    /// Publishing an already available, unexpired listing succeeds without a
    /// write. Donated, expired or past-expiry listings are rejected.
    pub async fn publish(&self, item_id: Uuid, caller_id: Uuid) -> DomainResult<Medicine> {
        self.transition(item_id, caller_id, MedicineStatus::Available).await
    }

    /// Record a listing as handed over. Marking a donated listing again
    /// succeeds without a write.
    pub async fn mark_donated(&self, item_id: Uuid, caller_id: Uuid) -> DomainResult<Medicine> {
        self.transition(item_id, caller_id, MedicineStatus::Donated).await
    }

    /// All of the caller's listings, newest first, any status
    pub async fn list_mine(&self, owner_id: Uuid) -> DomainResult<Vec<Medicine>> {
        self.repository.find_by_donor(owner_id).await
    }

    /// Public feed of available, unexpired listings with donor contact
    pub async fn discover(&self) -> DomainResult<Vec<DiscoverableMedicine>> {
        self.discover_at(Utc::now()).await
    }

    /// Discovery feed as of `now`
    pub async fn discover_at(&self, now: DateTime<Utc>) -> DomainResult<Vec<DiscoverableMedicine>> {
        let mut found = self.repository.find_discoverable(now).await?;
        // Stores may compare at coarser precision than `now`
        found.retain(|d| d.medicine.is_discoverable(now));
        Ok(found)
    }

    /// Listing counters for the caller
    pub async fn dashboard(&self, owner_id: Uuid) -> DomainResult<DashboardStats> {
        let my_medicines = self.repository.count_by_donor(owner_id, None).await?;
        let available_medicines = self
            .repository
            .count_by_donor(owner_id, Some(MedicineStatus::Available))
            .await?;

        Ok(DashboardStats {
            my_medicines,
            available_medicines,
        })
    }

    async fn transition(&self, item_id: Uuid, caller_id: Uuid, to: MedicineStatus) -> DomainResult<Medicine> {
        let medicine = self.load_owned(item_id, caller_id).await?;
        let now = Utc::now();

        let current = effective_status(&medicine, now);
        if current == to {
            return Ok(medicine);
        }
        if !current.can_transition_to(to) || is_backwards(current, to) {
            return Err(DomainError::InvalidStatusTransition { from: current, to });
        }

        let from = sources(to);
        if !self.repository.update_status(item_id, caller_id, from, to).await? {
            return match self.repository.find_by_id(item_id).await? {
                Some(stored) if stored.is_owned_by(caller_id) && stored.status == to => Ok(stored),
                Some(stored) if stored.is_owned_by(caller_id) => Err(DomainError::InvalidStatusTransition {
                    from: stored.status,
                    to,
                }),
                _ => Err(self.explain_failed_write(item_id, caller_id).await),
            };
        }

        info!(medicine_id = %item_id, donor_id = %caller_id, status = %to, "Medicine status changed");
        self.repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine"))
    }

    async fn load_owned(&self, item_id: Uuid, caller_id: Uuid) -> DomainResult<Medicine> {
        let medicine = self
            .repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine"))?;

        if !medicine.is_owned_by(caller_id) {
            return Err(not_owner());
        }
        Ok(medicine)
    }

    async fn explain_failed_write(&self, item_id: Uuid, caller_id: Uuid) -> DomainError {
        match self.repository.find_by_id(item_id).await {
            Ok(Some(m)) if !m.is_owned_by(caller_id) => not_owner(),
            Ok(Some(_)) => DomainError::internal("Medicine write matched no row"),
            Ok(None) => DomainError::not_found("Medicine"),
            Err(e) => e,
        }
    }

    async fn upload_image(&self, image: Option<ImageUpload>) -> Option<String> {
        let image = image.filter(|i| !i.is_empty())?;
        let file_name = image.file_name.clone();

        match self.image_storage.upload(image).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(file_name = %file_name, "Image upload failed, continuing without image: {}", e);
                None
            }
        }
    }
}

fn not_owner() -> DomainError {
    DomainError::Forbidden {
        message: "You do not own this medicine".to_string(),
    }
}

/// Stored status, with unswept past-expiry listings treated as expired
fn effective_status(medicine: &Medicine, now: DateTime<Utc>) -> MedicineStatus {
    if MedicineStatus::EXPIRABLE.contains(&medicine.status) && medicine.is_past_expiry(now) {
        return MedicineStatus::Expired;
    }
    medicine.status
}

// Owners never drive a listing to expired, and never back to private
fn is_backwards(from: MedicineStatus, to: MedicineStatus) -> bool {
    matches!(to, MedicineStatus::Expired | MedicineStatus::Private) || from.is_terminal()
}

/// Statuses an owner transition to `to` may start from
fn sources(to: MedicineStatus) -> &'static [MedicineStatus] {
    match to {
        MedicineStatus::Available => &[MedicineStatus::Private],
        MedicineStatus::Donated => &[MedicineStatus::Private, MedicineStatus::Available],
        MedicineStatus::Private | MedicineStatus::Expired => &[],
    }
}
