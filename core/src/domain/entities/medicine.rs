//! Medicine entity and its lifecycle status.
//!
//! A medicine is owned by the donor who listed it. Its status moves
//! `private -> available -> donated`, and any non-donated item becomes
//! `expired` once its expiry date passes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Lifecycle status of a listed medicine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicineStatus {
    /// Visible only to its donor
    Private,
    /// Listed for discovery by others
    Available,
    /// Handed over; never reverts
    Donated,
    /// Past its expiry date; terminal
    Expired,
}

impl MedicineStatus {
    /// Statuses the expiry sweep moves to `Expired`
    pub const EXPIRABLE: [MedicineStatus; 2] = [MedicineStatus::Private, MedicineStatus::Available];

    pub fn as_str(&self) -> &'static str {
        match self {
            MedicineStatus::Private => "private",
            MedicineStatus::Available => "available",
            MedicineStatus::Donated => "donated",
            MedicineStatus::Expired => "expired",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, MedicineStatus::Donated | MedicineStatus::Expired)
    }

    /// Whether a move from `self` to `to` is a legal lifecycle step.
    ///
    /// Staying in the same status is not a transition and returns false.
    pub fn can_transition_to(&self, to: MedicineStatus) -> bool {
        use MedicineStatus::*;
        matches!(
            (self, to),
            (Private, Available) | (Private, Donated) | (Available, Donated) | (Private, Expired) | (Available, Expired)
        )
    }
}

impl std::fmt::Display for MedicineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MedicineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(MedicineStatus::Private),
            "available" => Ok(MedicineStatus::Available),
            "donated" => Ok(MedicineStatus::Donated),
            "expired" => Ok(MedicineStatus::Expired),
            _ => Err(format!("Invalid medicine status: {}", s)),
        }
    }
}

/// A donor-owned inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,

    /// Owner; fixed at creation
    pub donor_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub expiry_date: DateTime<Utc>,

    /// Always positive
    pub quantity: u32,

    pub image_url: Option<String>,

    pub city: String,

    pub status: MedicineStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Creates a new private listing
    pub fn new(
        donor_id: Uuid,
        name: String,
        description: Option<String>,
        expiry_date: DateTime<Utc>,
        quantity: u32,
        city: String,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            donor_id,
            name,
            description,
            expiry_date,
            quantity,
            image_url,
            city,
            status: MedicineStatus::Private,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.donor_id == user_id
    }

    /// Expiry dates equal to `now` count as passed
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }

    /// Listed and not yet expired, whatever the sweeper has done so far
    pub fn is_discoverable(&self, now: DateTime<Utc>) -> bool {
        self.status == MedicineStatus::Available && !self.is_past_expiry(now)
    }

    /// Applies the supplied fields of an already validated update.
    ///
    /// Status and owner are never touched here.
    pub fn apply_update(&mut self, update: ValidatedUpdate, image_url: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(expiry_date) = update.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if image_url.is_some() {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields a donor supplies when listing a medicine.
///
/// Everything is optional here so that missing input is reported as a
/// validation error by the lifecycle engine instead of a parse failure.
#[derive(Debug, Clone, Default)]
pub struct MedicineDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub quantity: Option<i64>,
    pub city: Option<String>,
}

/// Partial update; `None` leaves the stored value as is.
///
/// A blank `description` counts as `None`, so an update can replace the
/// description but never clear it.
#[derive(Debug, Clone, Default)]
pub struct MedicineUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub quantity: Option<i64>,
    pub city: Option<String>,
}

/// A draft that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedDraft {
    pub name: String,
    pub description: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u32,
    pub city: String,
}

/// An update that passed validation
#[derive(Debug, Clone, Default)]
pub struct ValidatedUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub quantity: Option<u32>,
    pub city: Option<String>,
}

impl MedicineDraft {
    /// Checks required fields and the positive quantity rule
    pub fn validate(self) -> Result<ValidatedDraft, ValidationError> {
        let name = required_text(self.name, "name")?;
        let expiry_date = self.expiry_date.ok_or_else(|| ValidationError::required("expiryDate"))?;
        let quantity = positive_quantity(self.quantity.ok_or_else(|| ValidationError::required("quantity"))?)?;
        let city = required_text(self.city, "city")?;

        Ok(ValidatedDraft {
            name,
            description: optional_text(self.description),
            expiry_date,
            quantity,
            city,
        })
    }
}

impl MedicineUpdate {
    /// Supplied fields must satisfy the same rules as on creation
    pub fn validate(self) -> Result<ValidatedUpdate, ValidationError> {
        let name = self.name.map(|n| required_text(Some(n), "name")).transpose()?;
        let quantity = self.quantity.map(positive_quantity).transpose()?;
        let city = self.city.map(|c| required_text(Some(c), "city")).transpose()?;

        Ok(ValidatedUpdate {
            name,
            description: optional_text(self.description),
            expiry_date: self.expiry_date,
            quantity,
            city,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.expiry_date.is_none()
            && self.quantity.is_none()
            && self.city.is_none()
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn positive_quantity(quantity: i64) -> Result<u32, ValidationError> {
    if quantity <= 0 || quantity > u32::MAX as i64 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "1".to_string(),
        });
    }
    Ok(quantity as u32)
}

/// Parses an expiry date given as RFC 3339 or as a plain `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_expiry_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required("expiryDate"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: "expiryDate".to_string(),
        })
}

/// Donor's public contact details shown alongside a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorContact {
    pub name: String,
    pub phone: String,
}

/// A discoverable medicine joined with its donor's contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverableMedicine {
    pub medicine: Medicine,
    pub donor: DonorContact,
}

/// Per-donor counters for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Every listing of the donor, any status
    pub my_medicines: u64,
    /// Listings currently marked available
    pub available_medicines: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(status: MedicineStatus, expiry: DateTime<Utc>) -> Medicine {
        let mut m = Medicine::new(
            Uuid::new_v4(),
            "Paracetamol".to_string(),
            None,
            expiry,
            3,
            "Pune".to_string(),
            None,
        );
        m.status = status;
        m
    }

    #[test]
    fn test_new_medicine_is_private() {
        let m = sample(MedicineStatus::Private, Utc::now() + Duration::days(1));
        assert_eq!(m.status, MedicineStatus::Private);
        assert!(m.image_url.is_none());
    }

    #[test]
    fn test_donated_and_expired_have_no_exit() {
        for to in [
            MedicineStatus::Private,
            MedicineStatus::Available,
            MedicineStatus::Donated,
            MedicineStatus::Expired,
        ] {
            assert!(!MedicineStatus::Donated.can_transition_to(to));
            assert!(!MedicineStatus::Expired.can_transition_to(to));
        }
    }

    #[test]
    fn test_forward_transitions() {
        assert!(MedicineStatus::Private.can_transition_to(MedicineStatus::Available));
        assert!(MedicineStatus::Available.can_transition_to(MedicineStatus::Donated));
        assert!(MedicineStatus::Private.can_transition_to(MedicineStatus::Donated));
        assert!(MedicineStatus::Available.can_transition_to(MedicineStatus::Expired));
        assert!(!MedicineStatus::Available.can_transition_to(MedicineStatus::Private));
    }

    #[test]
    fn test_discoverable_requires_available_and_future_expiry() {
        let now = Utc::now();
        assert!(sample(MedicineStatus::Available, now + Duration::hours(1)).is_discoverable(now));
        assert!(!sample(MedicineStatus::Available, now).is_discoverable(now));
        assert!(!sample(MedicineStatus::Available, now - Duration::hours(1)).is_discoverable(now));
        assert!(!sample(MedicineStatus::Private, now + Duration::hours(1)).is_discoverable(now));
    }

    #[test]
    fn test_draft_rejects_zero_quantity() {
        let draft = MedicineDraft {
            name: Some("Ibuprofen".to_string()),
            expiry_date: Some(Utc::now() + Duration::days(30)),
            quantity: Some(0),
            city: Some("Delhi".to_string()),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_draft_reports_missing_field() {
        let draft = MedicineDraft {
            name: Some("Ibuprofen".to_string()),
            expiry_date: Some(Utc::now()),
            quantity: Some(2),
            city: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap_err(), ValidationError::required("city"));
    }

    #[test]
    fn test_update_validates_only_supplied_fields() {
        let update = MedicineUpdate {
            quantity: Some(5),
            ..Default::default()
        };
        let validated = update.validate().unwrap();
        assert_eq!(validated.quantity, Some(5));
        assert!(validated.name.is_none());

        let update = MedicineUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_blank_description_leaves_description_in_place() {
        let mut m = sample(MedicineStatus::Private, Utc::now() + Duration::days(3));
        m.description = Some("Sealed strip".to_string());

        let update = MedicineUpdate {
            description: Some("  ".to_string()),
            ..Default::default()
        };
        m.apply_update(update.validate().unwrap(), None);

        assert_eq!(m.description.as_deref(), Some("Sealed strip"));
    }

    #[test]
    fn test_apply_update_keeps_image_without_replacement() {
        let mut m = sample(MedicineStatus::Available, Utc::now() + Duration::days(3));
        m.image_url = Some("https://img/old.png".to_string());

        let update = ValidatedUpdate {
            city: Some("Mumbai".to_string()),
            ..Default::default()
        };
        m.apply_update(update, None);

        assert_eq!(m.city, "Mumbai");
        assert_eq!(m.image_url.as_deref(), Some("https://img/old.png"));
        assert_eq!(m.status, MedicineStatus::Available);
    }

    #[test]
    fn test_parse_expiry_date_formats() {
        let date = parse_expiry_date("2030-05-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap());

        let ts = parse_expiry_date("2030-05-01T10:30:00+05:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2030, 5, 1, 5, 0, 0).unwrap());

        assert!(matches!(parse_expiry_date("01/05/2030"), Err(ValidationError::InvalidDate { .. })));
        assert_eq!(parse_expiry_date(" ").unwrap_err(), ValidationError::required("expiryDate"));
    }

    #[test]
    fn test_status_string_round_trip() {
        for s in ["private", "available", "donated", "expired"] {
            assert_eq!(s.parse::<MedicineStatus>().unwrap().as_str(), s);
        }
        assert!("pending".parse::<MedicineStatus>().is_err());
    }
}
