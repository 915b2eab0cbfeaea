use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mt_core::domain::entities::medicine::{
    DashboardStats, DiscoverableMedicine, DonorContact, Medicine, MedicineStatus,
};

/// A listing as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineResponse {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u32,
    pub image_url: Option<String>,
    pub city: String,
    pub status: MedicineStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Medicine> for MedicineResponse {
    fn from(medicine: Medicine) -> Self {
        Self {
            id: medicine.id,
            donor_id: medicine.donor_id,
            name: medicine.name,
            description: medicine.description,
            expiry_date: medicine.expiry_date,
            quantity: medicine.quantity,
            image_url: medicine.image_url,
            city: medicine.city,
            status: medicine.status,
            created_at: medicine.created_at,
            updated_at: medicine.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorResponse {
    pub name: String,
    pub phone: String,
}

impl From<DonorContact> for DonorResponse {
    fn from(donor: DonorContact) -> Self {
        Self {
            name: donor.name,
            phone: donor.phone,
        }
    }
}

/// An entry of the public discovery feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverResponse {
    #[serde(flatten)]
    pub medicine: MedicineResponse,
    pub donor: DonorResponse,
}

impl From<DiscoverableMedicine> for DiscoverResponse {
    fn from(item: DiscoverableMedicine) -> Self {
        Self {
            medicine: item.medicine.into(),
            donor: item.donor.into(),
        }
    }
}

/// `{msg, medicine}` envelope of the write endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineEnvelope {
    pub msg: String,
    pub medicine: MedicineResponse,
}

impl MedicineEnvelope {
    pub fn new(msg: impl Into<String>, medicine: Medicine) -> Self {
        Self {
            msg: msg.into(),
            medicine: medicine.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgResponse {
    pub msg: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub my_medicines: u64,
    pub available_medicines: u64,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            my_medicines: stats.my_medicines,
            available_medicines: stats.available_medicines,
        }
    }
}
