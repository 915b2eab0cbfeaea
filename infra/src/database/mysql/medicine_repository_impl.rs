//! MySQL implementation of the MedicineRepository trait.
//!
//! Owner writes are single `UPDATE`/`DELETE` statements filtered on
//! `(id, donor_id)`, and status writes also on the expected current status,
//! so no explicit locking is needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mt_core::domain::entities::medicine::{DiscoverableMedicine, DonorContact, Medicine, MedicineStatus};
use mt_core::errors::DomainError;
use mt_core::repositories::MedicineRepository;

const MEDICINE_COLUMNS: &str = "m.id, m.donor_id, m.name, m.description, m.expiry_date, m.quantity, \
     m.image_url, m.city, m.status, m.created_at, m.updated_at";

/// MySQL implementation of MedicineRepository
pub struct MySqlMedicineRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlMedicineRepository {
    /// Create a new MySQL medicine repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Medicine entity
    fn row_to_medicine(row: &sqlx::mysql::MySqlRow) -> Result<Medicine, DomainError> {
        let get_err = |field: &str, e: sqlx::Error| DomainError::internal(format!("Failed to get {}: {}", field, e));

        let id: String = row.try_get("id").map_err(|e| get_err("id", e))?;
        let donor_id: String = row.try_get("donor_id").map_err(|e| get_err("donor_id", e))?;
        let status: String = row.try_get("status").map_err(|e| get_err("status", e))?;

        Ok(Medicine {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            donor_id: Uuid::parse_str(&donor_id)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            name: row.try_get("name").map_err(|e| get_err("name", e))?,
            description: row.try_get("description").map_err(|e| get_err("description", e))?,
            expiry_date: row
                .try_get::<DateTime<Utc>, _>("expiry_date")
                .map_err(|e| get_err("expiry_date", e))?,
            quantity: row.try_get("quantity").map_err(|e| get_err("quantity", e))?,
            image_url: row.try_get("image_url").map_err(|e| get_err("image_url", e))?,
            city: row.try_get("city").map_err(|e| get_err("city", e))?,
            status: status.parse::<MedicineStatus>().map_err(DomainError::internal)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| get_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| get_err("updated_at", e))?,
        })
    }
}

#[async_trait]
impl MedicineRepository for MySqlMedicineRepository {
    async fn create(&self, medicine: Medicine) -> Result<Medicine, DomainError> {
        let query = r#"
            INSERT INTO medicines (
                id, donor_id, name, description, expiry_date, quantity,
                image_url, city, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(medicine.id.to_string())
            .bind(medicine.donor_id.to_string())
            .bind(&medicine.name)
            .bind(&medicine.description)
            .bind(medicine.expiry_date)
            .bind(medicine.quantity)
            .bind(&medicine.image_url)
            .bind(&medicine.city)
            .bind(medicine.status.as_str())
            .bind(medicine.created_at)
            .bind(medicine.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to create medicine: {}", e)))?;

        Ok(medicine)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medicine>, DomainError> {
        let query = format!("SELECT {} FROM medicines m WHERE m.id = ? LIMIT 1", MEDICINE_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_medicine).transpose()
    }

    async fn find_by_donor(&self, donor_id: Uuid) -> Result<Vec<Medicine>, DomainError> {
        let query = format!(
            "SELECT {} FROM medicines m WHERE m.donor_id = ? ORDER BY m.created_at DESC",
            MEDICINE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(donor_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        rows.iter().map(Self::row_to_medicine).collect()
    }

    async fn update(&self, medicine: &Medicine) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE medicines SET
                name = ?,
                description = ?,
                expiry_date = ?,
                quantity = ?,
                image_url = ?,
                city = ?,
                updated_at = ?
            WHERE id = ? AND donor_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&medicine.name)
            .bind(&medicine.description)
            .bind(medicine.expiry_date)
            .bind(medicine.quantity)
            .bind(&medicine.image_url)
            .bind(&medicine.city)
            .bind(medicine.updated_at)
            .bind(medicine.id.to_string())
            .bind(medicine.donor_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to update medicine: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(
        &self,
        id: Uuid,
        donor_id: Uuid,
        from: &[MedicineStatus],
        to: MedicineStatus,
    ) -> Result<bool, DomainError> {
        if from.is_empty() {
            return Ok(false);
        }

        let placeholders = vec!["?"; from.len()].join(", ");
        let query = format!(
            "UPDATE medicines SET status = ?, updated_at = ? \
             WHERE id = ? AND donor_id = ? AND status IN ({})",
            placeholders
        );

        let mut statement = sqlx::query(&query)
            .bind(to.as_str())
            .bind(Utc::now())
            .bind(id.to_string())
            .bind(donor_id.to_string());
        for status in from {
            statement = statement.bind(status.as_str());
        }

        let result = statement
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to update medicine status: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid, donor_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM medicines WHERE id = ? AND donor_id = ?")
            .bind(id.to_string())
            .bind(donor_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to delete medicine: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_discoverable(&self, now: DateTime<Utc>) -> Result<Vec<DiscoverableMedicine>, DomainError> {
        let query = format!(
            "SELECT {}, u.name AS donor_name, u.phone AS donor_phone \
             FROM medicines m \
             INNER JOIN users u ON u.id = m.donor_id \
             WHERE m.status = 'available' AND m.expiry_date > ? \
             ORDER BY m.expiry_date ASC",
            MEDICINE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        rows.iter()
            .map(|row| {
                let medicine = Self::row_to_medicine(row)?;
                let donor = DonorContact {
                    name: row
                        .try_get("donor_name")
                        .map_err(|e| DomainError::internal(format!("Failed to get donor_name: {}", e)))?,
                    phone: row
                        .try_get("donor_phone")
                        .map_err(|e| DomainError::internal(format!("Failed to get donor_phone: {}", e)))?,
                };
                Ok(DiscoverableMedicine { medicine, donor })
            })
            .collect()
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE medicines SET status = 'expired', updated_at = ?
            WHERE status IN ('private', 'available') AND expiry_date <= ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to expire medicines: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn count_by_donor(&self, donor_id: Uuid, status: Option<MedicineStatus>) -> Result<u64, DomainError> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) AS count FROM medicines WHERE donor_id = ? AND status = ?")
                    .bind(donor_id.to_string())
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM medicines WHERE donor_id = ?")
                    .bind(donor_id.to_string())
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::internal(format!("Failed to get count: {}", e)))?;
        Ok(count.max(0) as u64)
    }
}
