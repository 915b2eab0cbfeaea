//! `multipart/form-data` bodies of the medicine write endpoints.
//!
//! Text fields are collected by name; the file field `image` becomes an
//! [`ImageUpload`]. Parsing runs over the already buffered body, bounded by
//! the app's payload limit.

use actix_web::{http::header::CONTENT_TYPE, web, HttpRequest};
use futures_util::future::ready;
use futures_util::stream::once;
use std::collections::HashMap;

use mt_core::domain::entities::medicine::{parse_expiry_date, MedicineDraft, MedicineUpdate};
use mt_core::domain::value_objects::ImageUpload;
use mt_core::errors::{DomainError, ValidationError};

/// Name of the file field carrying the listing image
pub const IMAGE_FIELD: &str = "image";

/// Parsed medicine form
#[derive(Debug, Default)]
pub struct MedicineForm {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl MedicineForm {
    /// Read the form from a buffered request body
    pub async fn parse(req: &HttpRequest, body: web::Bytes) -> Result<Self, DomainError> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| invalid_form("Missing Content-Type header"))?;

        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| invalid_form(format!("Expected multipart/form-data: {}", e)))?;

        let stream = once(ready(Ok::<_, std::io::Error>(body)));
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = MedicineForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| invalid_form(format!("Malformed multipart body: {}", e)))?
        {
            let name = match field.name() {
                Some(name) => name.to_string(),
                None => continue,
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| invalid_form(format!("Unreadable image: {}", e)))?;
                let image = ImageUpload::new(file_name, content_type, bytes.to_vec());
                // Browsers send an empty part when no file was picked
                if !image.is_empty() {
                    form.image = Some(image);
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| invalid_form(format!("Unreadable field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Non-blank text value of a field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Fields of a new listing; presence checks are left to the draft
    pub fn draft(&self) -> Result<MedicineDraft, DomainError> {
        Ok(MedicineDraft {
            name: self.text("name"),
            description: self.text("description"),
            expiry_date: self.expiry_date()?,
            quantity: self.quantity()?,
            city: self.text("city"),
        })
    }

    /// Fields of a partial update; blank fields are left unchanged
    pub fn update(&self) -> Result<MedicineUpdate, DomainError> {
        Ok(MedicineUpdate {
            name: self.text("name"),
            description: self.text("description"),
            expiry_date: self.expiry_date()?,
            quantity: self.quantity()?,
            city: self.text("city"),
        })
    }

    fn expiry_date(&self) -> Result<Option<chrono::DateTime<chrono::Utc>>, DomainError> {
        Ok(self
            .text("expiryDate")
            .map(|v| parse_expiry_date(&v))
            .transpose()?)
    }

    fn quantity(&self) -> Result<Option<i64>, DomainError> {
        self.text("quantity")
            .map(|v| {
                v.parse::<i64>().map_err(|_| {
                    DomainError::from(ValidationError::InvalidFormat {
                        field: "quantity".to_string(),
                    })
                })
            })
            .transpose()
    }

    #[cfg(test)]
    pub(crate) fn from_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }
}

fn invalid_form(message: impl Into<String>) -> DomainError {
    DomainError::Validation {
        message: message.into(),
    }
}
