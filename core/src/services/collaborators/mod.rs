//! Ports to services outside the process: image hosting and the external
//! identity provider that confirms email ownership.

mod identity;
mod image_storage;

pub use identity::{IdentityProvider, VerificationPurpose};
pub use image_storage::ImageStorage;
