//! Business services containing domain logic and use cases.

pub mod auth;
pub mod collaborators;
pub mod medicine;
pub mod sweeper;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, RegisterUser};
pub use collaborators::{IdentityProvider, ImageStorage, VerificationPurpose};
pub use medicine::MedicineService;
pub use sweeper::{ExpirySweeper, SweepResult};
pub use token::{SessionTokenService, SessionVerifier, TokenServiceConfig};
pub use verification::VerificationTokenService;
