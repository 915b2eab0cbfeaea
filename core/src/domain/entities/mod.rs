//! Domain entities representing core business objects.

pub mod medicine;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use medicine::{
    parse_expiry_date, DashboardStats, DiscoverableMedicine, DonorContact, Medicine, MedicineDraft,
    MedicineStatus, MedicineUpdate, ValidatedDraft, ValidatedUpdate,
};
pub use token::{
    SessionClaims, VerificationClaims, JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_DAYS,
    VERIFICATION_AUDIENCE, VERIFICATION_TOKEN_EXPIRY_MINUTES,
};
pub use user::{RegistrationProvider, User, UserProfile};
