//! Email verification tokens
//!
//! A verification token is minted after the external identity provider
//! confirmed an email address, and gates registration, email change and
//! password reset for that address.

mod service;


pub use service::VerificationTokenService;
