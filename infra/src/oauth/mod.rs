//! Identity providers confirming that a caller owns an email address

pub mod google;

pub use google::GoogleIdentityProvider;
