//! Request and response bodies of the HTTP API. JSON is camelCase.

pub mod auth;
pub mod medicine;

pub use mt_shared::{error_codes, ErrorResponse};
