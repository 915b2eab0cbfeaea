//! Medicine lifecycle engine
//!
//! Owner-scoped create, edit and delete of listings, the
//! `private -> available -> donated` transitions, and the public discovery
//! feed.

mod service;

#[cfg(test)]
mod tests;

pub use service::MedicineService;
