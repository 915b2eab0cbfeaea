//! Background expiry sweep
//!
//! Periodically moves `private`/`available` listings whose expiry date has
//! passed to `expired`. Results are logged, never surfaced to API callers.

mod service;


pub use mt_shared::config::SweeperConfig;
pub use service::{ExpirySweeper, SweepResult};
