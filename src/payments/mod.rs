//! Payment request integration module
//!
//! Builders that turn payment inputs into upstream requests and map the
//! answers into funding records.

pub mod providers;
pub mod traits;
pub mod types;
