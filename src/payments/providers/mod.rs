//! Payment request builders
//!
//! Concrete request flows built on the authenticated gateway client.

pub mod c2b;

pub use c2b::C2BRequestBuilder;
