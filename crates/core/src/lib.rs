//! `catalog-core` — shared building blocks for the catalog service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::RequestId;
pub use version::ExpectedVersion;
