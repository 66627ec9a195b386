//! Infrastructure layer: record stores, notification sink, and the catalog service.

pub mod catalog_service;
pub mod notifier;
pub mod store;

pub use catalog_service::{ProductService, UPDATE_CONFIRMATION, UpdateOutcome};
pub use notifier::{InMemoryNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductFilter, ProductStore, StoreError};
