//! Product record store abstraction.
//!
//! The catalog service only ever talks to a `ProductStore`. Implementations decide how
//! rows are kept; the contract they share is:
//!
//! - `insert` assigns identity and is **conditional**: it fails with
//!   [`StoreError::DuplicateName`] if a product with the same case-insensitive name
//!   exists at the moment of the write.
//! - `replace` is a compare-and-swap on the version token. It fails with
//!   [`StoreError::Concurrency`] when no row matches the id (and version, if one is
//!   expected). Callers decide whether that means "gone" or "changed".
//! - `list` and `find_where` return rows in ascending id order.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::{DomainError, ExpectedVersion};
use catalog_products::{Product, ProductDraft, ProductId, name_contains, names_equal};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted row was missing or its version did not match.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// A conditional insert found an existing product with the same name.
    #[error("duplicate product name: {0}")]
    DuplicateName(String),

    /// The backend failed (connection, decoding, poisoned lock, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Concurrency(msg) => DomainError::fatal(msg),
            StoreError::DuplicateName(name) => {
                DomainError::conflict(format!("Product {name} already exists."))
            }
            StoreError::Backend(msg) => DomainError::unavailable(msg),
        }
    }
}

/// Predicate for `find_where`. Each backend translates it natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Name equals the value, ignoring case.
    NameEquals(String),
    /// Name contains the value, ignoring case.
    NameContains(String),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::NameEquals(name) => names_equal(&product.name, name),
            ProductFilter::NameContains(query) => name_contains(&product.name, query),
        }
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>>;

    async fn find_where(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

    /// Insert a new product, assigning its id. Fails if the name is already taken.
    async fn insert(&self, draft: ProductDraft) -> StoreResult<Product>;

    /// Replace every mutable field of `id`, bumping its version.
    async fn replace(
        &self,
        id: ProductId,
        draft: ProductDraft,
        expected: ExpectedVersion,
    ) -> StoreResult<Product>;

    /// Remove `id`, returning the removed row if it existed.
    async fn remove(&self, id: ProductId) -> StoreResult<Option<Product>>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list().await
    }

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find(id).await
    }

    async fn find_where(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        (**self).find_where(filter).await
    }

    async fn insert(&self, draft: ProductDraft) -> StoreResult<Product> {
        (**self).insert(draft).await
    }

    async fn replace(
        &self,
        id: ProductId,
        draft: ProductDraft,
        expected: ExpectedVersion,
    ) -> StoreResult<Product> {
        (**self).replace(id, draft, expected).await
    }

    async fn remove(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).remove(id).await
    }
}
