//! Catalog operations over a `ProductStore`.
//!
//! `ProductService` owns the request-level rules: input validation, the create-time
//! name uniqueness check, existence checks, and how a failed update is classified.
//! Each call is a single attempt against the store; nothing is retried or cached.
//!
//! ```text
//! create:  validate name -> is_product_unique -> store.insert (conditional)
//! update:  id match + validate -> store.replace (CAS on version)
//!            \-- Concurrency -> product_exists ? Fatal : NotFound
//! delete:  store.find -> store.remove -> prior state
//! ```

use std::sync::Arc;

use catalog_core::{DomainError, DomainResult};
use catalog_products::{NewProduct, Product, ProductId, ProductReplacement};

use crate::notifier::{Notice, Notifier};
use crate::store::{ProductFilter, ProductStore, StoreError};

pub const UPDATE_CONFIRMATION: &str = "Product updated successfully.";

const OP_LIST: &str = "list_all";
const OP_GET: &str = "get_by_id";
const OP_SEARCH: &str = "search_by_name";
const OP_CREATE: &str = "create";
const OP_UPDATE: &str = "update";
const OP_DELETE: &str = "delete";

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub message: &'static str,
    pub product: Product,
}

pub struct ProductService<S> {
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S> core::fmt::Debug for ProductService<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductService").finish_non_exhaustive()
    }
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    fn rejected(&self, operation: &'static str, err: &DomainError) {
        let notice = match err {
            DomainError::Fatal(_) | DomainError::Unavailable(_) => {
                Notice::error(operation, err.to_string())
            }
            _ => Notice::debug(operation, err.to_string()),
        };
        self.notify(notice);
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Product>> {
        self.notify(Notice::info(OP_LIST, "listing all products"));
        self.store
            .list()
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_LIST, e))
    }

    pub async fn get_by_id(&self, id: ProductId) -> DomainResult<Product> {
        self.notify(Notice::info(OP_GET, format!("fetching product {id}")));
        let found = self
            .store
            .find(id)
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_GET, e))?;
        found.ok_or_else(|| {
            let err = DomainError::not_found();
            self.rejected(OP_GET, &err);
            err
        })
    }

    /// Case-insensitive substring search on the name.
    ///
    /// An absent or empty query returns every product, same as `list_all`.
    pub async fn search_by_name(&self, query: Option<&str>) -> DomainResult<Vec<Product>> {
        let query = match query {
            Some(q) if !q.is_empty() => q,
            _ => {
                self.notify(Notice::info(OP_SEARCH, "empty name query, listing all products"));
                return self.list_all().await;
            }
        };

        self.notify(Notice::info(OP_SEARCH, format!("searching products by name '{query}'")));
        let matches = self
            .store
            .find_where(&ProductFilter::NameContains(query.to_string()))
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_SEARCH, e))?;

        if matches.is_empty() {
            let err = DomainError::not_found_with(format!(
                "No products found that contains '{query}' in its name."
            ));
            self.rejected(OP_SEARCH, &err);
            return Err(err);
        }
        Ok(matches)
    }

    /// Create a product. Any client-chosen id is irrelevant: the store assigns one.
    pub async fn create(&self, new_product: NewProduct) -> DomainResult<Product> {
        self.notify(Notice::info(OP_CREATE, "creating product"));
        let draft = new_product
            .validate()
            .inspect_err(|e| self.rejected(OP_CREATE, e))?;

        if !self.is_product_unique(&draft.name).await? {
            let err = DomainError::conflict(format!("Product {} already exists.", draft.name));
            self.rejected(OP_CREATE, &err);
            return Err(err);
        }

        // The store re-checks the name atomically with the write.
        let product = self
            .store
            .insert(draft)
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_CREATE, e))?;

        self.notify(Notice::info(
            OP_CREATE,
            format!("created product {} '{}'", product.id, product.name),
        ));
        Ok(product)
    }

    /// Replace every mutable field of `id`.
    ///
    /// A store-reported conflict is resolved once: if the record is gone the update is
    /// `NotFound`; otherwise someone else changed it and the conflict is returned as
    /// `Fatal` for the caller to handle.
    pub async fn update(
        &self,
        id: ProductId,
        replacement: ProductReplacement,
    ) -> DomainResult<UpdateOutcome> {
        self.notify(Notice::info(OP_UPDATE, format!("updating product {id}")));
        let (draft, expected) = replacement
            .validate_for(id)
            .inspect_err(|e| self.rejected(OP_UPDATE, e))?;

        match self.store.replace(id, draft, expected).await {
            Ok(product) => {
                self.notify(Notice::info(
                    OP_UPDATE,
                    format!("updated product {id} to version {}", product.version),
                ));
                Ok(UpdateOutcome {
                    message: UPDATE_CONFIRMATION,
                    product,
                })
            }
            Err(StoreError::Concurrency(detail)) => {
                let err = if self.product_exists(id).await? {
                    DomainError::fatal(format!("update of product {id} conflicted: {detail}"))
                } else {
                    DomainError::not_found()
                };
                self.rejected(OP_UPDATE, &err);
                Err(err)
            }
            Err(other) => {
                let err = DomainError::from(other);
                self.rejected(OP_UPDATE, &err);
                Err(err)
            }
        }
    }

    /// Delete `id`, returning the record as it was.
    pub async fn delete(&self, id: ProductId) -> DomainResult<Product> {
        self.notify(Notice::info(OP_DELETE, format!("deleting product {id}")));
        let existing = self
            .store
            .find(id)
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_DELETE, e))?;
        if existing.is_none() {
            let err = DomainError::not_found_with(format!("Product {id} does not exist."));
            self.rejected(OP_DELETE, &err);
            return Err(err);
        }

        let removed = self
            .store
            .remove(id)
            .await
            .map_err(DomainError::from)
            .inspect_err(|e| self.rejected(OP_DELETE, e))?;

        match removed {
            Some(product) => {
                self.notify(Notice::info(OP_DELETE, format!("deleted product {id}")));
                Ok(product)
            }
            None => {
                let err = DomainError::not_found_with(format!("Product {id} does not exist."));
                self.rejected(OP_DELETE, &err);
                Err(err)
            }
        }
    }

    pub async fn product_exists(&self, id: ProductId) -> DomainResult<bool> {
        Ok(self.store.find(id).await?.is_some())
    }

    /// True when no product has this name, ignoring case.
    pub async fn is_product_unique(&self, name: &str) -> DomainResult<bool> {
        let same = self
            .store
            .find_where(&ProductFilter::NameEquals(name.to_string()))
            .await?;
        Ok(same.is_empty())
    }
}
