use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::ExpectedVersion;
use catalog_products::{Product, ProductDraft, ProductId, names_equal};

use super::{ProductFilter, ProductStore, StoreError, StoreResult};

#[derive(Debug)]
struct State {
    next_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory product store for tests/dev.
///
/// All checks and writes happen under one write lock, so `insert` is atomic with its
/// name check.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("product store lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.rows.values().cloned().collect())
    }

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn find_where(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state
            .rows
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: ProductDraft) -> StoreResult<Product> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;

        if state.rows.values().any(|p| names_equal(&p.name, &draft.name)) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        let id = ProductId::new(state.next_id);
        state.next_id += 1;

        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name,
            description: draft.description,
            pricing: draft.pricing,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn replace(
        &self,
        id: ProductId,
        draft: ProductDraft,
        expected: ExpectedVersion,
    ) -> StoreResult<Product> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;

        let Some(row) = state.rows.get_mut(&id) else {
            return Err(StoreError::Concurrency(format!(
                "no product {id} to update"
            )));
        };
        if !expected.matches(row.version) {
            return Err(StoreError::Concurrency(format!(
                "product {id} is at version {} (expected {expected:?})",
                row.version
            )));
        }

        row.name = draft.name;
        row.description = draft.description;
        row.pricing = draft.pricing;
        row.version += 1;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn remove(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        Ok(state.rows.remove(&id))
    }
}
