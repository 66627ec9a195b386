//! Postgres-backed product store.
//!
//! Expects the `products` table from `sql/products.sql`.
//!
//! ## Conditional insert
//!
//! Name uniqueness is only a create-time rule, so it is not a table constraint (updates
//! may rename freely). Instead `insert` runs in a transaction that first takes a
//! transaction-scoped advisory lock keyed on the lower-cased name, then checks and
//! inserts. Two creators racing on the same name serialize on that lock.
//!
//! ## Compare-and-swap update
//!
//! `replace` is a single `UPDATE ... WHERE id = $1 AND ($6 IS NULL OR version = $6)`.
//! Zero affected rows is reported as [`StoreError::Concurrency`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use catalog_core::ExpectedVersion;
use catalog_products::{PricingMetadata, Product, ProductDraft, ProductId};

use super::{ProductFilter, ProductStore, StoreError, StoreResult};

const COLUMNS: &str =
    "id, name, description, base_price, currency, version, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(backend)?;
        Ok(Self::new(pool))
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "postgres product store failure");
    StoreError::Backend(err.to_string())
}

fn price_to_db(price: Option<u64>) -> StoreResult<Option<i64>> {
    price
        .map(|p| {
            i64::try_from(p).map_err(|_| StoreError::Backend(format!("base_price {p} out of range")))
        })
        .transpose()
}

fn row_to_product(row: &PgRow) -> StoreResult<Product> {
    let id: i64 = row.try_get("id").map_err(backend)?;
    let base_price: Option<i64> = row.try_get("base_price").map_err(backend)?;
    let version: i64 = row.try_get("version").map_err(backend)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(backend)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(backend)?;

    Ok(Product {
        id: ProductId::new(id),
        name: row.try_get("name").map_err(backend)?,
        description: row.try_get("description").map_err(backend)?,
        pricing: PricingMetadata {
            base_price: base_price
                .map(|p| {
                    u64::try_from(p)
                        .map_err(|_| StoreError::Backend(format!("negative base_price {p}")))
                })
                .transpose()?,
            currency: row.try_get("currency").map_err(backend)?,
        },
        version: u64::try_from(version)
            .map_err(|_| StoreError::Backend(format!("negative version {version}")))?,
        created_at,
        updated_at,
    })
}

fn rows_to_products(rows: &[PgRow]) -> StoreResult<Vec<Product>> {
    rows.iter().map(row_to_product).collect()
}

/// Escape LIKE metacharacters so the query is matched literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows_to_products(&rows)
    }

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn find_where(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let (predicate, arg) = match filter {
            ProductFilter::NameEquals(name) => ("lower(name) = lower($1)", name.clone()),
            ProductFilter::NameContains(q) => ("lower(name) LIKE lower($1) ESCAPE '\\'", like_pattern(q)),
        };
        let sql = format!("SELECT {COLUMNS} FROM products WHERE {predicate} ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(arg)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows_to_products(&rows)
    }

    async fn insert(&self, draft: ProductDraft) -> StoreResult<Product> {
        let base_price = price_to_db(draft.pricing.base_price)?;
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext(lower($1)))")
            .bind(&draft.name)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        let taken: bool =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM products WHERE lower(name) = lower($1))")
                .bind(&draft.name)
                .fetch_one(&mut *tx)
                .await
                .map_err(backend)?;
        if taken {
            // Dropping the transaction rolls it back and releases the lock.
            return Err(StoreError::DuplicateName(draft.name));
        }

        let row = sqlx::query(&format!(
            "INSERT INTO products (name, description, base_price, currency, version, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 1, now(), now()) \
             RETURNING {COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(base_price)
        .bind(&draft.pricing.currency)
        .fetch_one(&mut *tx)
        .await
        .map_err(backend)?;

        let product = row_to_product(&row)?;
        tx.commit().await.map_err(backend)?;
        Ok(product)
    }

    async fn replace(
        &self,
        id: ProductId,
        draft: ProductDraft,
        expected: ExpectedVersion,
    ) -> StoreResult<Product> {
        let base_price = price_to_db(draft.pricing.base_price)?;
        let expected_version = expected
            .exact()
            .map(|v| {
                i64::try_from(v).map_err(|_| StoreError::Backend(format!("version {v} out of range")))
            })
            .transpose()?;

        let row = sqlx::query(&format!(
            "UPDATE products \
             SET name = $2, description = $3, base_price = $4, currency = $5, \
                 version = version + 1, updated_at = now() \
             WHERE id = $1 AND ($6::BIGINT IS NULL OR version = $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(id.get())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(base_price)
        .bind(&draft.pricing.currency)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => row_to_product(&row),
            None => Err(StoreError::Concurrency(format!(
                "no row matched product {id} (expected {expected:?})"
            ))),
        }
    }

    async fn remove(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(&format!("DELETE FROM products WHERE id = $1 RETURNING {COLUMNS}"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_product).transpose()
    }
}
