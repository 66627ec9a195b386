use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ExpectedVersion};

pub const EMPTY_NAME_MESSAGE: &str = "Product name cannot be empty.";
pub const ID_MISMATCH_MESSAGE: &str = "Invalid Product ID.";

/// Product identifier, assigned by the store on creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Interpret a path segment as an id.
    ///
    /// Only plain ASCII digits that fit in an `i64` qualify; signs, whitespace and
    /// anything else yield `None` so the caller can treat the segment as a name.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse::<i64>().ok().map(Self)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Optional pricing metadata. Opaque to the catalog rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingMetadata {
    pub base_price: Option<u64>,  // Price in smallest currency unit (e.g., cents)
    pub currency: Option<String>, // ISO currency code (e.g., "USD", "EUR")
}

/// A persisted catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: PricingMetadata,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, identity-less product fields: what the store writes on insert or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub pricing: PricingMetadata,
}

/// Input for creating a product.
///
/// The name is optional here so that an absent name can be rejected with the same
/// error as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pricing: PricingMetadata,
}

impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Check required fields and produce the draft to insert.
    pub fn validate(self) -> DomainResult<ProductDraft> {
        let name = require_name(self.name)?;
        Ok(ProductDraft {
            name,
            description: self.description,
            pricing: self.pricing,
        })
    }
}

/// Full replacement of a product's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReplacement {
    /// Must equal the id the replacement is addressed to. A missing id never matches.
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub pricing: PricingMetadata,
    /// Version the caller last read, if any.
    pub version: Option<u64>,
}

impl ProductReplacement {
    /// Reject replacements whose embedded id disagrees with the addressed one, then
    /// validate the fields.
    pub fn validate_for(self, id: ProductId) -> DomainResult<(ProductDraft, ExpectedVersion)> {
        if self.id != Some(id) {
            return Err(DomainError::invalid_argument(ID_MISMATCH_MESSAGE));
        }
        let name = require_name(self.name)?;
        let draft = ProductDraft {
            name,
            description: self.description,
            pricing: self.pricing,
        };
        Ok((draft, ExpectedVersion::from_option(self.version)))
    }
}

fn require_name(name: Option<String>) -> DomainResult<String> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(DomainError::invalid_argument(EMPTY_NAME_MESSAGE)),
    }
}

/// Case-insensitive name equality (the uniqueness rule).
pub fn names_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive substring match (the fuzzy search rule).
pub fn name_contains(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}
