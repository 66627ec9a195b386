//! Products domain module.
//!
//! This crate contains the business rules for the catalog's single entity, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    NewProduct, PricingMetadata, Product, ProductDraft, ProductId, ProductReplacement, name_contains,
    names_equal,
};
