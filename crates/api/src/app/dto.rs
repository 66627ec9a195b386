use serde::Deserialize;

use catalog_products::{NewProduct, PricingMetadata, Product, ProductId, ProductReplacement};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    /// Accepted for compatibility but ignored: the store assigns ids.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: Option<PricingMetadata>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(body: CreateProductRequest) -> Self {
        NewProduct {
            name: body.name,
            description: body.description,
            pricing: body.pricing.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: Option<PricingMetadata>,
    /// Version last read by the client; enables compare-and-swap when present.
    #[serde(default)]
    pub version: Option<u64>,
}

impl From<UpdateProductRequest> for ProductReplacement {
    fn from(body: UpdateProductRequest) -> Self {
        ProductReplacement {
            id: body.id.map(ProductId::new),
            name: body.name,
            description: body.description,
            pricing: body.pricing.unwrap_or_default(),
            version: body.version,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.get(),
        "name": product.name,
        "description": product.description,
        "pricing": {
            "base_price": product.pricing.base_price,
            "currency": product.pricing.currency,
        },
        "version": product.version,
        "created_at": product.created_at.to_rfc3339(),
        "updated_at": product.updated_at.to_rfc3339(),
    })
}

pub fn products_to_json(products: &[Product]) -> serde_json::Value {
    serde_json::Value::Array(products.iter().map(product_to_json).collect())
}

pub fn product_location(id: ProductId) -> String {
    format!("/products/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_ignores_client_id() {
        let body: CreateProductRequest =
            serde_json::from_value(serde_json::json!({ "id": 99, "name": "Chair" })).unwrap();
        let new_product = NewProduct::from(body);
        assert_eq!(new_product.name.as_deref(), Some("Chair"));
    }

    #[test]
    fn create_request_tolerates_missing_name() {
        let body: CreateProductRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(NewProduct::from(body).name, None);
    }

    #[test]
    fn update_request_maps_id_and_version() {
        let body: UpdateProductRequest = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Stool",
            "version": 2,
        }))
        .unwrap();
        let replacement = ProductReplacement::from(body);
        assert_eq!(replacement.id, Some(ProductId::new(3)));
        assert_eq!(replacement.version, Some(2));
    }

    #[test]
    fn location_points_at_get_by_id() {
        assert_eq!(product_location(ProductId::new(12)), "/products/12");
    }
}
