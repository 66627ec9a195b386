use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_products::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:segment",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// What a `GET /products/{segment}` addresses.
///
/// Plain digits that fit an id select a single product; anything else is a name query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    Id(ProductId),
    Name(String),
}

impl ProductRef {
    pub fn parse(segment: &str) -> Self {
        match ProductId::from_path_segment(segment) {
            Some(id) => ProductRef::Id(id),
            None => ProductRef::Name(segment.to_string()),
        }
    }
}

fn parse_id(segment: &str) -> Result<ProductId, axum::response::Response> {
    ProductId::from_path_segment(segment).ok_or_else(|| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}

fn body_rejection(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let result = match query.name.as_deref() {
        Some(name) => services.products.search_by_name(Some(name)).await,
        None => services.products.list_all().await,
    };
    match result {
        Ok(products) => (StatusCode::OK, Json(dto::products_to_json(&products))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(segment): Path<String>,
) -> axum::response::Response {
    match ProductRef::parse(&segment) {
        ProductRef::Id(id) => match services.products.get_by_id(id).await {
            Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        ProductRef::Name(name) => match services.products.search_by_name(Some(&name)).await {
            Ok(products) => {
                (StatusCode::OK, Json(dto::products_to_json(&products))).into_response()
            }
            Err(e) => errors::domain_error_to_response(e),
        },
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return body_rejection(rejection),
    };

    match services.products.create(body.into()).await {
        Ok(product) => (
            StatusCode::CREATED,
            [(header::LOCATION, dto::product_location(product.id))],
            Json(dto::product_to_json(&product)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(segment): Path<String>,
    body: Result<Json<dto::UpdateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&segment) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return body_rejection(rejection),
    };

    match services.products.update(id, body.into()).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": outcome.message,
                "id": outcome.product.id.get(),
                "version": outcome.product.version,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(segment): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&segment) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.products.delete(id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
