use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProductDeleted, ProductInput, ProductUpdated, ProductView};
use super::services;
use crate::{
    error::AppResult,
    listing::{ListParams, ListQuery, PageResult},
    state::AppState,
    validation::ValidJson,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PageResult<ProductView>>> {
    let query = ListQuery::from(params);
    let page = services::list_products(state.gateway.as_ref(), &query).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let product = services::get_product(state.gateway.as_ref(), &id)
        .await?
        .or_error("Unknown product", "Unknown product")?;
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ProductInput>,
) -> AppResult<Json<ProductView>> {
    let product = services::create_product(state.gateway.as_ref(), &payload)
        .await
        .or_error("Unknown product", "Failed to create new product")?;
    info!(product_id = %product.id, "product created");
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<ProductInput>,
) -> AppResult<Json<ProductUpdated>> {
    let id = services::update_product(state.gateway.as_ref(), &id, &payload)
        .await
        .or_error("Unknown product", "Failed to update product")?;
    info!(product_id = %id, "product updated");
    Ok(Json(ProductUpdated {
        id,
        name: payload.name,
    }))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductDeleted>> {
    let id = services::delete_product(state.gateway.as_ref(), &id)
        .await
        .or_error("Unknown product", "Failed to delete product")?;
    info!(product_id = %id, "product deleted");
    Ok(Json(ProductDeleted { id }))
}
