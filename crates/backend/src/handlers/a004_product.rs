use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a004_product::aggregate::{Product, ProductDto, ProductListParams};
use contracts::enums::{Access, Section};

use crate::domain::a004_product;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/products?q=&low_stock_only=
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<Product>>, ErpError> {
    user.require(Section::Products, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a004_product::service::list(&store, &params)))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Product>, ErpError> {
    user.require(Section::Products, Access::Read)?;
    let store = state.store.read().await;
    a004_product::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, ErpError> {
    let actor = user.require(Section::Products, Access::Write)?;
    let mut store = state.store.write().await;
    a004_product::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, ErpError> {
    let actor = user.require(Section::Products, Access::Write)?;
    let mut store = state.store.write().await;
    a004_product::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Products, Access::Write)?;
    let mut store = state.store.write().await;
    a004_product::service::delete(&mut store, &actor, &id)
}
