use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a005_warehouse::aggregate::{Warehouse, WarehouseDto};
use contracts::enums::{Access, Section};
use contracts::shared::list::SearchParams;

use crate::domain::a005_warehouse;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/warehouses
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Warehouse>>, ErpError> {
    user.require(Section::Warehouses, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a005_warehouse::service::list(&store, params.query())))
}

/// GET /api/warehouses/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Warehouse>, ErpError> {
    user.require(Section::Warehouses, Access::Read)?;
    let store = state.store.read().await;
    a005_warehouse::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/warehouses
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<WarehouseDto>,
) -> Result<Json<Warehouse>, ErpError> {
    let actor = user.require(Section::Warehouses, Access::Write)?;
    let mut store = state.store.write().await;
    a005_warehouse::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/warehouses/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<WarehouseDto>,
) -> Result<Json<Warehouse>, ErpError> {
    let actor = user.require(Section::Warehouses, Access::Write)?;
    let mut store = state.store.write().await;
    a005_warehouse::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/warehouses/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Warehouses, Access::Write)?;
    let mut store = state.store.write().await;
    a005_warehouse::service::delete(&mut store, &actor, &id)
}
