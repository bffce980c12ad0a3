use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a002_supplier::aggregate::{Supplier, SupplierDto};
use contracts::enums::{Access, Section};
use contracts::shared::list::SearchParams;

use crate::domain::a002_supplier;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/suppliers
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Supplier>>, ErpError> {
    user.require(Section::Suppliers, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a002_supplier::service::list(&store, params.query())))
}

/// GET /api/suppliers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Supplier>, ErpError> {
    user.require(Section::Suppliers, Access::Read)?;
    let store = state.store.read().await;
    a002_supplier::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/suppliers
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<SupplierDto>,
) -> Result<Json<Supplier>, ErpError> {
    let actor = user.require(Section::Suppliers, Access::Write)?;
    let mut store = state.store.write().await;
    a002_supplier::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/suppliers/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<SupplierDto>,
) -> Result<Json<Supplier>, ErpError> {
    let actor = user.require(Section::Suppliers, Access::Write)?;
    let mut store = state.store.write().await;
    a002_supplier::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/suppliers/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Suppliers, Access::Write)?;
    let mut store = state.store.write().await;
    a002_supplier::service::delete(&mut store, &actor, &id)
}
