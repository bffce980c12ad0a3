use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a001_client::aggregate::{Client, ClientDto};
use contracts::enums::{Access, Section};
use contracts::shared::list::SearchParams;

use crate::domain::a001_client;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/clients
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Client>>, ErpError> {
    user.require(Section::Clients, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a001_client::service::list(&store, params.query())))
}

/// GET /api/clients/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Client>, ErpError> {
    user.require(Section::Clients, Access::Read)?;
    let store = state.store.read().await;
    a001_client::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<ClientDto>,
) -> Result<Json<Client>, ErpError> {
    let actor = user.require(Section::Clients, Access::Write)?;
    let mut store = state.store.write().await;
    a001_client::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ClientDto>,
) -> Result<Json<Client>, ErpError> {
    let actor = user.require(Section::Clients, Access::Write)?;
    let mut store = state.store.write().await;
    a001_client::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/clients/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Clients, Access::Write)?;
    let mut store = state.store.write().await;
    a001_client::service::delete(&mut store, &actor, &id)
}
