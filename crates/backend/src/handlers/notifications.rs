use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::enums::{Access, Section};
use contracts::system::notifications::{
    Notification, NotificationListParams, NotificationSettings, UnreadCountResponse,
};
use serde_json::json;

use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::notifications::service;

/// GET /api/notifications?unread_only=
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<Notification>>, ErpError> {
    user.require(Section::Notifications, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(service::list(&store, params.unread_only)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UnreadCountResponse>, ErpError> {
    user.require(Section::Notifications, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(UnreadCountResponse {
        unread: service::unread_count(&store),
    }))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<(), ErpError> {
    user.require(Section::Notifications, Access::Read)?;
    let mut store = state.store.write().await;
    service::mark_read(&mut store, id)
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ErpError> {
    user.require(Section::Notifications, Access::Read)?;
    let mut store = state.store.write().await;
    let updated = service::mark_all_read(&mut store);
    Ok(Json(json!({ "updated": updated })))
}

/// DELETE /api/notifications
pub async fn clear_all(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ErpError> {
    let actor = user.require(Section::Notifications, Access::Write)?;
    let mut store = state.store.write().await;
    let removed = service::clear(&mut store, &actor);
    Ok(Json(json!({ "removed": removed })))
}

/// GET /api/notifications/settings
pub async fn get_settings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<NotificationSettings>, ErpError> {
    user.require(Section::Notifications, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(service::get_settings(&store)))
}

/// PUT /api/notifications/settings
pub async fn update_settings(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>, ErpError> {
    let actor = user.require(Section::Notifications, Access::Write)?;
    let mut store = state.store.write().await;
    service::update_settings(&mut store, &actor, settings).map(Json)
}
