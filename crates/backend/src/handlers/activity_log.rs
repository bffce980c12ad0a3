use axum::extract::{Query, State};
use axum::Json;
use contracts::enums::{Access, Section};
use contracts::shared::activity_log::{ActivityLogEntry, ActivityLogQuery, CreateActivityLogRequest};
use serde_json::json;

use crate::shared::activity_log;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/activity-log?entity=&actor_id=&action=&limit=
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ActivityLogQuery>,
) -> Result<Json<Vec<ActivityLogEntry>>, ErpError> {
    user.require(Section::ActivityLog, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(activity_log::repository::list(&store, &query)))
}

/// POST /api/activity-log
///
/// Консоль пишет собственные события любого вошедшего сотрудника.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateActivityLogRequest>,
) -> Result<Json<ActivityLogEntry>, ErpError> {
    let actor = user.actor();
    let mut store = state.store.write().await;
    activity_log::record_from_console(&mut store, &actor, req).map(Json)
}

/// DELETE /api/activity-log
pub async fn clear_all(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ErpError> {
    let actor = user.require(Section::ActivityLog, Access::Write)?;
    let mut store = state.store.write().await;
    let removed = activity_log::clear(&mut store, &actor);
    Ok(Json(json!({ "removed": removed })))
}
