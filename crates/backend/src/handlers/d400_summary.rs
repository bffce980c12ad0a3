use axum::extract::State;
use axum::Json;
use contracts::dashboards::d400_summary::DashboardSummary;
use contracts::enums::{Access, Section};

use crate::dashboards::d400_summary;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/dashboard/summary
pub async fn get_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardSummary>, ErpError> {
    user.require(Section::Dashboard, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(d400_summary::service::get_summary(&store)))
}
