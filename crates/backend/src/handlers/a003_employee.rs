use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a003_employee::aggregate::{ChangePasswordDto, Employee, EmployeeDto};
use contracts::enums::{Access, Section};
use contracts::shared::list::SearchParams;

use crate::domain::a003_employee;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/employees
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Employee>>, ErpError> {
    user.require(Section::Employees, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a003_employee::service::list(&store, params.query())))
}

/// GET /api/employees/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ErpError> {
    user.require(Section::Employees, Access::Read)?;
    let store = state.store.read().await;
    a003_employee::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/employees
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<EmployeeDto>,
) -> Result<Json<Employee>, ErpError> {
    let actor = user.require(Section::Employees, Access::Write)?;
    let mut store = state.store.write().await;
    a003_employee::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/employees/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<EmployeeDto>,
) -> Result<Json<Employee>, ErpError> {
    let actor = user.require(Section::Employees, Access::Write)?;
    let mut store = state.store.write().await;
    a003_employee::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/employees/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Employees, Access::Write)?;
    let mut store = state.store.write().await;
    a003_employee::service::delete(&mut store, &actor, &id)
}

/// POST /api/employees/:id/block
pub async fn block(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ErpError> {
    let actor = user.require(Section::Employees, Access::Write)?;
    let mut store = state.store.write().await;
    a003_employee::service::block(&mut store, &actor, &id).map(Json)
}

/// POST /api/employees/:id/unblock
pub async fn unblock(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ErpError> {
    let actor = user.require(Section::Employees, Access::Write)?;
    let mut store = state.store.write().await;
    a003_employee::service::unblock(&mut store, &actor, &id).map(Json)
}

/// POST /api/employees/:id/change-password
///
/// Свой пароль может сменить любой сотрудник, чужой только с правом записи.
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ChangePasswordDto>,
) -> Result<(), ErpError> {
    let can_manage = user.0.role.can(Section::Employees, Access::Write);
    let actor = user.actor();
    let mut store = state.store.write().await;
    a003_employee::service::change_password(&mut store, &actor, &id, dto, can_manage)
}
