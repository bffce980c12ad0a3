use axum::extract::{Json, State};
use contracts::domain::a003_employee::aggregate::Employee;
use contracts::domain::common::AggregateRoot;
use contracts::shared::activity_log::ActivityAction;
use contracts::system::auth::{
    LoginRequest, LoginResponse, PermissionsResponse, RefreshRequest, RefreshResponse, UserInfo,
};

use crate::domain::a003_employee;
use crate::shared::activity_log::{self, Actor};
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{jwt, refresh_tokens};

fn user_info(employee: &Employee) -> UserInfo {
    UserInfo {
        id: employee.to_string_id(),
        code: employee.base.code.clone(),
        name: employee.base.description.clone(),
        email: employee.email.clone(),
        role: employee.role,
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErpError> {
    let mut store = state.store.write().await;

    // Verify credentials
    let employee =
        a003_employee::service::verify_credentials(&mut store, &request.email, &request.password)?;

    // Generate tokens
    let access_token = jwt::generate_access_token(&state.auth, &employee)?;
    let refresh_token = jwt::generate_refresh_token();
    refresh_tokens::store_refresh_token(
        &mut store,
        &employee.to_string_id(),
        &refresh_token,
        jwt::refresh_token_expiration(&state.auth),
    );

    activity_log::record(
        &mut store,
        &Actor::from(&employee),
        ActivityAction::Login,
        Some(Employee::collection_name()),
        Some(employee.to_string_id()),
        format!("{} signed in", employee.email),
    );

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(&employee),
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ErpError> {
    let store = state.store.read().await;

    let employee_id = refresh_tokens::validate_refresh_token(&store, &request.refresh_token)
        .ok_or(ErpError::Unauthorized)?;
    let employee = store
        .employees
        .get_by_ref(&employee_id)
        .ok_or(ErpError::Unauthorized)?;
    if employee.is_blocked {
        return Err(ErpError::AccountBlocked);
    }

    let access_token = jwt::generate_access_token(&state.auth, employee)?;
    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<(), ErpError> {
    let mut store = state.store.write().await;

    let employee_id = refresh_tokens::validate_refresh_token(&store, &request.refresh_token);
    if !refresh_tokens::revoke_refresh_token(&mut store, &request.refresh_token) {
        // unknown or already revoked token: nothing to sign out
        return Ok(());
    }

    let actor = employee_id
        .as_deref()
        .and_then(|id| store.employees.get_by_ref(id))
        .map(Actor::from)
        .unwrap_or_else(|| Actor::anonymous("unknown"));
    activity_log::record(
        &mut store,
        &actor,
        ActivityAction::Logout,
        Some(Employee::collection_name()),
        employee_id,
        format!("{} signed out", actor.name),
    );
    Ok(())
}

/// GET /api/auth/me
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserInfo>, ErpError> {
    let store = state.store.read().await;
    let employee = store
        .employees
        .get_by_ref(&claims.sub)
        .ok_or(ErpError::Unauthorized)?;
    Ok(Json(user_info(employee)))
}

/// GET /api/auth/permissions
pub async fn permissions(CurrentUser(claims): CurrentUser) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        role: claims.role,
        sections: claims.role.permissions(),
    })
}
