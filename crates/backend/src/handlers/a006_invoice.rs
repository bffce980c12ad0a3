use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use contracts::domain::a006_invoice::aggregate::{
    Invoice, InvoiceDto, InvoiceListParams, InvoicePreview, InvoiceStatusDto,
};
use contracts::enums::{Access, Section};

use crate::domain::a006_invoice;
use crate::shared::app_state::AppState;
use crate::shared::error::ErpError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/invoices?kind=&status=&client_id=&supplier_id=&q=
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<InvoiceListParams>,
) -> Result<Json<Vec<Invoice>>, ErpError> {
    user.require(Section::Invoices, Access::Read)?;
    let store = state.store.read().await;
    Ok(Json(a006_invoice::service::list(&store, &params)))
}

/// GET /api/invoices/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ErpError> {
    user.require(Section::Invoices, Access::Read)?;
    let store = state.store.read().await;
    a006_invoice::service::get_by_id(&store, &id).map(Json)
}

/// POST /api/invoices
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<InvoiceDto>,
) -> Result<Json<Invoice>, ErpError> {
    let actor = user.require(Section::Invoices, Access::Write)?;
    let mut store = state.store.write().await;
    a006_invoice::service::create(&mut store, &actor, dto).map(Json)
}

/// PUT /api/invoices/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<InvoiceDto>,
) -> Result<Json<Invoice>, ErpError> {
    let actor = user.require(Section::Invoices, Access::Write)?;
    let mut store = state.store.write().await;
    a006_invoice::service::update(&mut store, &actor, &id, dto).map(Json)
}

/// DELETE /api/invoices/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<(), ErpError> {
    let actor = user.require(Section::Invoices, Access::Write)?;
    let mut store = state.store.write().await;
    a006_invoice::service::delete(&mut store, &actor, &id)
}

/// POST /api/invoices/:id/status
pub async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<InvoiceStatusDto>,
) -> Result<Json<Invoice>, ErpError> {
    let actor = user.require(Section::Invoices, Access::Write)?;
    let mut store = state.store.write().await;
    a006_invoice::service::change_status(&mut store, &actor, &id, dto.status).map(Json)
}

/// POST /api/invoices/preview
///
/// Пересчёт строк и итогов формы без сохранения
pub async fn preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<InvoiceDto>,
) -> Result<Json<InvoicePreview>, ErpError> {
    user.require(Section::Invoices, Access::Read)?;
    let store = state.store.read().await;
    a006_invoice::service::preview(&store, &dto).map(Json)
}

/// GET /api/invoices/export.csv
pub async fn export_csv(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<InvoiceListParams>,
) -> Result<impl IntoResponse, ErpError> {
    user.require(Section::Invoices, Access::Read)?;
    let store = state.store.read().await;
    let invoices = a006_invoice::service::list(&store, &params);
    let body = a006_invoice::export::to_csv(&store, &invoices)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"facturas.csv\"",
            ),
        ],
        body,
    ))
}
