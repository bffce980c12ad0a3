use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::shared::app_state::AppState;
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    // ========================================
    // PUBLIC ROUTES
    // ========================================
    let public = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout));

    // ========================================
    // PROTECTED ROUTES (Bearer token)
    // ========================================
    let protected = Router::new()
        .route("/api/auth/me", get(system::handlers::auth::current_user))
        .route(
            "/api/auth/permissions",
            get(system::handlers::auth::permissions),
        )
        // A001 Client
        .route(
            "/api/clients",
            get(handlers::a001_client::list_all).post(handlers::a001_client::create),
        )
        .route(
            "/api/clients/:id",
            get(handlers::a001_client::get_by_id)
                .put(handlers::a001_client::update)
                .delete(handlers::a001_client::delete),
        )
        // A002 Supplier
        .route(
            "/api/suppliers",
            get(handlers::a002_supplier::list_all).post(handlers::a002_supplier::create),
        )
        .route(
            "/api/suppliers/:id",
            get(handlers::a002_supplier::get_by_id)
                .put(handlers::a002_supplier::update)
                .delete(handlers::a002_supplier::delete),
        )
        // A003 Employee
        .route(
            "/api/employees",
            get(handlers::a003_employee::list_all).post(handlers::a003_employee::create),
        )
        .route(
            "/api/employees/:id",
            get(handlers::a003_employee::get_by_id)
                .put(handlers::a003_employee::update)
                .delete(handlers::a003_employee::delete),
        )
        .route(
            "/api/employees/:id/block",
            post(handlers::a003_employee::block),
        )
        .route(
            "/api/employees/:id/unblock",
            post(handlers::a003_employee::unblock),
        )
        .route(
            "/api/employees/:id/change-password",
            post(handlers::a003_employee::change_password),
        )
        // A004 Product
        .route(
            "/api/products",
            get(handlers::a004_product::list_all).post(handlers::a004_product::create),
        )
        .route(
            "/api/products/:id",
            get(handlers::a004_product::get_by_id)
                .put(handlers::a004_product::update)
                .delete(handlers::a004_product::delete),
        )
        // A005 Warehouse
        .route(
            "/api/warehouses",
            get(handlers::a005_warehouse::list_all).post(handlers::a005_warehouse::create),
        )
        .route(
            "/api/warehouses/:id",
            get(handlers::a005_warehouse::get_by_id)
                .put(handlers::a005_warehouse::update)
                .delete(handlers::a005_warehouse::delete),
        )
        // A006 Invoice
        .route(
            "/api/invoices",
            get(handlers::a006_invoice::list_all).post(handlers::a006_invoice::create),
        )
        .route(
            "/api/invoices/preview",
            post(handlers::a006_invoice::preview),
        )
        .route(
            "/api/invoices/export.csv",
            get(handlers::a006_invoice::export_csv),
        )
        .route(
            "/api/invoices/:id",
            get(handlers::a006_invoice::get_by_id)
                .put(handlers::a006_invoice::update)
                .delete(handlers::a006_invoice::delete),
        )
        .route(
            "/api/invoices/:id/status",
            post(handlers::a006_invoice::change_status),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list_all).delete(handlers::notifications::clear_all),
        )
        .route(
            "/api/notifications/settings",
            get(handlers::notifications::get_settings)
                .put(handlers::notifications::update_settings),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        // Activity log
        .route(
            "/api/activity-log",
            get(handlers::activity_log::list_all)
                .post(handlers::activity_log::create)
                .delete(handlers::activity_log::clear_all),
        )
        // D400 Dashboard
        .route(
            "/api/dashboard/summary",
            get(handlers::d400_summary::get_summary),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            system::auth::middleware::require_auth,
        ));

    public.merge(protected).with_state(state)
}
