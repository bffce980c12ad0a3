use contracts::domain::a003_employee::aggregate::EmployeeDto;
use contracts::enums::Role;

use crate::domain::a003_employee::service;
use crate::shared::activity_log::Actor;
use crate::shared::data::store::MockStore;
use crate::shared::error::ErpResult;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@erp.local";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Ensure an active administrator exists (create one if there is none)
pub fn ensure_admin_exists(store: &mut MockStore) -> ErpResult<()> {
    if store.employees.iter().any(|e| e.is_active_admin()) {
        return Ok(());
    }

    tracing::info!("No active administrator found. Creating default admin...");

    let admin_dto = EmployeeDto {
        id: None,
        code: None,
        name: "Administrador".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        phone: None,
        position: Some("Administrador del sistema".to_string()),
        role: Role::Admin,
        is_blocked: false,
        hired_on: None,
        comment: None,
        password: Some(DEFAULT_ADMIN_PASSWORD.to_string()),
    };

    let admin = service::create(store, &Actor::system(), admin_dto)?;

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Default admin created!");
    tracing::warn!("  Login: {}", DEFAULT_ADMIN_EMAIL);
    tracing::warn!("  Password: {}", DEFAULT_ADMIN_PASSWORD);
    tracing::warn!("  Employee: {}", admin.base.code);
    tracing::warn!("  ⚠️  PLEASE CHANGE THE PASSWORD IMMEDIATELY!");
    tracing::warn!("═══════════════════════════════════════════════");

    Ok(())
}
