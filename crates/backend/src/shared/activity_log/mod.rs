pub mod repository;

use contracts::domain::common::AggregateRoot;
use contracts::domain::a003_employee::aggregate::Employee;
use contracts::shared::activity_log::{
    ActivityAction, ActivityLogEntry, ActivitySource, CreateActivityLogRequest,
};
use contracts::system::auth::TokenClaims;

use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};

/// Кто выполняет операцию
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Option<String>,
    pub name: String,
}

impl Actor {
    /// Служебный актор для загрузки демо-данных и фоновых действий
    pub fn system() -> Self {
        Self {
            id: None,
            name: "system".into(),
        }
    }

    /// Неаутентифицированный пользователь (например, неудачный вход)
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

impl From<&TokenClaims> for Actor {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            id: Some(claims.sub.clone()),
            name: claims.name.clone(),
        }
    }
}

impl From<&Employee> for Actor {
    fn from(employee: &Employee) -> Self {
        Self {
            id: Some(employee.to_string_id()),
            name: employee.base.description.clone(),
        }
    }
}

/// Записать событие сервера в журнал
///
/// # Примеры
/// ```ignore
/// activity_log::record(store, &actor, ActivityAction::Login, None, None, "Signed in");
/// ```
pub fn record(
    store: &mut MockStore,
    actor: &Actor,
    action: ActivityAction,
    entity: Option<&str>,
    entity_id: Option<String>,
    message: impl Into<String>,
) {
    repository::append(
        store,
        ActivitySource::Server,
        actor,
        action,
        entity.map(str::to_string),
        entity_id,
        message.into(),
    );
}

/// Записать событие по агрегату: "Cliente CLI-0001 (Frutas Levante) created"
pub fn record_for<A: AggregateRoot>(
    store: &mut MockStore,
    actor: &Actor,
    action: ActivityAction,
    aggregate: &A,
) {
    let verb = match action {
        ActivityAction::Create => "created",
        ActivityAction::Update => "updated",
        ActivityAction::Delete => "deleted",
        ActivityAction::StatusChange => "changed status",
        ActivityAction::StockAdjustment => "adjusted stock",
        _ => "touched",
    };
    let message = format!(
        "{} {} ({}) {}",
        A::element_name(),
        aggregate.code(),
        aggregate.description(),
        verb
    );
    record(
        store,
        actor,
        action,
        Some(A::collection_name()),
        Some(aggregate.id_string()),
        message,
    );
}

/// Записать событие, пришедшее из консоли (source = client)
pub fn record_from_console(
    store: &mut MockStore,
    actor: &Actor,
    request: CreateActivityLogRequest,
) -> ErpResult<ActivityLogEntry> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ErpError::validation("Message cannot be empty"));
    }
    Ok(repository::append(
        store,
        ActivitySource::Client,
        actor,
        request.action.unwrap_or(ActivityAction::Other),
        request.entity,
        request.entity_id,
        message.to_string(),
    ))
}

/// Очистить журнал; сама очистка остаётся первой записью нового журнала
pub fn clear(store: &mut MockStore, actor: &Actor) -> usize {
    let removed = repository::clear(store);
    record(
        store,
        actor,
        ActivityAction::Delete,
        Some("activity_log"),
        None,
        format!("Activity log cleared ({} entries)", removed),
    );
    removed
}
