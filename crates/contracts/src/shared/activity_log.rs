use serde::{Deserialize, Serialize};

/// Источник записи журнала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Server,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    Login,
    LoginFailed,
    Logout,
    Create,
    Update,
    Delete,
    StatusChange,
    StockAdjustment,
    Other,
}

/// Запись журнала действий
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: ActivitySource,
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: ActivityAction,
    /// Имя коллекции агрегата, напр. "invoice"
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub message: String,
}

/// DTO для записи события со стороны консоли
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityLogRequest {
    pub action: Option<ActivityAction>,
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub message: String,
}

/// Фильтры журнала
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActivityLogQuery {
    pub entity: Option<String>,
    pub actor_id: Option<String>,
    pub action: Option<ActivityAction>,
    pub limit: Option<usize>,
}
