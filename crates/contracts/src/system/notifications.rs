use serde::{Deserialize, Serialize};

/// Настройки уведомлений
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    /// Общий выключатель
    pub enabled: bool,
    /// Уведомлять о новых счетах
    pub invoice_alerts: bool,
    /// Уведомлять о низком остатке
    pub low_stock_alerts: bool,
    /// Порог остатка для товаров без собственного min_stock
    pub low_stock_threshold: i64,
    /// Уведомлять о блокировке и смене роли сотрудников
    pub employee_alerts: bool,
    /// Сколько уведомлений хранить
    pub max_notifications: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            invoice_alerts: true,
            low_stock_alerts: true,
            low_stock_threshold: 5,
            employee_alerts: true,
            max_notifications: 100,
        }
    }
}

impl NotificationSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.low_stock_threshold < 0 {
            return Err("Low stock threshold cannot be negative".into());
        }
        if self.max_notifications == 0 {
            return Err("At least one notification must be kept".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Invoice,
    Stock,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}
