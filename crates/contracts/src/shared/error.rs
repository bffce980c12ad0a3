use serde::{Deserialize, Serialize};

/// Тело ответа с ошибкой; консоль показывает `message` во всплывающем уведомлении
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Машиночитаемый код, напр. "insufficient_stock"
    pub code: String,
    pub message: String,
}
