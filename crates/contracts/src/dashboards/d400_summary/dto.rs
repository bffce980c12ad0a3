use crate::domain::a006_invoice::aggregate::{InvoiceKind, InvoiceStatus};
use serde::{Deserialize, Serialize};

/// Сводка для главной страницы консоли
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub counts: Vec<EntityCount>,
    /// Сумма продаж (кроме отменённых), с НДС
    pub sales_total: f64,
    /// Сумма оплаченных закупок, с НДС
    pub purchases_total: f64,
    /// Неоплаченные продажи (Pending)
    pub outstanding_receivables: f64,
    pub invoices_by_status: Vec<StatusCount>,
    pub low_stock: Vec<LowStockItem>,
    pub recent_invoices: Vec<RecentInvoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCount {
    /// Имя коллекции, напр. "client"
    pub entity: String,
    /// Подпись для UI, напр. "Clientes"
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: InvoiceStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockItem {
    pub product_id: String,
    pub code: String,
    pub name: String,
    pub stock: i64,
    pub threshold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentInvoice {
    pub id: String,
    pub number: String,
    pub kind: InvoiceKind,
    pub status: InvoiceStatus,
    pub issue_date: chrono::NaiveDate,
    pub total: f64,
}
