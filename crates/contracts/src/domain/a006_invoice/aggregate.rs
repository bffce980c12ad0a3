use super::calc::{InvoiceLine, InvoiceTotals};
use crate::domain::common::validation::normalize;
use crate::domain::common::BaseAggregate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Идентификатор счёта (factura)
    InvoiceId
);

/// Вид счёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceKind {
    /// Продажа клиенту: списывает остаток
    Sale,
    /// Закупка у поставщика: оплаченная приходует остаток
    Purchase,
}

impl InvoiceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            InvoiceKind::Sale => "Factura de venta",
            InvoiceKind::Purchase => "Factura de compra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn all() -> Vec<InvoiceStatus> {
        vec![
            InvoiceStatus::Draft,
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// Документ счёта (агрегат a006)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// base.code: номер счёта (напр. "FV-2026-0001")
    #[serde(flatten)]
    pub base: BaseAggregate<InvoiceId>,

    pub kind: InvoiceKind,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    /// Ссылка на a001_client (для продаж)
    pub client_id: Option<String>,
    /// Ссылка на a002_supplier (для закупок)
    pub supplier_id: Option<String>,
    /// Ссылка на a003_employee
    pub employee_id: String,
    /// Ссылка на a005_warehouse
    pub warehouse_id: Option<String>,
    pub status: InvoiceStatus,
    pub payment_method: Option<PaymentMethod>,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
}

impl Invoice {
    pub fn new_for_insert(number: String, kind: InvoiceKind, issue_date: NaiveDate) -> Self {
        let description = format!("{} {}", kind.display_name(), number);
        Self {
            base: BaseAggregate::new(InvoiceId::new_v4(), number, description),
            kind,
            issue_date,
            due_date: None,
            client_id: None,
            supplier_id: None,
            employee_id: String::new(),
            warehouse_id: None,
            status: InvoiceStatus::Draft,
            payment_method: None,
            lines: Vec::new(),
            totals: InvoiceTotals::default(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn number(&self) -> &str {
        &self.base.code
    }

    /// Применить поля шапки из DTO. Строки задаются отдельно через `set_lines`.
    pub fn apply_header(&mut self, dto: &InvoiceDto, employee_id: String) {
        if let Some(date) = dto.issue_date {
            self.issue_date = date;
        }
        self.due_date = dto.due_date;
        self.client_id = normalize(dto.client_id.clone());
        self.supplier_id = normalize(dto.supplier_id.clone());
        self.employee_id = employee_id;
        self.warehouse_id = normalize(dto.warehouse_id.clone());
        if let Some(status) = dto.status {
            self.status = status;
        }
        self.payment_method = dto.payment_method;
        self.base.comment = normalize(dto.comment.clone());
    }

    /// Заменить строки и пересчитать итоги
    pub fn set_lines(&mut self, lines: Vec<InvoiceLine>) {
        self.lines = lines;
        self.recalculate();
    }

    pub fn recalculate(&mut self) {
        self.totals = InvoiceTotals::from_lines(&self.lines);
    }

    /// Итоги совпадают с суммой строк
    pub fn totals_consistent(&self) -> bool {
        self.totals == InvoiceTotals::from_lines(&self.lines)
    }

    /// Направление движения остатка: -1 списание, +1 приход, 0 нет движения
    pub fn stock_direction(&self) -> i64 {
        match (self.kind, self.status) {
            (InvoiceKind::Sale, InvoiceStatus::Cancelled) => 0,
            (InvoiceKind::Sale, _) => -1,
            (InvoiceKind::Purchase, InvoiceStatus::Paid) => 1,
            (InvoiceKind::Purchase, _) => 0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.code.trim().is_empty() {
            return Err("Invoice number cannot be empty".into());
        }
        if self.employee_id.trim().is_empty() {
            return Err("Employee is required".into());
        }
        match self.kind {
            InvoiceKind::Sale if self.client_id.is_none() => {
                return Err("A sales invoice requires a client".into());
            }
            InvoiceKind::Purchase if self.supplier_id.is_none() => {
                return Err("A purchase invoice requires a supplier".into());
            }
            _ => {}
        }
        if let Some(due) = self.due_date {
            if due < self.issue_date {
                return Err("Due date cannot be before the issue date".into());
            }
        }
        if self.lines.is_empty() {
            return Err("An invoice needs at least one line".into());
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.recalculate();
        self.base.before_write();
    }

    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        self.base.code.to_lowercase().contains(&q)
            || self
                .base
                .comment
                .as_ref()
                .map_or(false, |c| c.to_lowercase().contains(&q))
            || self
                .lines
                .iter()
                .any(|l| l.description.to_lowercase().contains(&q))
    }
}

crate::impl_aggregate_root!(Invoice, InvoiceId, "a006", "invoice", "Factura", "Facturas");

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InvoiceLineDto {
    pub product_id: String,
    /// По умолчанию наименование товара
    pub description: Option<String>,
    pub quantity: i64,
    /// По умолчанию цена товара
    pub unit_price: Option<f64>,
    /// По умолчанию ставка НДС товара
    pub vat_rate: Option<f64>,
    pub discount_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDto {
    pub id: Option<String>,
    /// Если не указан, присваивается автоматически
    pub number: Option<String>,
    pub kind: InvoiceKind,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub client_id: Option<String>,
    pub supplier_id: Option<String>,
    /// По умолчанию текущий сотрудник
    pub employee_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub comment: Option<String>,
    #[serde(default)]
    pub lines: Vec<InvoiceLineDto>,
}

impl InvoiceDto {
    pub fn new(kind: InvoiceKind) -> Self {
        Self {
            id: None,
            number: None,
            kind,
            issue_date: None,
            due_date: None,
            client_id: None,
            supplier_id: None,
            employee_id: None,
            warehouse_id: None,
            status: None,
            payment_method: None,
            comment: None,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceStatusDto {
    pub status: InvoiceStatus,
}

/// Результат пересчёта черновика без сохранения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePreview {
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
}

/// Параметры списка счетов
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InvoiceListParams {
    pub kind: Option<InvoiceKind>,
    pub status: Option<InvoiceStatus>,
    pub client_id: Option<String>,
    pub supplier_id: Option<String>,
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(kind: InvoiceKind, status: InvoiceStatus) -> Invoice {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut inv = Invoice::new_for_insert("FV-2026-0001".into(), kind, date);
        inv.status = status;
        inv.employee_id = "e".into();
        inv.client_id = Some("c".into());
        inv.set_lines(vec![InvoiceLine::compute(
            "p".into(),
            "Tornillo".into(),
            2,
            1.5,
            21.0,
            0.0,
        )]);
        inv
    }

    #[test]
    fn test_stock_direction() {
        use InvoiceKind::*;
        use InvoiceStatus::*;
        assert_eq!(invoice(Sale, Draft).stock_direction(), -1);
        assert_eq!(invoice(Sale, Pending).stock_direction(), -1);
        assert_eq!(invoice(Sale, Paid).stock_direction(), -1);
        assert_eq!(invoice(Sale, Cancelled).stock_direction(), 0);
        assert_eq!(invoice(Purchase, Pending).stock_direction(), 0);
        assert_eq!(invoice(Purchase, Paid).stock_direction(), 1);
        assert_eq!(invoice(Purchase, Cancelled).stock_direction(), 0);
    }

    #[test]
    fn test_set_lines_recalculates() {
        let inv = invoice(InvoiceKind::Sale, InvoiceStatus::Draft);
        assert_eq!(inv.totals.taxable_base, 3.0);
        assert_eq!(inv.totals.vat_total, 0.63);
        assert_eq!(inv.totals.total, 3.63);
        assert!(inv.totals_consistent());
    }

    #[test]
    fn test_validation() {
        let mut inv = invoice(InvoiceKind::Sale, InvoiceStatus::Draft);
        assert!(inv.validate().is_ok());

        inv.client_id = None;
        assert!(inv.validate().is_err());

        let mut inv = invoice(InvoiceKind::Purchase, InvoiceStatus::Draft);
        assert!(inv.validate().is_err(), "purchase without supplier");
        inv.supplier_id = Some("s".into());
        assert!(inv.validate().is_ok());

        inv.set_lines(Vec::new());
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_due_date_before_issue_date() {
        let mut inv = invoice(InvoiceKind::Sale, InvoiceStatus::Draft);
        inv.due_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(inv.validate().is_err());
    }
}
