use crate::domain::common::validation::{check_email, normalize, require_text};
use crate::domain::common::BaseAggregate;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Идентификатор поставщика
    SupplierId
);

pub const DEFAULT_PAYMENT_TERMS_DAYS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(flatten)]
    pub base: BaseAggregate<SupplierId>,

    pub tax_id: Option<String>,
    /// Контактное лицо
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Отсрочка платежа, дней
    pub payment_terms_days: u32,
}

impl Supplier {
    pub fn new_for_insert(code: String, dto: &SupplierDto) -> Self {
        let mut supplier = Self {
            base: BaseAggregate::new(SupplierId::new_v4(), code, String::new()),
            tax_id: None,
            contact_name: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            country: None,
            payment_terms_days: DEFAULT_PAYMENT_TERMS_DAYS,
        };
        supplier.update(dto);
        supplier
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn update(&mut self, dto: &SupplierDto) {
        if let Some(code) = normalize(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.name.trim().to_string();
        self.base.comment = normalize(dto.comment.clone());
        self.tax_id = normalize(dto.tax_id.clone());
        self.contact_name = normalize(dto.contact_name.clone());
        self.email = normalize(dto.email.clone());
        self.phone = normalize(dto.phone.clone());
        self.address = normalize(dto.address.clone());
        self.city = normalize(dto.city.clone());
        self.country = normalize(dto.country.clone());
        self.payment_terms_days = dto.payment_terms_days.unwrap_or(DEFAULT_PAYMENT_TERMS_DAYS);
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.base.description, "Name")?;
        require_text(&self.base.code, "Code")?;
        check_email(self.email.as_deref())
    }

    pub fn before_write(&mut self) {
        self.base.before_write();
    }

    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        [
            Some(&self.base.code),
            Some(&self.base.description),
            self.tax_id.as_ref(),
            self.contact_name.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|v| v.to_lowercase().contains(&q))
    }
}

crate::impl_aggregate_root!(
    Supplier,
    SupplierId,
    "a002",
    "supplier",
    "Proveedor",
    "Proveedores"
);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupplierDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub tax_id: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub payment_terms_days: Option<u32>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payment_terms() {
        let dto = SupplierDto {
            name: "Distribuciones Norte".into(),
            ..Default::default()
        };
        let supplier = Supplier::new_for_insert("PRV-0001".into(), &dto);
        assert_eq!(supplier.payment_terms_days, DEFAULT_PAYMENT_TERMS_DAYS);
        assert!(supplier.validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let dto = SupplierDto {
            name: "Distribuciones Norte".into(),
            email: Some("ventas-at-norte.es".into()),
            ..Default::default()
        };
        let supplier = Supplier::new_for_insert("PRV-0001".into(), &dto);
        assert!(supplier.validate().is_err());
    }
}
