use crate::domain::common::validation::{normalize, require_text};
use crate::domain::common::BaseAggregate;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Идентификатор товара
    ProductId
);

pub const DEFAULT_UNIT: &str = "ud";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    pub category: Option<String>,
    /// Единица измерения
    pub unit: String,
    /// Цена без НДС
    pub price: f64,
    /// Ставка НДС, %
    pub vat_rate: f64,
    /// Остаток на складе
    pub stock: i64,
    /// Порог "мало на складе"; 0 означает общий порог из настроек уведомлений
    pub min_stock: i64,
    /// Ссылка на a002_supplier
    pub supplier_id: Option<String>,
    /// Ссылка на a005_warehouse
    pub warehouse_id: Option<String>,
}

impl Product {
    pub fn new_for_insert(dto: &ProductDto) -> Self {
        let mut product = Self {
            base: BaseAggregate::new(ProductId::new_v4(), String::new(), String::new()),
            category: None,
            unit: DEFAULT_UNIT.to_string(),
            price: 0.0,
            vat_rate: 0.0,
            stock: 0,
            min_stock: 0,
            supplier_id: None,
            warehouse_id: None,
        };
        product.update(dto);
        product
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn update(&mut self, dto: &ProductDto) {
        self.base.code = dto.code.clone().unwrap_or_default().trim().to_string();
        self.base.description = dto.name.trim().to_string();
        self.base.comment = normalize(dto.comment.clone());
        self.category = normalize(dto.category.clone());
        self.unit = normalize(dto.unit.clone()).unwrap_or_else(|| DEFAULT_UNIT.to_string());
        self.price = dto.price;
        self.vat_rate = dto.vat_rate;
        self.stock = dto.stock;
        self.min_stock = dto.min_stock;
        self.supplier_id = normalize(dto.supplier_id.clone());
        self.warehouse_id = normalize(dto.warehouse_id.clone());
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.base.code, "Code")?;
        require_text(&self.base.description, "Name")?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price cannot be negative".into());
        }
        if !self.vat_rate.is_finite() || !(0.0..=100.0).contains(&self.vat_rate) {
            return Err("VAT rate must be between 0 and 100".into());
        }
        if self.stock < 0 {
            return Err("Stock cannot be negative".into());
        }
        if self.min_stock < 0 {
            return Err("Minimum stock cannot be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.before_write();
    }

    /// Порог остатка для этого товара
    pub fn low_stock_threshold(&self, default_threshold: i64) -> i64 {
        if self.min_stock > 0 {
            self.min_stock
        } else {
            default_threshold
        }
    }

    pub fn is_low_stock(&self, default_threshold: i64) -> bool {
        self.stock <= self.low_stock_threshold(default_threshold)
    }

    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        self.base.code.to_lowercase().contains(&q)
            || self.base.description.to_lowercase().contains(&q)
            || self
                .category
                .as_ref()
                .map_or(false, |c| c.to_lowercase().contains(&q))
    }
}

crate::impl_aggregate_root!(Product, ProductId, "a004", "product", "Producto", "Productos");

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub vat_rate: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    pub supplier_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub comment: Option<String>,
}

/// Параметры списка товаров
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductListParams {
    pub q: Option<String>,
    #[serde(default)]
    pub low_stock_only: bool,
}
