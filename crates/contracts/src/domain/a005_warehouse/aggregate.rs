use crate::domain::common::validation::{normalize, require_text};
use crate::domain::common::BaseAggregate;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Идентификатор склада
    WarehouseId
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(flatten)]
    pub base: BaseAggregate<WarehouseId>,

    pub address: Option<String>,
    pub city: Option<String>,
    /// Ответственный сотрудник (ссылка на a003_employee)
    pub manager_id: Option<String>,
    /// Вместимость, единиц товара
    pub capacity: Option<i64>,
}

impl Warehouse {
    pub fn new_for_insert(code: String, dto: &WarehouseDto) -> Self {
        let mut warehouse = Self {
            base: BaseAggregate::new(WarehouseId::new_v4(), code, String::new()),
            address: None,
            city: None,
            manager_id: None,
            capacity: None,
        };
        warehouse.update(dto);
        warehouse
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn update(&mut self, dto: &WarehouseDto) {
        if let Some(code) = normalize(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.name.trim().to_string();
        self.base.comment = normalize(dto.comment.clone());
        self.address = normalize(dto.address.clone());
        self.city = normalize(dto.city.clone());
        self.manager_id = normalize(dto.manager_id.clone());
        self.capacity = dto.capacity;
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.base.description, "Name")?;
        require_text(&self.base.code, "Code")?;
        if matches!(self.capacity, Some(c) if c <= 0) {
            return Err("Capacity must be positive".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.before_write();
    }

    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        self.base.code.to_lowercase().contains(&q)
            || self.base.description.to_lowercase().contains(&q)
            || self
                .city
                .as_ref()
                .map_or(false, |c| c.to_lowercase().contains(&q))
    }
}

crate::impl_aggregate_root!(
    Warehouse,
    WarehouseId,
    "a005",
    "warehouse",
    "Almacén",
    "Almacenes"
);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WarehouseDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub manager_id: Option<String>,
    pub capacity: Option<i64>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_must_be_positive() {
        let dto = WarehouseDto {
            name: "Central".into(),
            capacity: Some(0),
            ..Default::default()
        };
        let w = Warehouse::new_for_insert("ALM-001".into(), &dto);
        assert!(w.validate().is_err());
    }
}
