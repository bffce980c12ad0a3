use contracts::domain::a005_warehouse::aggregate::{Warehouse, WarehouseId};

use crate::shared::data::store::MockStore;

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Warehouse> {
    let mut items: Vec<Warehouse> = store
        .warehouses
        .iter()
        .filter(|w| q.map_or(true, |q| w.matches(q)))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    items
}

pub fn get_by_id(store: &MockStore, id: WarehouseId) -> Option<Warehouse> {
    store.warehouses.get(id).cloned()
}

pub fn insert(store: &mut MockStore, warehouse: Warehouse) {
    store.warehouses.insert(warehouse);
}

pub fn update(store: &mut MockStore, warehouse: Warehouse) -> bool {
    store.warehouses.replace(warehouse)
}

pub fn delete(store: &mut MockStore, id: WarehouseId) -> Option<Warehouse> {
    store.warehouses.remove(id)
}

/// Ссылки на склад: (товары, счета)
pub fn reference_counts(store: &MockStore, id: WarehouseId) -> (usize, usize) {
    let id = id.to_string();
    let products = store
        .products
        .iter()
        .filter(|p| p.warehouse_id.as_deref() == Some(id.as_str()))
        .count();
    let invoices = store
        .invoices
        .iter()
        .filter(|i| i.warehouse_id.as_deref() == Some(id.as_str()))
        .count();
    (products, invoices)
}
