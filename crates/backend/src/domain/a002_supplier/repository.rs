use contracts::domain::a002_supplier::aggregate::{Supplier, SupplierId};

use crate::shared::data::store::MockStore;

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Supplier> {
    let mut items: Vec<Supplier> = store
        .suppliers
        .iter()
        .filter(|s| q.map_or(true, |q| s.matches(q)))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    items
}

pub fn get_by_id(store: &MockStore, id: SupplierId) -> Option<Supplier> {
    store.suppliers.get(id).cloned()
}

pub fn insert(store: &mut MockStore, supplier: Supplier) {
    store.suppliers.insert(supplier);
}

pub fn update(store: &mut MockStore, supplier: Supplier) -> bool {
    store.suppliers.replace(supplier)
}

pub fn delete(store: &mut MockStore, id: SupplierId) -> Option<Supplier> {
    store.suppliers.remove(id)
}

/// Ссылки на поставщика: (счета, товары)
pub fn reference_counts(store: &MockStore, id: SupplierId) -> (usize, usize) {
    let id = id.to_string();
    let invoices = store
        .invoices
        .iter()
        .filter(|i| i.supplier_id.as_deref() == Some(id.as_str()))
        .count();
    let products = store
        .products
        .iter()
        .filter(|p| p.supplier_id.as_deref() == Some(id.as_str()))
        .count();
    (invoices, products)
}
