use contracts::domain::a004_product::aggregate::{Product, ProductId};

use crate::shared::data::store::MockStore;

pub fn list(store: &MockStore, q: Option<&str>, low_stock_threshold: Option<i64>) -> Vec<Product> {
    let mut items: Vec<Product> = store
        .products
        .iter()
        .filter(|p| q.map_or(true, |q| p.matches(q)))
        .filter(|p| low_stock_threshold.map_or(true, |t| p.is_low_stock(t)))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    items
}

pub fn get_by_id(store: &MockStore, id: ProductId) -> Option<Product> {
    store.products.get(id).cloned()
}

pub fn insert(store: &mut MockStore, product: Product) {
    store.products.insert(product);
}

pub fn update(store: &mut MockStore, product: Product) -> bool {
    store.products.replace(product)
}

pub fn delete(store: &mut MockStore, id: ProductId) -> Option<Product> {
    store.products.remove(id)
}

/// Количество счетов, в строках которых встречается товар
pub fn invoice_count(store: &MockStore, id: ProductId) -> usize {
    let id = id.to_string();
    store
        .invoices
        .iter()
        .filter(|i| i.lines.iter().any(|l| l.product_id == id))
        .count()
}
