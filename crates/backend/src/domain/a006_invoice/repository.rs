use contracts::domain::a006_invoice::aggregate::{Invoice, InvoiceId, InvoiceListParams};

use crate::shared::data::store::MockStore;

/// Список счетов: новые сверху (дата, затем номер)
pub fn list(store: &MockStore, params: &InvoiceListParams) -> Vec<Invoice> {
    let q = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let mut items: Vec<Invoice> = store
        .invoices
        .iter()
        .filter(|i| params.kind.map_or(true, |k| i.kind == k))
        .filter(|i| params.status.map_or(true, |s| i.status == s))
        .filter(|i| {
            params
                .client_id
                .as_deref()
                .map_or(true, |c| i.client_id.as_deref() == Some(c))
        })
        .filter(|i| {
            params
                .supplier_id
                .as_deref()
                .map_or(true, |s| i.supplier_id.as_deref() == Some(s))
        })
        .filter(|i| q.map_or(true, |q| i.matches(q)))
        .cloned()
        .collect();
    items.sort_by(|a, b| {
        b.issue_date
            .cmp(&a.issue_date)
            .then_with(|| b.base.code.cmp(&a.base.code))
    });
    items
}

pub fn get_by_id(store: &MockStore, id: InvoiceId) -> Option<Invoice> {
    store.invoices.get(id).cloned()
}

pub fn insert(store: &mut MockStore, invoice: Invoice) {
    store.invoices.insert(invoice);
}

pub fn update(store: &mut MockStore, invoice: Invoice) -> bool {
    store.invoices.replace(invoice)
}

pub fn delete(store: &mut MockStore, id: InvoiceId) -> Option<Invoice> {
    store.invoices.remove(id)
}

/// Максимальный порядковый номер среди счетов вида `PREFIX-YEAR-N` любого вида,
/// без учёта регистра (так же сравнивает `code_taken`)
pub fn max_sequence(store: &MockStore, marker: &str) -> u64 {
    let marker = marker.to_lowercase();
    store
        .invoices
        .iter()
        .filter_map(|i| {
            i.base
                .code
                .to_lowercase()
                .strip_prefix(&marker)
                .and_then(|seq| seq.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0)
}
