use contracts::dashboards::d400_summary::{
    DashboardSummary, EntityCount, LowStockItem, RecentInvoice, StatusCount,
};
use contracts::domain::a001_client::aggregate::Client;
use contracts::domain::a002_supplier::aggregate::Supplier;
use contracts::domain::a003_employee::aggregate::Employee;
use contracts::domain::a004_product::aggregate::Product;
use contracts::domain::a005_warehouse::aggregate::Warehouse;
use contracts::domain::a006_invoice::aggregate::{Invoice, InvoiceKind, InvoiceStatus};
use contracts::domain::a006_invoice::calc::round2;
use contracts::domain::common::AggregateRoot;

use crate::shared::data::store::{MockStore, Table};

const RECENT_INVOICES: usize = 5;

fn count<T: AggregateRoot + Clone>(table: &Table<T>) -> EntityCount {
    EntityCount {
        entity: T::collection_name().to_string(),
        label: T::list_name().to_string(),
        count: table.len(),
    }
}

/// Сумма итогов счетов, подходящих под условие
fn sum_totals(store: &MockStore, predicate: impl Fn(&Invoice) -> bool) -> f64 {
    round2(
        store
            .invoices
            .iter()
            .filter(|i| predicate(i))
            .map(|i| i.totals.total)
            .sum(),
    )
}

/// Сводка для главной страницы
pub fn get_summary(store: &MockStore) -> DashboardSummary {
    let counts = vec![
        count::<Client>(&store.clients),
        count::<Supplier>(&store.suppliers),
        count::<Employee>(&store.employees),
        count::<Product>(&store.products),
        count::<Warehouse>(&store.warehouses),
        count::<Invoice>(&store.invoices),
    ];

    let sales_total = sum_totals(store, |i| {
        i.kind == InvoiceKind::Sale && i.status != InvoiceStatus::Cancelled
    });
    let purchases_total = sum_totals(store, |i| {
        i.kind == InvoiceKind::Purchase && i.status == InvoiceStatus::Paid
    });
    let outstanding_receivables = sum_totals(store, |i| {
        i.kind == InvoiceKind::Sale && i.status == InvoiceStatus::Pending
    });

    let invoices_by_status = InvoiceStatus::all()
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: store.invoices.iter().filter(|i| i.status == status).count(),
        })
        .collect();

    let threshold = store.notification_settings.low_stock_threshold;
    let mut low_stock: Vec<LowStockItem> = store
        .products
        .iter()
        .filter(|p| p.is_low_stock(threshold))
        .map(|p| LowStockItem {
            product_id: p.to_string_id(),
            code: p.base.code.clone(),
            name: p.base.description.clone(),
            stock: p.stock,
            threshold: p.low_stock_threshold(threshold),
        })
        .collect();
    low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.code.cmp(&b.code)));

    let mut recent: Vec<&Invoice> = store.invoices.iter().collect();
    recent.sort_by(|a, b| {
        b.issue_date
            .cmp(&a.issue_date)
            .then_with(|| b.base.metadata.created_at.cmp(&a.base.metadata.created_at))
    });
    let recent_invoices = recent
        .into_iter()
        .take(RECENT_INVOICES)
        .map(|i| RecentInvoice {
            id: i.to_string_id(),
            number: i.number().to_string(),
            kind: i.kind,
            status: i.status,
            issue_date: i.issue_date,
            total: i.totals.total,
        })
        .collect();

    DashboardSummary {
        counts,
        sales_total,
        purchases_total,
        outstanding_receivables,
        invoices_by_status,
        low_stock,
        recent_invoices,
    }
}
