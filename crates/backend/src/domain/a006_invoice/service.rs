use chrono::{Datelike, Utc};
use contracts::domain::a006_invoice::aggregate::{
    Invoice, InvoiceDto, InvoiceId, InvoiceKind, InvoiceLineDto, InvoiceListParams,
    InvoicePreview, InvoiceStatus,
};
use contracts::domain::a006_invoice::calc::{InvoiceLine, InvoiceTotals};
use contracts::domain::common::validation::normalize;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::{repository, stock};
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};
use crate::system::notifications::service as notifications;

fn not_found() -> ErpError {
    ErpError::NotFound {
        entity: Invoice::element_name(),
    }
}

fn parse_id(id: &str) -> ErpResult<InvoiceId> {
    InvoiceId::from_string(id).map_err(|_| not_found())
}

fn load(store: &MockStore, id: &str) -> ErpResult<(InvoiceId, Invoice)> {
    let id = parse_id(id)?;
    let invoice = repository::get_by_id(store, id).ok_or_else(not_found)?;
    Ok((id, invoice))
}

/// Следующий номер вида `FV-2026-0001`; последовательность своя для префикса и года.
/// Номера, введённые вручную, пропускаются.
pub fn next_number(store: &MockStore, kind: InvoiceKind, year: i32) -> ErpResult<String> {
    let prefix = match kind {
        InvoiceKind::Sale => &store.options.sales_prefix,
        InvoiceKind::Purchase => &store.options.purchase_prefix,
    };
    let marker = format!("{}-{}-", prefix, year);
    let mut seq = repository::max_sequence(store, &marker);
    loop {
        seq = seq.checked_add(1).ok_or_else(|| {
            ErpError::validation(format!("No free invoice numbers left for {}", marker))
        })?;
        let number = format!("{}{:04}", marker, seq);
        if !store.invoices.code_taken(&number, None) {
            return Ok(number);
        }
    }
}

/// Строки счёта из DTO. Незаполненные описание, цена и НДС берутся из товара.
fn build_lines(store: &MockStore, lines: &[InvoiceLineDto]) -> ErpResult<Vec<InvoiceLine>> {
    lines
        .iter()
        .map(|l| {
            let product = store.products.get_by_ref(&l.product_id).ok_or_else(|| {
                ErpError::validation(format!("Product {} does not exist", l.product_id))
            })?;
            Ok(InvoiceLine::compute(
                product.to_string_id(),
                normalize(l.description.clone()).unwrap_or_else(|| product.base.description.clone()),
                l.quantity,
                l.unit_price.unwrap_or(product.price),
                l.vat_rate.unwrap_or(product.vat_rate),
                l.discount_pct.unwrap_or(0.0),
            ))
        })
        .collect()
}

fn check_references(store: &MockStore, invoice: &Invoice) -> ErpResult<()> {
    let missing = |what: &str, id: &str| {
        ErpError::validation(format!("{} {} does not exist", what, id))
    };
    if let Some(id) = &invoice.client_id {
        if !store.clients.contains_ref(id) {
            return Err(missing("Client", id));
        }
    }
    if let Some(id) = &invoice.supplier_id {
        if !store.suppliers.contains_ref(id) {
            return Err(missing("Supplier", id));
        }
    }
    if !store.employees.contains_ref(&invoice.employee_id) {
        return Err(missing("Employee", &invoice.employee_id));
    }
    if let Some(id) = &invoice.warehouse_id {
        if !store.warehouses.contains_ref(id) {
            return Err(missing("Warehouse", id));
        }
    }
    Ok(())
}

fn ensure_unique_number(store: &MockStore, invoice: &Invoice, except: Option<InvoiceId>) -> ErpResult<()> {
    if store.invoices.code_taken(invoice.number(), except) {
        return Err(ErpError::DuplicateCode {
            entity: Invoice::element_name(),
            code: invoice.number().to_string(),
        });
    }
    Ok(())
}

/// Пересчёт черновика без сохранения
pub fn preview(store: &MockStore, dto: &InvoiceDto) -> ErpResult<InvoicePreview> {
    let lines = build_lines(store, &dto.lines)?;
    for line in &lines {
        line.validate().map_err(ErpError::Validation)?;
    }
    let totals = InvoiceTotals::from_lines(&lines);
    Ok(InvoicePreview { lines, totals })
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: InvoiceDto) -> ErpResult<Invoice> {
    let issue_date = dto.issue_date.unwrap_or_else(|| Utc::now().date_naive());
    let number = match normalize(dto.number.clone()) {
        Some(number) => number,
        None => next_number(store, dto.kind, issue_date.year())?,
    };
    let employee_id = normalize(dto.employee_id.clone())
        .or_else(|| actor.id.clone())
        .ok_or_else(|| ErpError::validation("Employee is required"))?;

    let mut invoice = Invoice::new_for_insert(number, dto.kind, issue_date);
    invoice.apply_header(&dto, employee_id);
    invoice.set_lines(build_lines(store, &dto.lines)?);

    invoice.validate().map_err(ErpError::Validation)?;
    check_references(store, &invoice)?;
    ensure_unique_number(store, &invoice, None)?;

    let impact = stock::impact(&invoice)?;
    stock::check(store, &impact)?;
    invoice.before_write();

    stock::apply(store, &impact);
    repository::insert(store, invoice.clone());
    activity_log::record_for(store, actor, ActivityAction::Create, &invoice);
    notifications::invoice_created(store, &invoice);
    notifications::check_low_stock(store, &stock::affected(&[&impact]));
    Ok(invoice)
}

pub fn update(store: &mut MockStore, actor: &Actor, id: &str, dto: InvoiceDto) -> ErpResult<Invoice> {
    let (id, current) = load(store, id)?;
    if dto.kind != current.kind {
        return Err(ErpError::validation("Invoice kind cannot be changed"));
    }

    let mut invoice = current.clone();
    if let Some(number) = normalize(dto.number.clone()) {
        invoice.base.description = format!("{} {}", invoice.kind.display_name(), number);
        invoice.base.code = number;
    }
    let employee_id =
        normalize(dto.employee_id.clone()).unwrap_or_else(|| current.employee_id.clone());
    invoice.apply_header(&dto, employee_id);
    invoice.set_lines(build_lines(store, &dto.lines)?);

    invoice.validate().map_err(ErpError::Validation)?;
    check_references(store, &invoice)?;
    ensure_unique_number(store, &invoice, Some(id))?;
    invoice.before_write();

    let old_impact = stock::impact(&current)?;
    let new_impact = stock::impact(&invoice)?;
    stock::replace(store, &old_impact, &new_impact)?;

    repository::update(store, invoice.clone());
    activity_log::record_for(store, actor, ActivityAction::Update, &invoice);
    notifications::check_low_stock(store, &stock::affected(&[&old_impact, &new_impact]));
    Ok(invoice)
}

/// Смена статуса; остатки пересчитываются так же, как при обновлении
pub fn change_status(
    store: &mut MockStore,
    actor: &Actor,
    id: &str,
    status: InvoiceStatus,
) -> ErpResult<Invoice> {
    let (_, current) = load(store, id)?;
    if current.status == status {
        return Ok(current);
    }

    let mut invoice = current.clone();
    invoice.status = status;
    invoice.before_write();

    let old_impact = stock::impact(&current)?;
    let new_impact = stock::impact(&invoice)?;
    stock::replace(store, &old_impact, &new_impact)?;

    repository::update(store, invoice.clone());
    activity_log::record(
        store,
        actor,
        ActivityAction::StatusChange,
        Some(Invoice::collection_name()),
        Some(invoice.to_string_id()),
        format!(
            "{} {} status {} -> {}",
            Invoice::element_name(),
            invoice.number(),
            current.status.code(),
            invoice.status.code()
        ),
    );
    notifications::check_low_stock(store, &stock::affected(&[&old_impact, &new_impact]));
    Ok(invoice)
}

pub fn delete(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<()> {
    let (id, current) = load(store, id)?;

    let revert = stock::negate(&stock::impact(&current)?);
    stock::apply_checked(store, &revert)?;

    repository::delete(store, id);
    activity_log::record_for(store, actor, ActivityAction::Delete, &current);
    notifications::check_low_stock(store, &stock::affected(&[&revert]));
    Ok(())
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Invoice> {
    load(store, id).map(|(_, i)| i)
}

pub fn list(store: &MockStore, params: &InvoiceListParams) -> Vec<Invoice> {
    repository::list(store, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_client::aggregate::{Client, ClientDto};
    use contracts::domain::a002_supplier::aggregate::{Supplier, SupplierDto};
    use contracts::domain::a003_employee::aggregate::{Employee, EmployeeDto};
    use contracts::domain::a004_product::aggregate::{Product, ProductDto, ProductId};
    use contracts::enums::Role;

    use crate::shared::data::store::StoreOptions;

    struct Fixture {
        store: MockStore,
        actor: Actor,
        client_id: String,
        supplier_id: String,
        bolt: ProductId,
        nut: ProductId,
    }

    fn fixture() -> Fixture {
        let mut store = MockStore::new(StoreOptions::default());
        let employee = Employee::new_for_insert(
            "EMP-0001".into(),
            &EmployeeDto {
                id: None,
                code: None,
                name: "Marta Vidal".into(),
                email: "marta@erp.local".into(),
                phone: None,
                position: None,
                role: Role::Sales,
                is_blocked: false,
                hired_on: None,
                comment: None,
                password: None,
            },
        );
        let actor = Actor::from(&employee);
        store.employees.insert(employee);

        let client = Client::new_for_insert(
            "CLI-0001".into(),
            &ClientDto {
                name: "Frutas Levante".into(),
                ..Default::default()
            },
        );
        let client_id = client.to_string_id();
        store.clients.insert(client);

        let supplier = Supplier::new_for_insert(
            "PRV-0001".into(),
            &SupplierDto {
                name: "Aceros del Norte".into(),
                ..Default::default()
            },
        );
        let supplier_id = supplier.to_string_id();
        store.suppliers.insert(supplier);

        let product = |code: &str, name: &str, price: f64, stock: i64| {
            Product::new_for_insert(&ProductDto {
                code: Some(code.into()),
                name: name.into(),
                price,
                vat_rate: 21.0,
                stock,
                ..Default::default()
            })
        };
        let bolt = product("TOR-M8", "Tornillo M8", 0.35, 100);
        let nut = product("TUE-M8", "Tuerca M8", 0.12, 50);
        let (bolt_id, nut_id) = (bolt.base.id, nut.base.id);
        store.products.insert(bolt);
        store.products.insert(nut);

        Fixture {
            store,
            actor,
            client_id,
            supplier_id,
            bolt: bolt_id,
            nut: nut_id,
        }
    }

    fn line(product: ProductId, quantity: i64) -> InvoiceLineDto {
        InvoiceLineDto {
            product_id: product.to_string(),
            quantity,
            ..Default::default()
        }
    }

    fn sale(client_id: &str, lines: Vec<InvoiceLineDto>) -> InvoiceDto {
        let mut dto = InvoiceDto::new(InvoiceKind::Sale);
        dto.issue_date = NaiveDate::from_ymd_opt(2026, 3, 14);
        dto.client_id = Some(client_id.to_string());
        dto.status = Some(InvoiceStatus::Pending);
        dto.lines = lines;
        dto
    }

    fn purchase(supplier_id: &str, status: InvoiceStatus, lines: Vec<InvoiceLineDto>) -> InvoiceDto {
        let mut dto = InvoiceDto::new(InvoiceKind::Purchase);
        dto.issue_date = NaiveDate::from_ymd_opt(2026, 3, 14);
        dto.supplier_id = Some(supplier_id.to_string());
        dto.status = Some(status);
        dto.lines = lines;
        dto
    }

    fn stock_of(f: &Fixture, id: ProductId) -> i64 {
        f.store.products.get(id).unwrap().stock
    }

    #[test]
    fn test_numbering_per_kind_and_year() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let a = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        let b = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        let c = create(
            &mut f.store,
            &actor,
            purchase(&f.supplier_id, InvoiceStatus::Draft, vec![line(f.bolt, 1)]),
        )
        .unwrap();
        assert_eq!(a.number(), "FV-2026-0001");
        assert_eq!(b.number(), "FV-2026-0002");
        assert_eq!(c.number(), "FC-2026-0001");

        let mut dto = sale(&f.client_id, vec![line(f.bolt, 1)]);
        dto.issue_date = NaiveDate::from_ymd_opt(2027, 1, 2);
        let d = create(&mut f.store, &actor, dto).unwrap();
        assert_eq!(d.number(), "FV-2027-0001");
    }

    #[test]
    fn test_auto_numbering_skips_manual_numbers() {
        let mut f = fixture();
        let actor = f.actor.clone();

        let mut dto = sale(&f.client_id, vec![line(f.bolt, 1)]);
        dto.number = Some("fv-2026-0001".into());
        create(&mut f.store, &actor, dto).unwrap();
        let auto = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        assert_eq!(auto.number(), "FV-2026-0002");

        // a purchase may carry a sales-style number; sales numbering steps over it
        let mut dto = purchase(&f.supplier_id, InvoiceStatus::Draft, vec![line(f.bolt, 1)]);
        dto.number = Some("FV-2026-0003".into());
        create(&mut f.store, &actor, dto).unwrap();
        let auto = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        assert_eq!(auto.number(), "FV-2026-0004");
    }

    #[test]
    fn test_auto_numbering_after_huge_manual_number() {
        let mut f = fixture();
        let actor = f.actor.clone();

        let mut dto = sale(&f.client_id, vec![line(f.bolt, 1)]);
        dto.number = Some("FV-2026-4294967295".into());
        create(&mut f.store, &actor, dto).unwrap();
        let auto = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        assert_eq!(auto.number(), "FV-2026-4294967296");

        let mut dto = sale(&f.client_id, vec![line(f.bolt, 1)]);
        dto.number = Some(format!("FV-2026-{}", u64::MAX));
        create(&mut f.store, &actor, dto).unwrap();
        let count = f.store.invoices.len();
        assert!(matches!(
            create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])),
            Err(ErpError::Validation(_))
        ));
        assert_eq!(f.store.invoices.len(), count);
    }

    #[test]
    fn test_huge_quantities_are_rejected() {
        let mut f = fixture();
        let actor = f.actor.clone();

        let dto = purchase(&f.supplier_id, InvoiceStatus::Paid, vec![line(f.bolt, i64::MAX)]);
        assert!(matches!(
            create(&mut f.store, &actor, dto),
            Err(ErpError::Validation(_))
        ));

        let dto = purchase(
            &f.supplier_id,
            InvoiceStatus::Paid,
            vec![line(f.nut, i64::MAX), line(f.nut, 1)],
        );
        assert!(matches!(
            create(&mut f.store, &actor, dto),
            Err(ErpError::Validation(_))
        ));

        let dto = sale(&f.client_id, vec![line(f.bolt, i64::MAX), line(f.bolt, 1)]);
        assert!(create(&mut f.store, &actor, dto).is_err());

        assert!(f.store.invoices.is_empty());
        assert_eq!(stock_of(&f, f.bolt), 100);
        assert_eq!(stock_of(&f, f.nut), 50);
    }

    #[test]
    fn test_manual_number_must_be_unique() {
        let mut f = fixture();
        let actor = f.actor.clone();
        create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        let mut dto = sale(&f.client_id, vec![line(f.bolt, 1)]);
        dto.number = Some("fv-2026-0001".into());
        assert!(matches!(
            create(&mut f.store, &actor, dto),
            Err(ErpError::DuplicateCode { .. })
        ));
    }

    #[test]
    fn test_totals_equal_sum_of_lines() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let mut discounted = line(f.nut, 7);
        discounted.discount_pct = Some(10.0);
        let inv = create(
            &mut f.store,
            &actor,
            sale(&f.client_id, vec![line(f.bolt, 3), discounted]),
        )
        .unwrap();

        // 3 x 0.35 = 1.05, VAT 0.22; 7 x 0.12 x 0.9 = 0.756 -> 0.76, VAT 0.16
        assert_eq!(inv.lines[0].subtotal, 1.05);
        assert_eq!(inv.lines[1].subtotal, 0.76);
        assert_eq!(inv.totals.taxable_base, 1.81);
        assert_eq!(inv.totals.vat_total, 0.38);
        assert_eq!(inv.totals.total, 2.19);
        assert!(inv.totals_consistent());

        let base: f64 = inv.lines.iter().map(|l| l.subtotal).sum();
        assert!((inv.totals.taxable_base - base).abs() < 1e-9);
    }

    #[test]
    fn test_line_defaults_come_from_product() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let inv = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 2)])).unwrap();
        assert_eq!(inv.lines[0].description, "Tornillo M8");
        assert_eq!(inv.lines[0].unit_price, 0.35);
        assert_eq!(inv.lines[0].vat_rate, 21.0);
        assert_eq!(inv.employee_id, actor.id.clone().unwrap());
    }

    #[test]
    fn test_create_then_delete_nets_stock_to_zero() {
        let mut f = fixture();
        let actor = f.actor.clone();

        let s = create(
            &mut f.store,
            &actor,
            sale(&f.client_id, vec![line(f.bolt, 30), line(f.nut, 5), line(f.bolt, 10)]),
        )
        .unwrap();
        assert_eq!(stock_of(&f, f.bolt), 60);
        assert_eq!(stock_of(&f, f.nut), 45);

        let p = create(
            &mut f.store,
            &actor,
            purchase(&f.supplier_id, InvoiceStatus::Paid, vec![line(f.nut, 20)]),
        )
        .unwrap();
        assert_eq!(stock_of(&f, f.nut), 65);

        delete(&mut f.store, &actor, &p.to_string_id()).unwrap();
        delete(&mut f.store, &actor, &s.to_string_id()).unwrap();
        assert_eq!(stock_of(&f, f.bolt), 100);
        assert_eq!(stock_of(&f, f.nut), 50);
        assert!(f.store.invoices.is_empty());
    }

    #[test]
    fn test_insufficient_stock_on_create_changes_nothing() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let err = create(
            &mut f.store,
            &actor,
            sale(&f.client_id, vec![line(f.nut, 10), line(f.bolt, 101)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ErpError::InsufficientStock {
                available: 100,
                requested: 101,
                ..
            }
        ));
        assert_eq!(stock_of(&f, f.bolt), 100);
        assert_eq!(stock_of(&f, f.nut), 50);
        assert!(f.store.invoices.is_empty());
        assert!(f.store.activity_log.is_empty());
    }

    #[test]
    fn test_insufficient_stock_on_update_rolls_back() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let inv = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 40)])).unwrap();
        assert_eq!(stock_of(&f, f.bolt), 60);

        // 100 available against the reverted baseline, 120 requested
        let err = update(
            &mut f.store,
            &actor,
            &inv.to_string_id(),
            sale(&f.client_id, vec![line(f.bolt, 120)]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ErpError::InsufficientStock {
                available: 100,
                requested: 120,
                ..
            }
        ));
        assert_eq!(stock_of(&f, f.bolt), 60);
        let stored = get_by_id(&f.store, &inv.to_string_id()).unwrap();
        assert_eq!(stored.lines[0].quantity, 40);

        let ok = update(
            &mut f.store,
            &actor,
            &inv.to_string_id(),
            sale(&f.client_id, vec![line(f.bolt, 100)]),
        )
        .unwrap();
        assert_eq!(ok.lines[0].quantity, 100);
        assert_eq!(stock_of(&f, f.bolt), 0);
    }

    #[test]
    fn test_status_changes_move_stock() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let p = create(
            &mut f.store,
            &actor,
            purchase(&f.supplier_id, InvoiceStatus::Pending, vec![line(f.nut, 25)]),
        )
        .unwrap();
        assert_eq!(stock_of(&f, f.nut), 50);

        change_status(&mut f.store, &actor, &p.to_string_id(), InvoiceStatus::Paid).unwrap();
        assert_eq!(stock_of(&f, f.nut), 75);

        let s = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.nut, 70)])).unwrap();
        assert_eq!(stock_of(&f, f.nut), 5);

        // the goods of the purchase are already sold
        assert!(matches!(
            change_status(&mut f.store, &actor, &p.to_string_id(), InvoiceStatus::Cancelled),
            Err(ErpError::InsufficientStock { .. })
        ));
        assert_eq!(stock_of(&f, f.nut), 5);

        change_status(&mut f.store, &actor, &s.to_string_id(), InvoiceStatus::Cancelled).unwrap();
        assert_eq!(stock_of(&f, f.nut), 75);
    }

    #[test]
    fn test_low_stock_notification_after_sale() {
        let mut f = fixture();
        let actor = f.actor.clone();
        create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.nut, 46)])).unwrap();
        let warnings = f
            .store
            .notifications
            .iter()
            .filter(|n| n.title.contains("TUE-M8"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_kind_cannot_change_and_lines_are_required() {
        let mut f = fixture();
        let actor = f.actor.clone();
        let inv = create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        let as_purchase = purchase(&f.supplier_id, InvoiceStatus::Draft, vec![line(f.bolt, 1)]);
        assert!(matches!(
            update(&mut f.store, &actor, &inv.to_string_id(), as_purchase),
            Err(ErpError::Validation(_))
        ));
        assert!(matches!(
            create(&mut f.store, &actor, sale(&f.client_id, vec![])),
            Err(ErpError::Validation(_))
        ));
    }

    #[test]
    fn test_preview_does_not_store() {
        let f = fixture();
        let preview = preview(&f.store, &sale(&f.client_id, vec![line(f.bolt, 20)])).unwrap();
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.totals.taxable_base, 7.0);
        assert_eq!(preview.totals.vat_total, 1.47);
        assert_eq!(preview.totals.total, 8.47);
        assert!(f.store.invoices.is_empty());
        assert_eq!(stock_of(&f, f.bolt), 100);
    }

    #[test]
    fn test_list_filters() {
        let mut f = fixture();
        let actor = f.actor.clone();
        create(&mut f.store, &actor, sale(&f.client_id, vec![line(f.bolt, 1)])).unwrap();
        create(
            &mut f.store,
            &actor,
            purchase(&f.supplier_id, InvoiceStatus::Paid, vec![line(f.bolt, 1)]),
        )
        .unwrap();
        let sales = list(
            &f.store,
            &InvoiceListParams {
                kind: Some(InvoiceKind::Sale),
                ..Default::default()
            },
        );
        assert_eq!(sales.len(), 1);
        let paid = list(
            &f.store,
            &InvoiceListParams {
                status: Some(InvoiceStatus::Paid),
                ..Default::default()
            },
        );
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].kind, InvoiceKind::Purchase);
    }
}
