use contracts::domain::a004_product::aggregate::{Product, ProductDto, ProductId, ProductListParams};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::repository;
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};
use crate::system::notifications::service as notifications;

fn not_found() -> ErpError {
    ErpError::NotFound {
        entity: Product::element_name(),
    }
}

fn parse_id(id: &str) -> ErpResult<ProductId> {
    ProductId::from_string(id).map_err(|_| not_found())
}

/// Проверки, которым нужен доступ к хранилищу: уникальность кода и ссылки
fn check_against_store(store: &MockStore, product: &Product, except: Option<ProductId>) -> ErpResult<()> {
    if store.products.code_taken(&product.base.code, except) {
        return Err(ErpError::DuplicateCode {
            entity: Product::element_name(),
            code: product.base.code.clone(),
        });
    }
    if let Some(supplier_id) = &product.supplier_id {
        if !store.suppliers.contains_ref(supplier_id) {
            return Err(ErpError::validation(format!(
                "Supplier {} does not exist",
                supplier_id
            )));
        }
    }
    if let Some(warehouse_id) = &product.warehouse_id {
        if !store.warehouses.contains_ref(warehouse_id) {
            return Err(ErpError::validation(format!(
                "Warehouse {} does not exist",
                warehouse_id
            )));
        }
    }
    Ok(())
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: ProductDto) -> ErpResult<Product> {
    let mut aggregate = Product::new_for_insert(&dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    check_against_store(store, &aggregate, None)?;
    aggregate.before_write();

    repository::insert(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Create, &aggregate);
    notifications::check_low_stock(store, &[aggregate.base.id]);
    Ok(aggregate)
}

pub fn update(store: &mut MockStore, actor: &Actor, id: &str, dto: ProductDto) -> ErpResult<Product> {
    let id = parse_id(id)?;
    let mut aggregate = repository::get_by_id(store, id).ok_or_else(not_found)?;
    let previous_stock = aggregate.stock;

    aggregate.update(&dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    check_against_store(store, &aggregate, Some(id))?;
    aggregate.before_write();

    repository::update(store, aggregate.clone());
    if previous_stock == aggregate.stock {
        activity_log::record_for(store, actor, ActivityAction::Update, &aggregate);
    } else {
        activity_log::record(
            store,
            actor,
            ActivityAction::StockAdjustment,
            Some(Product::collection_name()),
            Some(aggregate.to_string_id()),
            format!(
                "{} {} ({}) updated, stock adjusted manually: {} -> {}",
                Product::element_name(),
                aggregate.base.code,
                aggregate.base.description,
                previous_stock,
                aggregate.stock
            ),
        );
        notifications::check_low_stock(store, &[id]);
    }
    Ok(aggregate)
}

pub fn delete(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<()> {
    let id = parse_id(id)?;
    let aggregate = repository::get_by_id(store, id).ok_or_else(not_found)?;

    let invoices = repository::invoice_count(store, id);
    if invoices > 0 {
        return Err(ErpError::InUse(format!(
            "Product {} appears in {} invoice(s)",
            aggregate.base.code, invoices
        )));
    }

    repository::delete(store, id);
    activity_log::record_for(store, actor, ActivityAction::Delete, &aggregate);
    Ok(())
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Product> {
    repository::get_by_id(store, parse_id(id)?).ok_or_else(not_found)
}

pub fn list(store: &MockStore, params: &ProductListParams) -> Vec<Product> {
    let q = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let threshold = params
        .low_stock_only
        .then_some(store.notification_settings.low_stock_threshold);
    repository::list(store, q, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(code: &str, name: &str, stock: i64) -> ProductDto {
        ProductDto {
            code: Some(code.into()),
            name: name.into(),
            price: 1.5,
            vat_rate: 21.0,
            stock,
            ..Default::default()
        }
    }

    #[test]
    fn test_code_is_required() {
        let mut store = MockStore::default();
        let mut d = dto("", "Tornillo", 10);
        d.code = None;
        assert!(matches!(
            create(&mut store, &Actor::system(), d),
            Err(ErpError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_product_code() {
        let mut store = MockStore::default();
        let actor = Actor::system();
        create(&mut store, &actor, dto("TOR-M8", "Tornillo M8", 100)).unwrap();
        let err = create(&mut store, &actor, dto("tor-m8", "Otro tornillo", 5)).unwrap_err();
        assert!(matches!(err, ErpError::DuplicateCode { .. }));
        assert_eq!(store.products.len(), 1);
    }

    #[test]
    fn test_unknown_supplier_is_rejected() {
        let mut store = MockStore::default();
        let mut d = dto("TOR-M8", "Tornillo M8", 100);
        d.supplier_id = Some(uuid::Uuid::new_v4().to_string());
        assert!(matches!(
            create(&mut store, &Actor::system(), d),
            Err(ErpError::Validation(_))
        ));
    }

    #[test]
    fn test_low_stock_filter_and_notification() {
        let mut store = MockStore::default();
        let actor = Actor::system();
        create(&mut store, &actor, dto("TOR-M8", "Tornillo M8", 100)).unwrap();
        let nut = create(&mut store, &actor, dto("TUE-M8", "Tuerca M8", 20)).unwrap();
        assert!(store.notifications.is_empty());

        update(&mut store, &actor, &nut.to_string_id(), dto("TUE-M8", "Tuerca M8", 3)).unwrap();
        assert_eq!(store.notifications.len(), 1);

        let low = list(
            &store,
            &ProductListParams {
                q: None,
                low_stock_only: true,
            },
        );
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].base.code, "TUE-M8");

        let adjustments = store
            .activity_log
            .iter()
            .filter(|e| e.action == ActivityAction::StockAdjustment)
            .count();
        assert_eq!(adjustments, 1);
    }
}
