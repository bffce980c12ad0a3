use contracts::domain::a002_supplier::aggregate::{Supplier, SupplierDto, SupplierId};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::repository;
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};

const CODE_PREFIX: &str = "PRV";
const CODE_WIDTH: usize = 4;

fn not_found() -> ErpError {
    ErpError::NotFound {
        entity: Supplier::element_name(),
    }
}

fn parse_id(id: &str) -> ErpResult<SupplierId> {
    SupplierId::from_string(id).map_err(|_| not_found())
}

fn ensure_unique_code(
    store: &MockStore,
    supplier: &Supplier,
    except: Option<SupplierId>,
) -> ErpResult<()> {
    if store.suppliers.code_taken(&supplier.base.code, except) {
        return Err(ErpError::DuplicateCode {
            entity: Supplier::element_name(),
            code: supplier.base.code.clone(),
        });
    }
    Ok(())
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: SupplierDto) -> ErpResult<Supplier> {
    let code = store.suppliers.next_code(CODE_PREFIX, CODE_WIDTH);
    let mut aggregate = Supplier::new_for_insert(code, &dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    ensure_unique_code(store, &aggregate, None)?;
    aggregate.before_write();

    repository::insert(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Create, &aggregate);
    Ok(aggregate)
}

pub fn update(
    store: &mut MockStore,
    actor: &Actor,
    id: &str,
    dto: SupplierDto,
) -> ErpResult<Supplier> {
    let id = parse_id(id)?;
    let mut aggregate = repository::get_by_id(store, id).ok_or_else(not_found)?;

    aggregate.update(&dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    ensure_unique_code(store, &aggregate, Some(id))?;
    aggregate.before_write();

    repository::update(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Update, &aggregate);
    Ok(aggregate)
}

pub fn delete(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<()> {
    let id = parse_id(id)?;
    let aggregate = repository::get_by_id(store, id).ok_or_else(not_found)?;

    match repository::reference_counts(store, id) {
        (0, 0) => {}
        (invoices, products) => {
            return Err(ErpError::InUse(format!(
                "Supplier {} is referenced by {} invoice(s) and {} product(s)",
                aggregate.base.code, invoices, products
            )));
        }
    }

    repository::delete(store, id);
    activity_log::record_for(store, actor, ActivityAction::Delete, &aggregate);
    Ok(())
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Supplier> {
    repository::get_by_id(store, parse_id(id)?).ok_or_else(not_found)
}

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Supplier> {
    repository::list(store, q)
}
