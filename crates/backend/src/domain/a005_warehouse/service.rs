use contracts::domain::a005_warehouse::aggregate::{Warehouse, WarehouseDto, WarehouseId};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::repository;
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};

const CODE_PREFIX: &str = "ALM";
const CODE_WIDTH: usize = 3;

fn not_found() -> ErpError {
    ErpError::NotFound {
        entity: Warehouse::element_name(),
    }
}

fn parse_id(id: &str) -> ErpResult<WarehouseId> {
    WarehouseId::from_string(id).map_err(|_| not_found())
}

fn check_against_store(
    store: &MockStore,
    warehouse: &Warehouse,
    except: Option<WarehouseId>,
) -> ErpResult<()> {
    if store.warehouses.code_taken(&warehouse.base.code, except) {
        return Err(ErpError::DuplicateCode {
            entity: Warehouse::element_name(),
            code: warehouse.base.code.clone(),
        });
    }
    if let Some(manager_id) = &warehouse.manager_id {
        if !store.employees.contains_ref(manager_id) {
            return Err(ErpError::validation(format!(
                "Employee {} does not exist",
                manager_id
            )));
        }
    }
    Ok(())
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: WarehouseDto) -> ErpResult<Warehouse> {
    let code = store.warehouses.next_code(CODE_PREFIX, CODE_WIDTH);
    let mut aggregate = Warehouse::new_for_insert(code, &dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    check_against_store(store, &aggregate, None)?;
    aggregate.before_write();

    repository::insert(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Create, &aggregate);
    Ok(aggregate)
}

pub fn update(
    store: &mut MockStore,
    actor: &Actor,
    id: &str,
    dto: WarehouseDto,
) -> ErpResult<Warehouse> {
    let id = parse_id(id)?;
    let mut aggregate = repository::get_by_id(store, id).ok_or_else(not_found)?;

    aggregate.update(&dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    check_against_store(store, &aggregate, Some(id))?;
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
        (products, invoices) => {
            return Err(ErpError::InUse(format!(
                "Warehouse {} holds {} product(s) and is used by {} invoice(s)",
                aggregate.base.code, products, invoices
            )));
        }
    }

    repository::delete(store, id);
    activity_log::record_for(store, actor, ActivityAction::Delete, &aggregate);
    Ok(())
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Warehouse> {
    repository::get_by_id(store, parse_id(id)?).ok_or_else(not_found)
}

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Warehouse> {
    repository::list(store, q)
}
