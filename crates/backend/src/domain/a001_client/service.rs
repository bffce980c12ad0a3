use contracts::domain::a001_client::aggregate::{Client, ClientDto, ClientId};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::repository;
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};

const CODE_PREFIX: &str = "CLI";
const CODE_WIDTH: usize = 4;

fn parse_id(id: &str) -> ErpResult<ClientId> {
    ClientId::from_string(id).map_err(|_| ErpError::NotFound {
        entity: Client::element_name(),
    })
}

fn ensure_unique_code(store: &MockStore, client: &Client, except: Option<ClientId>) -> ErpResult<()> {
    if store.clients.code_taken(&client.base.code, except) {
        return Err(ErpError::DuplicateCode {
            entity: Client::element_name(),
            code: client.base.code.clone(),
        });
    }
    Ok(())
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: ClientDto) -> ErpResult<Client> {
    let code = store.clients.next_code(CODE_PREFIX, CODE_WIDTH);
    let mut aggregate = Client::new_for_insert(code, &dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    ensure_unique_code(store, &aggregate, None)?;
    aggregate.before_write();

    repository::insert(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Create, &aggregate);
    Ok(aggregate)
}

pub fn update(store: &mut MockStore, actor: &Actor, id: &str, dto: ClientDto) -> ErpResult<Client> {
    let id = parse_id(id)?;
    let mut aggregate = repository::get_by_id(store, id).ok_or(ErpError::NotFound {
        entity: Client::element_name(),
    })?;

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
    let aggregate = repository::get_by_id(store, id).ok_or(ErpError::NotFound {
        entity: Client::element_name(),
    })?;

    let invoices = repository::invoice_count(store, id);
    if invoices > 0 {
        return Err(ErpError::InUse(format!(
            "Client {} is referenced by {} invoice(s)",
            aggregate.base.code, invoices
        )));
    }

    repository::delete(store, id);
    activity_log::record_for(store, actor, ActivityAction::Delete, &aggregate);
    Ok(())
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Client> {
    repository::get_by_id(store, parse_id(id)?).ok_or(ErpError::NotFound {
        entity: Client::element_name(),
    })
}

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Client> {
    repository::list(store, q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str) -> ClientDto {
        ClientDto {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_codes_are_generated_in_sequence() {
        let mut store = MockStore::default();
        let actor = Actor::system();
        let a = create(&mut store, &actor, dto("Frutas Levante")).unwrap();
        let b = create(&mut store, &actor, dto("Talleres Ruiz")).unwrap();
        assert_eq!(a.base.code, "CLI-0001");
        assert_eq!(b.base.code, "CLI-0002");
        assert_eq!(store.activity_log.len(), 2);
    }

    #[test]
    fn test_duplicate_code_is_rejected_case_insensitively() {
        let mut store = MockStore::default();
        let actor = Actor::system();
        create(&mut store, &actor, dto("Frutas Levante")).unwrap();
        let b = create(&mut store, &actor, dto("Talleres Ruiz")).unwrap();

        let mut change = dto("Talleres Ruiz");
        change.code = Some("cli-0001".into());
        let err = update(&mut store, &actor, &b.to_string_id(), change).unwrap_err();
        assert!(matches!(err, ErpError::DuplicateCode { .. }));
    }

    #[test]
    fn test_invalid_email_is_a_validation_error() {
        let mut store = MockStore::default();
        let mut bad = dto("Frutas Levante");
        bad.email = Some("no-at-sign".into());
        let err = create(&mut store, &Actor::system(), bad).unwrap_err();
        assert!(matches!(err, ErpError::Validation(_)));
        assert!(store.clients.is_empty());
    }

    #[test]
    fn test_list_filters_by_query() {
        let mut store = MockStore::default();
        let actor = Actor::system();
        create(&mut store, &actor, dto("Frutas Levante")).unwrap();
        create(&mut store, &actor, dto("Talleres Ruiz")).unwrap();
        assert_eq!(list(&store, Some("ruiz")).len(), 1);
        assert_eq!(list(&store, None).len(), 2);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = MockStore::default();
        assert!(matches!(
            get_by_id(&store, "not-a-uuid"),
            Err(ErpError::NotFound { .. })
        ));
    }
}
