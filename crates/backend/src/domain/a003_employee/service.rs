use contracts::domain::a003_employee::aggregate::{
    validate_password, ChangePasswordDto, Employee, EmployeeDto, EmployeeId,
};
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityAction;

use super::repository;
use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};
use crate::system::auth::{password, refresh_tokens};
use crate::system::notifications::service as notifications;

const CODE_PREFIX: &str = "EMP";
const CODE_WIDTH: usize = 4;

fn not_found() -> ErpError {
    ErpError::NotFound {
        entity: Employee::element_name(),
    }
}

fn parse_id(id: &str) -> ErpResult<EmployeeId> {
    EmployeeId::from_string(id).map_err(|_| not_found())
}

fn load(store: &MockStore, id: &str) -> ErpResult<(EmployeeId, Employee)> {
    let id = parse_id(id)?;
    let employee = repository::get_by_id(store, id).ok_or_else(not_found)?;
    Ok((id, employee))
}

fn ensure_unique(store: &MockStore, employee: &Employee, except: Option<EmployeeId>) -> ErpResult<()> {
    if store.employees.code_taken(&employee.base.code, except) {
        return Err(ErpError::DuplicateCode {
            entity: Employee::element_name(),
            code: employee.base.code.clone(),
        });
    }
    let email_taken = store
        .employees
        .iter()
        .any(|e| Some(e.base.id) != except && e.email == employee.email);
    if email_taken {
        return Err(ErpError::validation(format!(
            "Email {} is already registered",
            employee.email
        )));
    }
    Ok(())
}

/// Операция не должна оставить систему без активного администратора
fn ensure_admin_remains(
    store: &MockStore,
    current: &Employee,
    replacement: Option<&Employee>,
) -> ErpResult<()> {
    if current.is_active_admin()
        && repository::active_admins_after(store, current.base.id, replacement) == 0
    {
        return Err(ErpError::LastAdministrator);
    }
    Ok(())
}

pub fn create(store: &mut MockStore, actor: &Actor, dto: EmployeeDto) -> ErpResult<Employee> {
    let password = dto
        .password
        .clone()
        .ok_or_else(|| ErpError::validation("Password is required"))?;
    validate_password(&password).map_err(ErpError::Validation)?;

    let code = store.employees.next_code(CODE_PREFIX, CODE_WIDTH);
    let mut aggregate = Employee::new_for_insert(code, &dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    ensure_unique(store, &aggregate, None)?;
    aggregate.before_write();

    let password_hash = password::hash_password(&password)?;
    repository::insert_with_password(store, aggregate.clone(), password_hash);
    activity_log::record_for(store, actor, ActivityAction::Create, &aggregate);
    Ok(aggregate)
}

/// Обновление карточки. Блокировка меняется только через `block`/`unblock`,
/// пароль только через `change_password`.
pub fn update(
    store: &mut MockStore,
    actor: &Actor,
    id: &str,
    mut dto: EmployeeDto,
) -> ErpResult<Employee> {
    let (id, current) = load(store, id)?;
    dto.is_blocked = current.is_blocked;

    let mut aggregate = current.clone();
    aggregate.update(&dto);

    aggregate.validate().map_err(ErpError::Validation)?;
    ensure_unique(store, &aggregate, Some(id))?;
    ensure_admin_remains(store, &current, Some(&aggregate))?;
    aggregate.before_write();

    repository::update(store, aggregate.clone());
    activity_log::record_for(store, actor, ActivityAction::Update, &aggregate);
    if current.role != aggregate.role {
        notifications::employee_changed(
            store,
            &aggregate,
            &format!(
                "role changed from {} to {}",
                current.role.display_name(),
                aggregate.role.display_name()
            ),
        );
    }
    Ok(aggregate)
}

pub fn delete(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<()> {
    let (id, current) = load(store, id)?;
    if actor.is(&current.to_string_id()) {
        return Err(ErpError::validation("You cannot delete your own account"));
    }
    ensure_admin_remains(store, &current, None)?;

    match repository::reference_counts(store, id) {
        (0, 0) => {}
        (invoices, warehouses) => {
            return Err(ErpError::InUse(format!(
                "Employee {} is referenced by {} invoice(s) and manages {} warehouse(s)",
                current.base.code, invoices, warehouses
            )));
        }
    }

    repository::delete(store, id);
    refresh_tokens::revoke_for_employee(store, &current.to_string_id());
    activity_log::record_for(store, actor, ActivityAction::Delete, &current);
    Ok(())
}

fn set_blocked(store: &mut MockStore, actor: &Actor, id: &str, blocked: bool) -> ErpResult<Employee> {
    let (_, current) = load(store, id)?;
    if blocked && actor.is(&current.to_string_id()) {
        return Err(ErpError::validation("You cannot block your own account"));
    }
    if current.is_blocked == blocked {
        return Ok(current);
    }

    let mut aggregate = current.clone();
    aggregate.is_blocked = blocked;
    ensure_admin_remains(store, &current, Some(&aggregate))?;
    aggregate.before_write();

    repository::update(store, aggregate.clone());
    if blocked {
        refresh_tokens::revoke_for_employee(store, &aggregate.to_string_id());
    }
    let change = if blocked { "blocked" } else { "unblocked" };
    activity_log::record(
        store,
        actor,
        ActivityAction::Update,
        Some(Employee::collection_name()),
        Some(aggregate.to_string_id()),
        format!(
            "{} {} ({}) {}",
            Employee::element_name(),
            aggregate.base.code,
            aggregate.base.description,
            change
        ),
    );
    notifications::employee_changed(store, &aggregate, change);
    Ok(aggregate)
}

pub fn block(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<Employee> {
    set_blocked(store, actor, id, true)
}

pub fn unblock(store: &mut MockStore, actor: &Actor, id: &str) -> ErpResult<Employee> {
    set_blocked(store, actor, id, false)
}

/// Смена пароля. Свой пароль меняется со старым паролем,
/// чужой только при праве записи в разделе сотрудников (`can_manage`).
pub fn change_password(
    store: &mut MockStore,
    actor: &Actor,
    id: &str,
    dto: ChangePasswordDto,
    can_manage: bool,
) -> ErpResult<()> {
    let (id, employee) = load(store, id)?;
    let own = actor.is(&employee.to_string_id());

    if own {
        let old = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ErpError::validation("Current password is required"))?;
        let hash = repository::password_hash(store, id).unwrap_or_default();
        if !password::verify_password(old, hash)? {
            return Err(ErpError::validation("Current password is incorrect"));
        }
    } else if !can_manage {
        return Err(ErpError::Forbidden);
    }

    validate_password(&dto.new_password).map_err(ErpError::Validation)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::set_password_hash(store, id, new_hash);

    activity_log::record(
        store,
        actor,
        ActivityAction::Update,
        Some(Employee::collection_name()),
        Some(employee.to_string_id()),
        format!("Password changed for {}", employee.base.code),
    );
    Ok(())
}

/// Проверка логина и пароля. Неудачные попытки попадают в журнал.
pub fn verify_credentials(store: &mut MockStore, email: &str, password: &str) -> ErpResult<Employee> {
    let employee = repository::get_by_email(store, email);
    let verified = match &employee {
        Some(e) => match repository::password_hash(store, e.base.id) {
            Some(hash) => password::verify_password(password, hash)?,
            None => false,
        },
        None => false,
    };

    let employee = match employee {
        Some(e) if verified => e,
        _ => {
            activity_log::record(
                store,
                &Actor::anonymous(email.trim()),
                ActivityAction::LoginFailed,
                None,
                None,
                format!("Failed login for {}", email.trim()),
            );
            return Err(ErpError::InvalidCredentials);
        }
    };

    if employee.is_blocked {
        activity_log::record(
            store,
            &Actor::from(&employee),
            ActivityAction::LoginFailed,
            Some(Employee::collection_name()),
            Some(employee.to_string_id()),
            format!("Blocked account {} tried to sign in", employee.email),
        );
        return Err(ErpError::AccountBlocked);
    }

    Ok(employee)
}

pub fn get_by_id(store: &MockStore, id: &str) -> ErpResult<Employee> {
    load(store, id).map(|(_, e)| e)
}

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Employee> {
    repository::list(store, q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::Role;
    use contracts::shared::activity_log::ActivityLogQuery;

    fn dto(name: &str, email: &str, role: Role) -> EmployeeDto {
        EmployeeDto {
            id: None,
            code: None,
            name: name.into(),
            email: email.into(),
            phone: None,
            position: None,
            role,
            is_blocked: false,
            hired_on: None,
            comment: None,
            password: Some("secret1".into()),
        }
    }

    fn admin(store: &mut MockStore) -> Employee {
        create(store, &Actor::system(), dto("Admin", "admin@erp.local", Role::Admin)).unwrap()
    }

    #[test]
    fn test_create_requires_password() {
        let mut store = MockStore::default();
        let mut d = dto("Marta", "marta@erp.local", Role::Sales);
        d.password = None;
        assert!(matches!(
            create(&mut store, &Actor::system(), d),
            Err(ErpError::Validation(_))
        ));

        let mut short = dto("Marta", "marta@erp.local", Role::Sales);
        short.password = Some("123".into());
        assert!(create(&mut store, &Actor::system(), short).is_err());
        assert!(store.employees.is_empty());
    }

    #[test]
    fn test_email_is_unique_case_insensitively() {
        let mut store = MockStore::default();
        admin(&mut store);
        let err = create(
            &mut store,
            &Actor::system(),
            dto("Other", "ADMIN@erp.local", Role::Sales),
        )
        .unwrap_err();
        assert!(matches!(err, ErpError::Validation(_)));
    }

    #[test]
    fn test_last_admin_cannot_be_deleted_demoted_or_blocked() {
        let mut store = MockStore::default();
        let a = admin(&mut store);
        let id = a.to_string_id();
        let other = Actor::anonymous("someone");

        assert!(matches!(
            delete(&mut store, &other, &id),
            Err(ErpError::LastAdministrator)
        ));

        let mut demote = dto("Admin", "admin@erp.local", Role::Manager);
        demote.password = None;
        assert!(matches!(
            update(&mut store, &other, &id, demote),
            Err(ErpError::LastAdministrator)
        ));

        assert!(matches!(
            block(&mut store, &other, &id),
            Err(ErpError::LastAdministrator)
        ));

        let stored = get_by_id(&store, &id).unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert!(!stored.is_blocked);
    }

    #[test]
    fn test_second_admin_allows_demotion() {
        let mut store = MockStore::default();
        let a = admin(&mut store);
        create(
            &mut store,
            &Actor::system(),
            dto("Second", "second@erp.local", Role::Admin),
        )
        .unwrap();

        let mut demote = dto("Admin", "admin@erp.local", Role::Manager);
        demote.password = None;
        let updated = update(&mut store, &Actor::system(), &a.to_string_id(), demote).unwrap();
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(store.notifications.len(), 1);
    }

    #[test]
    fn test_cannot_delete_or_block_self() {
        let mut store = MockStore::default();
        admin(&mut store);
        let e = create(
            &mut store,
            &Actor::system(),
            dto("Marta", "marta@erp.local", Role::Sales),
        )
        .unwrap();
        let me = Actor::from(&e);
        assert!(matches!(
            delete(&mut store, &me, &e.to_string_id()),
            Err(ErpError::Validation(_))
        ));
        assert!(matches!(
            block(&mut store, &me, &e.to_string_id()),
            Err(ErpError::Validation(_))
        ));
    }

    #[test]
    fn test_update_does_not_touch_blocked_flag() {
        let mut store = MockStore::default();
        admin(&mut store);
        let e = create(
            &mut store,
            &Actor::system(),
            dto("Marta", "marta@erp.local", Role::Sales),
        )
        .unwrap();
        block(&mut store, &Actor::system(), &e.to_string_id()).unwrap();

        let mut change = dto("Marta Vidal", "marta@erp.local", Role::Sales);
        change.is_blocked = false;
        let updated = update(&mut store, &Actor::system(), &e.to_string_id(), change).unwrap();
        assert!(updated.is_blocked);
        assert_eq!(updated.base.description, "Marta Vidal");
    }

    #[test]
    fn test_login_checks() {
        let mut store = MockStore::default();
        admin(&mut store);
        let e = create(
            &mut store,
            &Actor::system(),
            dto("Marta", "marta@erp.local", Role::Sales),
        )
        .unwrap();

        assert!(verify_credentials(&mut store, " Marta@ERP.local ", "secret1").is_ok());
        assert!(matches!(
            verify_credentials(&mut store, "marta@erp.local", "wrong1"),
            Err(ErpError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_credentials(&mut store, "nobody@erp.local", "secret1"),
            Err(ErpError::InvalidCredentials)
        ));

        block(&mut store, &Actor::system(), &e.to_string_id()).unwrap();
        assert!(matches!(
            verify_credentials(&mut store, "marta@erp.local", "secret1"),
            Err(ErpError::AccountBlocked)
        ));

        let failed = crate::shared::activity_log::repository::list(
            &store,
            &ActivityLogQuery {
                action: Some(ActivityAction::LoginFailed),
                ..Default::default()
            },
        );
        assert_eq!(failed.len(), 3);
    }

    #[test]
    fn test_change_password_rules() {
        let mut store = MockStore::default();
        let a = admin(&mut store);
        let e = create(
            &mut store,
            &Actor::system(),
            dto("Marta", "marta@erp.local", Role::Sales),
        )
        .unwrap();
        let me = Actor::from(&e);
        let id = e.to_string_id();

        let wrong_old = ChangePasswordDto {
            old_password: Some("nope".into()),
            new_password: "newpass".into(),
        };
        assert!(change_password(&mut store, &me, &id, wrong_old, false).is_err());

        let ok = ChangePasswordDto {
            old_password: Some("secret1".into()),
            new_password: "newpass".into(),
        };
        change_password(&mut store, &me, &id, ok, false).unwrap();
        assert!(verify_credentials(&mut store, "marta@erp.local", "newpass").is_ok());

        // someone else's password needs write access to employees
        let reset = ChangePasswordDto {
            old_password: None,
            new_password: "another".into(),
        };
        assert!(matches!(
            change_password(&mut store, &me, &a.to_string_id(), reset.clone(), false),
            Err(ErpError::Forbidden)
        ));
        change_password(&mut store, &Actor::from(&a), &id, reset, true).unwrap();
        assert!(verify_credentials(&mut store, "marta@erp.local", "another").is_ok());
    }

    #[test]
    fn test_referenced_employee_cannot_be_deleted() {
        use contracts::domain::a005_warehouse::aggregate::{Warehouse, WarehouseDto};

        let mut store = MockStore::default();
        admin(&mut store);
        let e = create(
            &mut store,
            &Actor::system(),
            dto("Jon", "jon@erp.local", Role::Warehouse),
        )
        .unwrap();
        store.warehouses.insert(Warehouse::new_for_insert(
            "ALM-001".into(),
            &WarehouseDto {
                name: "Central".into(),
                manager_id: Some(e.to_string_id()),
                ..Default::default()
            },
        ));
        assert!(matches!(
            delete(&mut store, &Actor::system(), &e.to_string_id()),
            Err(ErpError::InUse(_))
        ));
    }
}
