use contracts::domain::a003_employee::aggregate::{Employee, EmployeeId};

use crate::shared::data::store::MockStore;

pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Employee> {
    let mut items: Vec<Employee> = store
        .employees
        .iter()
        .filter(|e| q.map_or(true, |q| e.matches(q)))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    items
}

pub fn get_by_id(store: &MockStore, id: EmployeeId) -> Option<Employee> {
    store.employees.get(id).cloned()
}

/// Поиск по email (логину), без учёта регистра
pub fn get_by_email(store: &MockStore, email: &str) -> Option<Employee> {
    let email = email.trim().to_lowercase();
    store.employees.iter().find(|e| e.email == email).cloned()
}

pub fn insert_with_password(store: &mut MockStore, employee: Employee, password_hash: String) {
    store.passwords.insert(employee.base.id, password_hash);
    store.employees.insert(employee);
}

pub fn update(store: &mut MockStore, employee: Employee) -> bool {
    store.employees.replace(employee)
}

pub fn set_password_hash(store: &mut MockStore, id: EmployeeId, password_hash: String) {
    store.passwords.insert(id, password_hash);
}

pub fn password_hash(store: &MockStore, id: EmployeeId) -> Option<&str> {
    store.passwords.get(&id).map(String::as_str)
}

pub fn delete(store: &mut MockStore, id: EmployeeId) -> Option<Employee> {
    store.passwords.remove(&id);
    store.employees.remove(id)
}

/// Активные администраторы, если запись `id` заменить на `replacement` (None: удалить)
pub fn active_admins_after(
    store: &MockStore,
    id: EmployeeId,
    replacement: Option<&Employee>,
) -> usize {
    store
        .employees
        .iter()
        .filter_map(|e| if e.base.id == id { replacement } else { Some(e) })
        .filter(|e| e.is_active_admin())
        .count()
}

/// Ссылки на сотрудника: (счета, склады)
pub fn reference_counts(store: &MockStore, id: EmployeeId) -> (usize, usize) {
    let id = id.to_string();
    let invoices = store
        .invoices
        .iter()
        .filter(|i| i.employee_id == id)
        .count();
    let warehouses = store
        .warehouses
        .iter()
        .filter(|w| w.manager_id.as_deref() == Some(id.as_str()))
        .count();
    (invoices, warehouses)
}
