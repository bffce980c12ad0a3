use contracts::domain::a001_client::aggregate::{Client, ClientId};

use crate::shared::data::store::MockStore;

/// Список клиентов, отсортированный по коду
pub fn list(store: &MockStore, q: Option<&str>) -> Vec<Client> {
    let mut items: Vec<Client> = store
        .clients
        .iter()
        .filter(|c| q.map_or(true, |q| c.matches(q)))
        .cloned()
        .collect();
    items.sort_by(|a, b| a.base.code.cmp(&b.base.code));
    items
}

pub fn get_by_id(store: &MockStore, id: ClientId) -> Option<Client> {
    store.clients.get(id).cloned()
}

pub fn insert(store: &mut MockStore, client: Client) {
    store.clients.insert(client);
}

pub fn update(store: &mut MockStore, client: Client) -> bool {
    store.clients.replace(client)
}

pub fn delete(store: &mut MockStore, id: ClientId) -> Option<Client> {
    store.clients.remove(id)
}

/// Количество счетов, ссылающихся на клиента
pub fn invoice_count(store: &MockStore, id: ClientId) -> usize {
    let id = id.to_string();
    store
        .invoices
        .iter()
        .filter(|i| i.client_id.as_deref() == Some(id.as_str()))
        .count()
}
