//! In-memory mock data store.
//!
//! Every table is an ordered vector; nothing is persisted and the data is
//! lost when the process stops. The store is shared behind a single
//! `RwLock`, so each API call sees it as the only actor.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::domain::a001_client::aggregate::Client;
use contracts::domain::a002_supplier::aggregate::Supplier;
use contracts::domain::a003_employee::aggregate::{Employee, EmployeeId};
use contracts::domain::a004_product::aggregate::Product;
use contracts::domain::a005_warehouse::aggregate::Warehouse;
use contracts::domain::a006_invoice::aggregate::Invoice;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::shared::activity_log::ActivityLogEntry;
use contracts::system::notifications::{Notification, NotificationSettings};
use tokio::sync::RwLock;

use crate::shared::config::Config;
use crate::system::auth::refresh_tokens::RefreshTokenRecord;

pub type SharedStore = Arc<RwLock<MockStore>>;

/// Таблица агрегатов одного типа
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: AggregateRoot + Clone> Table<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    /// Поиск по строковой ссылке (так хранятся внешние ключи)
    pub fn get_by_ref(&self, reference: &str) -> Option<&T> {
        <T::Id as AggregateId>::from_string(reference)
            .ok()
            .and_then(|id| self.get(id))
    }

    pub fn contains_ref(&self, reference: &str) -> bool {
        self.get_by_ref(reference).is_some()
    }

    pub fn insert(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Заменить запись с тем же ID; false, если записи нет
    pub fn replace(&mut self, row: T) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let pos = self.rows.iter().position(|r| r.id() == id)?;
        Some(self.rows.remove(pos))
    }

    /// Код занят другой записью (без учёта регистра)
    pub fn code_taken(&self, code: &str, except: Option<T::Id>) -> bool {
        let code = code.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|r| Some(r.id()) != except)
            .any(|r| r.code().to_lowercase() == code)
    }

    /// Следующий код вида `PREFIX-0001`
    pub fn next_code(&self, prefix: &str, width: usize) -> String {
        let marker = format!("{}-", prefix);
        let max = self
            .rows
            .iter()
            .filter_map(|r| r.code().strip_prefix(&marker))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{:0width$}", marker, max + 1, width = width)
    }
}

/// Параметры хранилища, которые берутся из конфигурации
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub sales_prefix: String,
    pub purchase_prefix: String,
    pub max_log_entries: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sales_prefix: "FV".into(),
            purchase_prefix: "FC".into(),
            max_log_entries: 1000,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            sales_prefix: config.invoices.sales_prefix.clone(),
            purchase_prefix: config.invoices.purchase_prefix.clone(),
            max_log_entries: config.activity_log.max_entries,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockStore {
    pub clients: Table<Client>,
    pub suppliers: Table<Supplier>,
    pub employees: Table<Employee>,
    pub products: Table<Product>,
    pub warehouses: Table<Warehouse>,
    pub invoices: Table<Invoice>,
    /// Хэши паролей сотрудников (Argon2, PHC string)
    pub passwords: HashMap<EmployeeId, String>,
    pub refresh_tokens: Vec<RefreshTokenRecord>,
    pub notification_settings: NotificationSettings,
    pub notifications: Vec<Notification>,
    pub activity_log: Vec<ActivityLogEntry>,
    pub options: StoreOptions,
    last_log_id: i64,
    last_notification_id: i64,
}

impl MockStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn next_log_id(&mut self) -> i64 {
        self.last_log_id += 1;
        self.last_log_id
    }

    pub fn next_notification_id(&mut self) -> i64 {
        self.last_notification_id += 1;
        self.last_notification_id
    }
}
