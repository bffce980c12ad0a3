use chrono::Utc;
use contracts::domain::a003_employee::aggregate::Employee;
use contracts::domain::a004_product::aggregate::ProductId;
use contracts::domain::a006_invoice::aggregate::Invoice;
use contracts::domain::common::AggregateRoot;
use contracts::shared::activity_log::ActivityAction;
use contracts::system::notifications::{
    Notification, NotificationCategory, NotificationLevel, NotificationSettings,
};

use crate::shared::activity_log::{self, Actor};
use crate::shared::data::store::MockStore;
use crate::shared::error::{ErpError, ErpResult};
use crate::shared::format::format_amount;

/// Создать уведомление, если уведомления включены. Старые сверх лимита удаляются.
fn emit(
    store: &mut MockStore,
    level: NotificationLevel,
    category: NotificationCategory,
    title: String,
    message: String,
) {
    if !store.notification_settings.enabled {
        return;
    }

    let notification = Notification {
        id: store.next_notification_id(),
        created_at: Utc::now(),
        level,
        category,
        title,
        message,
        is_read: false,
    };
    tracing::debug!("Notification #{}: {}", notification.id, notification.title);
    store.notifications.push(notification);

    let max = store.notification_settings.max_notifications.max(1);
    if store.notifications.len() > max {
        let excess = store.notifications.len() - max;
        store.notifications.drain(..excess);
    }
}

pub fn invoice_created(store: &mut MockStore, invoice: &Invoice) {
    if !store.notification_settings.invoice_alerts {
        return;
    }
    emit(
        store,
        NotificationLevel::Info,
        NotificationCategory::Invoice,
        format!("{} {}", Invoice::element_name(), invoice.number()),
        format!(
            "{} created, total {}",
            invoice.kind.display_name(),
            format_amount(invoice.totals.total)
        ),
    );
}

/// Уведомить о товарах, остаток которых упал до порога или ниже
pub fn check_low_stock(store: &mut MockStore, product_ids: &[ProductId]) {
    if !store.notification_settings.low_stock_alerts {
        return;
    }
    let threshold = store.notification_settings.low_stock_threshold;
    let low: Vec<(String, String, i64, i64)> = product_ids
        .iter()
        .filter_map(|id| store.products.get(*id))
        .filter(|p| p.is_low_stock(threshold))
        .map(|p| {
            (
                p.base.code.clone(),
                p.base.description.clone(),
                p.stock,
                p.low_stock_threshold(threshold),
            )
        })
        .collect();

    for (code, name, stock, limit) in low {
        emit(
            store,
            NotificationLevel::Warning,
            NotificationCategory::Stock,
            format!("Low stock: {}", code),
            format!("{} has {} left (threshold {})", name, stock, limit),
        );
    }
}

pub fn employee_changed(store: &mut MockStore, employee: &Employee, change: &str) {
    if !store.notification_settings.employee_alerts {
        return;
    }
    emit(
        store,
        NotificationLevel::Info,
        NotificationCategory::Employee,
        format!("{} {}", Employee::element_name(), employee.base.code),
        format!("{}: {}", employee.base.description, change),
    );
}

pub fn list(store: &MockStore, unread_only: bool) -> Vec<Notification> {
    store
        .notifications
        .iter()
        .rev()
        .filter(|n| !unread_only || !n.is_read)
        .cloned()
        .collect()
}

pub fn unread_count(store: &MockStore) -> usize {
    store.notifications.iter().filter(|n| !n.is_read).count()
}

pub fn mark_read(store: &mut MockStore, id: i64) -> ErpResult<()> {
    let notification = store
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or(ErpError::NotFound {
            entity: "Notification",
        })?;
    notification.is_read = true;
    Ok(())
}

pub fn mark_all_read(store: &mut MockStore) -> usize {
    let mut changed = 0;
    for n in store.notifications.iter_mut().filter(|n| !n.is_read) {
        n.is_read = true;
        changed += 1;
    }
    changed
}

pub fn clear(store: &mut MockStore, actor: &Actor) -> usize {
    let removed = store.notifications.len();
    store.notifications.clear();
    activity_log::record(
        store,
        actor,
        ActivityAction::Delete,
        Some("notification"),
        None,
        format!("Cleared {} notifications", removed),
    );
    removed
}

pub fn get_settings(store: &MockStore) -> NotificationSettings {
    store.notification_settings.clone()
}

pub fn update_settings(
    store: &mut MockStore,
    actor: &Actor,
    settings: NotificationSettings,
) -> ErpResult<NotificationSettings> {
    settings.validate().map_err(ErpError::Validation)?;
    store.notification_settings = settings.clone();
    activity_log::record(
        store,
        actor,
        ActivityAction::Update,
        Some("notification_settings"),
        None,
        "Notification settings updated",
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_product::aggregate::{Product, ProductDto};

    fn store_with_product(stock: i64, min_stock: i64) -> (MockStore, ProductId) {
        let mut store = MockStore::default();
        let product = Product::new_for_insert(&ProductDto {
            code: Some("CAB-01".into()),
            name: "Cable HDMI".into(),
            stock,
            min_stock,
            ..Default::default()
        });
        let id = product.base.id;
        store.products.insert(product);
        (store, id)
    }

    #[test]
    fn test_low_stock_uses_default_threshold() {
        let (mut store, id) = store_with_product(5, 0);
        check_low_stock(&mut store, &[id]);
        assert_eq!(store.notifications.len(), 1);
        assert_eq!(store.notifications[0].level, NotificationLevel::Warning);
        assert_eq!(store.notifications[0].category, NotificationCategory::Stock);
    }

    #[test]
    fn test_low_stock_respects_product_threshold() {
        let (mut store, id) = store_with_product(8, 3);
        check_low_stock(&mut store, &[id]);
        assert!(store.notifications.is_empty());
    }

    #[test]
    fn test_disabled_settings_suppress_everything() {
        let (mut store, id) = store_with_product(0, 0);
        store.notification_settings.enabled = false;
        check_low_stock(&mut store, &[id]);
        assert!(store.notifications.is_empty());
    }

    #[test]
    fn test_read_flags_and_retention() {
        let (mut store, id) = store_with_product(0, 0);
        store.notification_settings.max_notifications = 2;
        for _ in 0..3 {
            check_low_stock(&mut store, &[id]);
        }
        assert_eq!(store.notifications.len(), 2);
        assert_eq!(unread_count(&store), 2);

        let newest = list(&store, false)[0].id;
        assert_eq!(newest, 3);
        mark_read(&mut store, newest).unwrap();
        assert_eq!(list(&store, true).len(), 1);
        assert_eq!(mark_all_read(&mut store), 1);
        assert_eq!(unread_count(&store), 0);
        assert!(mark_read(&mut store, 99).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut store = MockStore::default();
        let settings = NotificationSettings {
            max_notifications: 0,
            ..Default::default()
        };
        assert!(update_settings(&mut store, &Actor::system(), settings).is_err());
        assert_eq!(store.notification_settings, NotificationSettings::default());
    }
}
