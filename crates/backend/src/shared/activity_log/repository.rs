use chrono::Utc;
use contracts::shared::activity_log::{
    ActivityAction, ActivityLogEntry, ActivityLogQuery, ActivitySource,
};

use super::Actor;
use crate::shared::data::store::MockStore;

/// Добавить запись в журнал; старые записи сверх лимита отбрасываются
pub fn append(
    store: &mut MockStore,
    source: ActivitySource,
    actor: &Actor,
    action: ActivityAction,
    entity: Option<String>,
    entity_id: Option<String>,
    message: String,
) -> ActivityLogEntry {
    let entry = ActivityLogEntry {
        id: store.next_log_id(),
        timestamp: Utc::now(),
        source,
        actor_id: actor.id.clone(),
        actor_name: actor.name.clone(),
        action,
        entity,
        entity_id,
        message,
    };
    tracing::info!(
        target: "activity",
        actor = %entry.actor_name,
        action = ?entry.action,
        "{}",
        entry.message
    );

    store.activity_log.push(entry.clone());
    let max = store.options.max_log_entries.max(1);
    if store.activity_log.len() > max {
        let excess = store.activity_log.len() - max;
        store.activity_log.drain(..excess);
    }
    entry
}

/// Записи журнала, новые сверху
pub fn list(store: &MockStore, query: &ActivityLogQuery) -> Vec<ActivityLogEntry> {
    let limit = query.limit.unwrap_or(200);
    store
        .activity_log
        .iter()
        .rev()
        .filter(|e| {
            query
                .entity
                .as_deref()
                .map_or(true, |entity| e.entity.as_deref() == Some(entity))
        })
        .filter(|e| {
            query
                .actor_id
                .as_deref()
                .map_or(true, |actor| e.actor_id.as_deref() == Some(actor))
        })
        .filter(|e| query.action.map_or(true, |action| e.action == action))
        .take(limit)
        .cloned()
        .collect()
}

/// Очистить журнал
pub fn clear(store: &mut MockStore) -> usize {
    let removed = store.activity_log.len();
    store.activity_log.clear();
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::store::StoreOptions;

    fn store(max: usize) -> MockStore {
        MockStore::new(StoreOptions {
            max_log_entries: max,
            ..Default::default()
        })
    }

    fn push(store: &mut MockStore, action: ActivityAction, entity: &str, msg: &str) {
        append(
            store,
            ActivitySource::Server,
            &Actor::system(),
            action,
            Some(entity.into()),
            None,
            msg.into(),
        );
    }

    #[test]
    fn test_list_is_newest_first_and_filtered() {
        let mut s = store(10);
        push(&mut s, ActivityAction::Create, "client", "one");
        push(&mut s, ActivityAction::Update, "product", "two");
        push(&mut s, ActivityAction::Create, "client", "three");

        let all = list(&s, &ActivityLogQuery::default());
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].message, "three");

        let clients = list(
            &s,
            &ActivityLogQuery {
                entity: Some("client".into()),
                ..Default::default()
            },
        );
        assert_eq!(clients.len(), 2);

        let updates = list(
            &s,
            &ActivityLogQuery {
                action: Some(ActivityAction::Update),
                ..Default::default()
            },
        );
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].message, "two");
    }

    #[test]
    fn test_retention_drops_oldest() {
        let mut s = store(2);
        push(&mut s, ActivityAction::Other, "x", "a");
        push(&mut s, ActivityAction::Other, "x", "b");
        push(&mut s, ActivityAction::Other, "x", "c");
        let entries = list(&s, &ActivityLogQuery::default());
        let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["c", "b"]);
        assert_eq!(entries[0].id, 3);
    }

    #[test]
    fn test_clear() {
        let mut s = store(10);
        push(&mut s, ActivityAction::Other, "x", "a");
        assert_eq!(clear(&mut s), 1);
        assert!(list(&s, &ActivityLogQuery::default()).is_empty());
    }
}
