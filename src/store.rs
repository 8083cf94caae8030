//! Observable key-value store for view flags.
//!
//! Flags such as `view.compact` are injected into the session through this
//! store instead of living in process-wide globals, so tests can run with a
//! fully controlled instance.
//!
//! # Thread Safety
//!
//! [`MemoryStore`] uses `RwLock` for values (many readers, one writer) and a
//! separate `Mutex` for subscribers. Callbacks run after both locks are
//! released, so a callback may read, write or (un)subscribe on the same store.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Flag read by the session: open posts on their own page instead of inline
pub const FLAG_COMPACT: &str = "view.compact";

/// Handle returned by [`FlagStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&str, Option<&Value>) + Send + Sync>;

/// Narrow key-value interface with change notification.
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` (`None` removes the key). Subscribers of `key` are
    /// notified only when the stored value actually changes.
    fn set(&self, key: &str, value: Option<Value>);

    fn subscribe(&self, key: &str, callback: Callback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Boolean view of a flag; anything but JSON `true` is false.
    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }
}

struct Subscriber {
    id: SubscriptionId,
    key: String,
    callback: Arc<dyn Fn(&str, Option<&Value>) + Send + Sync>,
}

/// In-memory [`FlagStore`].
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with values, e.g. from configuration.
    pub fn with_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl FlagStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Option<Value>) {
        let changed = {
            let mut values = self.values.write();
            let previous = match &value {
                Some(v) => values.insert(key.to_owned(), v.clone()),
                None => values.remove(key),
            };
            previous != value
        };
        if !changed {
            return;
        }

        let callbacks: Vec<_> = self
            .subscribers
            .lock()
            .iter()
            .filter(|s| s.key == key)
            .map(|s| Arc::clone(&s.callback))
            .collect();
        for callback in callbacks {
            callback(key, value.as_ref());
        }
    }

    fn subscribe(&self, key: &str, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.subscribers.lock().push(Subscriber {
            id,
            key: key.to_owned(),
            callback: Arc::from(callback),
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_get_set_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").is_none());
        store.set("a", Some(json!(1)));
        assert_eq!(store.get("a"), Some(json!(1)));
        store.set("a", None);
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_flag_only_true_counts() {
        let store = MemoryStore::with_values([
            ("on".to_string(), json!(true)),
            ("text".to_string(), json!("true")),
        ]);
        assert!(store.flag("on"));
        assert!(!store.flag("text"));
        assert!(!store.flag("missing"));
    }

    #[test]
    fn test_subscribers_notified_on_change_only() {
        let store = MemoryStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = store.subscribe(
            FLAG_COMPACT,
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set(FLAG_COMPACT, Some(json!(true)));
        store.set(FLAG_COMPACT, Some(json!(true)));
        store.set("other", Some(json!(true)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        store.set(FLAG_COMPACT, None);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set(FLAG_COMPACT, Some(json!(false)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_sees_new_value() {
        let store = MemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(
            "k",
            Box::new(move |key, value| sink.lock().push((key.to_owned(), value.cloned()))),
        );
        store.set("k", Some(json!("x")));
        assert_eq!(*seen.lock(), vec![("k".to_owned(), Some(json!("x")))]);
    }

    #[test]
    fn test_callback_can_write_and_subscribe() {
        let store = Arc::new(MemoryStore::new());
        let weak = Arc::downgrade(&store);
        store.subscribe(
            FLAG_COMPACT,
            Box::new(move |_, value| {
                if let Some(store) = weak.upgrade() {
                    store.set("mirror", value.cloned());
                    let id = store.subscribe("late", Box::new(|_, _| {}));
                    store.unsubscribe(id);
                }
            }),
        );

        store.set(FLAG_COMPACT, Some(json!(true)));
        assert_eq!(store.get("mirror"), Some(json!(true)));
        store.set(FLAG_COMPACT, None);
        assert!(store.get("mirror").is_none());
    }
}
