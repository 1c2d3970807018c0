//! Service layer for Tana
//!
//! [`InventoryService`] is the single entry point interfaces talk to. It
//! owns the in-memory store behind a lock, persists the snapshot after
//! every mutation that changed it, and notifies subscribers through the
//! event bus. Confirmation of destructive intents happens strictly on the
//! caller's side, before [`InventoryService::apply`] is invoked.

pub mod events;
pub mod pending;
pub mod sweeper;

pub use events::{Event, EventBus, EventReceiver};
pub use pending::PendingAction;
pub use sweeper::Sweeper;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::warn;

use crate::config::{resolve_store_path, Config};
use crate::lifecycle::now_ms;
use crate::persist::SnapshotStore;
use crate::store::InventoryStore;
use crate::types::{Item, ItemType, Snapshot, User};
use crate::Result;

/// Facade coordinating the store, persistence, and event notifications.
///
/// Cheap to clone; all clones share the same state. Mutations are
/// serialized through one lock, so a sweep never interleaves inside an
/// operator edit and no partially-updated snapshot is ever observable.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<RwLock<InventoryStore>>,
    blob: SnapshotStore,
    events: EventBus,
}

impl InventoryService {
    /// Create a service from configuration, loading the persisted snapshot
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_store(SnapshotStore::new(resolve_store_path(
            config,
        )?)))
    }

    /// Create a service over a specific snapshot store
    pub fn with_store(blob: SnapshotStore) -> Self {
        let snapshot = blob.load();
        Self {
            store: Arc::new(RwLock::new(InventoryStore::new(snapshot))),
            blob,
            events: EventBus::new(100),
        }
    }

    /// A copy of the current snapshot for projection and rendering
    pub fn snapshot(&self) -> Snapshot {
        self.store.read().unwrap().snapshot().clone()
    }

    /// Subscribe to tick and change events
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn add_user(&self, name: Option<&str>) -> User {
        let user = self.store.write().unwrap().add_user(name);
        self.commit();
        user
    }

    pub fn rename_user(&self, user_id: &str, new_name: &str) -> bool {
        let changed = self.store.write().unwrap().rename_user(user_id, new_name);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn delete_user(&self, user_id: &str) -> bool {
        let changed = self.store.write().unwrap().delete_user(user_id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn add_item(&self, user_id: &str, item_type: ItemType) -> Option<Item> {
        let item = self
            .store
            .write()
            .unwrap()
            .add_item(user_id, item_type, now_ms());
        if item.is_some() {
            self.commit();
        }
        item
    }

    pub fn consume_item(&self, user_id: &str, item_id: &str) -> bool {
        let changed = self.store.write().unwrap().consume_item(user_id, item_id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn purge_expired(&self, user_id: &str, item_type: Option<ItemType>) -> usize {
        let removed = self
            .store
            .write()
            .unwrap()
            .purge_expired(user_id, item_type, now_ms());
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Remove expired items for every user against the given clock.
    ///
    /// Persists and notifies only when something was actually removed.
    pub fn sweep_at(&self, now_ms: i64) -> usize {
        let removed = self.store.write().unwrap().sweep(now_ms);
        if removed > 0 {
            self.commit();
        }
        removed
    }

    pub fn sweep_now(&self) -> usize {
        self.sweep_at(now_ms())
    }

    /// Execute a confirmed pending action.
    ///
    /// Returns whether the snapshot changed; stale ids make this a no-op.
    pub fn apply(&self, action: PendingAction) -> bool {
        match action {
            PendingAction::RenameUser { user_id, new_name } => {
                self.rename_user(&user_id, &new_name)
            }
            PendingAction::DeleteUser { user_id } => self.delete_user(&user_id),
            PendingAction::ConsumeItem { user_id, item_id } => {
                self.consume_item(&user_id, &item_id)
            }
            PendingAction::PurgeExpired { user_id, item_type } => {
                self.purge_expired(&user_id, item_type) > 0
            }
        }
    }

    /// Start the periodic expiry sweep
    pub fn spawn_sweeper(&self, period: Duration) -> Sweeper {
        sweeper::spawn(self.clone(), period)
    }

    /// Persist the snapshot and announce the change.
    ///
    /// A failed write is logged and otherwise ignored; the in-memory
    /// snapshot stays authoritative for the session and is not retried.
    fn commit(&self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.blob.save(&snapshot) {
            warn!(error = %e, "failed to persist snapshot; keeping in-memory state");
        }
        self.events.emit(Event::SnapshotChanged {
            users: snapshot.users.len(),
            items: snapshot.item_count(),
        });
    }

    /// Insert an item acquired at an arbitrary past time
    #[cfg(test)]
    pub(crate) fn add_item_at(&self, user_id: &str, item_type: ItemType, acquired_ms: i64) {
        self.store
            .write()
            .unwrap()
            .add_item(user_id, item_type, acquired_ms);
        self.commit();
    }
}
