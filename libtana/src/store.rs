//! Inventory store: mutations over the snapshot
//!
//! All operations are synchronous and total. Unknown user or item ids are
//! silent no-ops: ids only originate from the store itself, so a miss means
//! a stale reference from an earlier render, not a caller bug. Mutation
//! methods report whether the snapshot changed so callers know when to
//! persist.

use crate::types::{Item, ItemType, Snapshot, User};

/// Prefix for auto-generated user names
const AUTO_NAME_PREFIX: &str = "ユーザー";

#[derive(Debug, Default)]
pub struct InventoryStore {
    snapshot: Snapshot,
}

impl InventoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Append a new user with no items.
    ///
    /// A missing or whitespace-only name is replaced by the next free
    /// auto-generated `ユーザーNN` name. Returns the created user.
    pub fn add_user(&mut self, name: Option<&str>) -> User {
        let trimmed = name.map(str::trim).unwrap_or("");
        let name = if trimmed.is_empty() {
            self.next_auto_name()
        } else {
            trimmed.to_string()
        };

        let user = User::new(name);
        self.snapshot.users.push(user.clone());
        user
    }

    /// One more than the highest numeric suffix among `ユーザーNN` names,
    /// zero-padded to two digits
    fn next_auto_name(&self) -> String {
        let max = self
            .snapshot
            .users
            .iter()
            .filter_map(|u| u.name.strip_prefix(AUTO_NAME_PREFIX))
            .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        format!("{}{:02}", AUTO_NAME_PREFIX, max + 1)
    }

    /// Set a user's display name to the trimmed input.
    ///
    /// Returns false without touching anything when the input trims to
    /// empty or the user does not exist.
    pub fn rename_user(&mut self, user_id: &str, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.snapshot.user_mut(user_id) {
            Some(user) => {
                user.name = trimmed.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a user and all owned items
    pub fn delete_user(&mut self, user_id: &str) -> bool {
        let before = self.snapshot.users.len();
        self.snapshot.users.retain(|u| u.id != user_id);
        self.snapshot.users.len() != before
    }

    /// Grant an item to a user; `None` if the user does not exist
    pub fn add_item(&mut self, user_id: &str, item_type: ItemType, now_ms: i64) -> Option<Item> {
        let user = self.snapshot.user_mut(user_id)?;
        let item = Item::new(item_type, now_ms);
        user.items.push(item.clone());
        Some(item)
    }

    /// Remove exactly one item by id from a user's collection
    pub fn consume_item(&mut self, user_id: &str, item_id: &str) -> bool {
        if let Some(user) = self.snapshot.user_mut(user_id) {
            if let Some(pos) = user.items.iter().position(|i| i.id == item_id) {
                user.items.remove(pos);
                return true;
            }
        }
        false
    }

    /// Remove a user's expired items, optionally restricted to one type.
    ///
    /// Returns the number of items removed.
    pub fn purge_expired(
        &mut self,
        user_id: &str,
        item_type: Option<ItemType>,
        now_ms: i64,
    ) -> usize {
        match self.snapshot.user_mut(user_id) {
            Some(user) => {
                let before = user.items.len();
                user.items.retain(|item| {
                    item.is_active(now_ms) || item_type.is_some_and(|t| item.item_type != t)
                });
                before - user.items.len()
            }
            None => 0,
        }
    }

    /// Remove every expired item for every user.
    ///
    /// Returns the total number removed; 0 means the snapshot is unchanged
    /// and callers can skip persistence and render churn. Idempotent for a
    /// fixed `now_ms`.
    pub fn sweep(&mut self, now_ms: i64) -> usize {
        let mut removed = 0;
        for user in &mut self.snapshot.users {
            let before = user.items.len();
            user.items.retain(|item| item.is_active(now_ms));
            removed += before - user.items.len();
        }
        removed
    }
}
