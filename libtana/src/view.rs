//! Display projections over a snapshot
//!
//! Everything here is a pure function of `(snapshot, now_ms)`, recomputed
//! on every render or tick. None of these values are ever persisted; the
//! snapshot stores facts, the view derives presentation.

use crate::lifecycle::Remaining;
use crate::types::{Item, ItemType, Snapshot, User};

/// Users ordered by ascending earliest active `Glove` expiry.
///
/// A user with no active glove sorts last. The sort is stable, so users
/// with equal keys (including none at all) keep their snapshot order.
pub fn sorted_users(snapshot: &Snapshot, now_ms: i64) -> Vec<&User> {
    let mut users: Vec<&User> = snapshot.users.iter().collect();
    users.sort_by_key(|user| {
        earliest_active_expiry(user, ItemType::Glove, now_ms).unwrap_or(i64::MAX)
    });
    users
}

/// Earliest expiry among a user's *active* items of the given type.
///
/// Expired-but-unswept items deliberately do not participate in ranking.
pub fn earliest_active_expiry(user: &User, item_type: ItemType, now_ms: i64) -> Option<i64> {
    user.items
        .iter()
        .filter(|item| item.item_type == item_type && item.is_active(now_ms))
        .map(|item| item.expires_at)
        .min()
}

/// A user's items of one type split into active and expired.
#[derive(Debug)]
pub struct Partition<'a> {
    /// Active items, oldest-acquired first (FIFO consumption order)
    pub active: Vec<&'a Item>,
    /// Expired items awaiting the sweep; order unspecified, only counted
    pub expired: Vec<&'a Item>,
}

pub fn items_of_type<'a>(user: &'a User, item_type: ItemType, now_ms: i64) -> Partition<'a> {
    let mut active = Vec::new();
    let mut expired = Vec::new();

    for item in user.items.iter().filter(|i| i.item_type == item_type) {
        if item.is_active(now_ms) {
            active.push(item);
        } else {
            expired.push(item);
        }
    }
    active.sort_by_key(|item| item.acquired_at);

    Partition { active, expired }
}

pub fn active_count(user: &User, item_type: ItemType, now_ms: i64) -> usize {
    user.items
        .iter()
        .filter(|item| item.item_type == item_type && item.is_active(now_ms))
        .count()
}

/// Countdown for the item next offered for use (FIFO-first active item),
/// or `None` when the user has no active item of the type.
pub fn next_to_expire(user: &User, item_type: ItemType, now_ms: i64) -> Option<Remaining> {
    items_of_type(user, item_type, now_ms)
        .active
        .first()
        .and_then(|item| item.remaining(now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ITEM_TTL_MS;
    use crate::store::InventoryStore;

    const DAY: i64 = 86_400_000;

    fn store_with_users(names: &[&str]) -> (InventoryStore, Vec<String>) {
        let mut store = InventoryStore::default();
        let ids = names
            .iter()
            .map(|&n| store.add_user(Some(n)).id)
            .collect::<Vec<_>>();
        (store, ids)
    }

    #[test]
    fn test_sorted_users_soonest_expiry_first() {
        let (mut store, ids) = store_with_users(&["A", "B"]);
        // A's glove expires 3 days after B's
        store.add_item(&ids[0], ItemType::Glove, 3 * DAY);
        store.add_item(&ids[1], ItemType::Glove, 0);

        let now = 4 * DAY;
        let sorted = sorted_users(store.snapshot(), now);
        assert_eq!(sorted[0].name, "B");
        assert_eq!(sorted[1].name, "A");
    }

    #[test]
    fn test_sorted_users_without_active_glove_sort_last() {
        let (mut store, ids) = store_with_users(&["None", "Expired", "Active"]);
        store.add_item(&ids[1], ItemType::Glove, 0);
        store.add_item(&ids[2], ItemType::Glove, ITEM_TTL_MS);

        // ids[1]'s glove has expired by now; only ids[2] has an active one
        let now = ITEM_TTL_MS + 1;
        let sorted = sorted_users(store.snapshot(), now);
        assert_eq!(sorted[0].name, "Active");
        // No-active users keep snapshot order among themselves
        assert_eq!(sorted[1].name, "None");
        assert_eq!(sorted[2].name, "Expired");
    }

    #[test]
    fn test_sorted_users_ignores_time_items() {
        let (mut store, ids) = store_with_users(&["TimeOnly", "Glove"]);
        store.add_item(&ids[0], ItemType::Time, 0);
        store.add_item(&ids[1], ItemType::Glove, DAY);

        let sorted = sorted_users(store.snapshot(), 2 * DAY);
        assert_eq!(sorted[0].name, "Glove");
        assert_eq!(sorted[1].name, "TimeOnly");
    }

    #[test]
    fn test_sorted_users_stable_and_idempotent() {
        let (mut store, ids) = store_with_users(&["A", "B", "C"]);
        // A and B tie exactly; C has nothing
        store.add_item(&ids[0], ItemType::Glove, 0);
        store.add_item(&ids[1], ItemType::Glove, 0);

        let first: Vec<String> = sorted_users(store.snapshot(), DAY)
            .iter()
            .map(|u| u.name.clone())
            .collect();
        assert_eq!(first, ["A", "B", "C"]);

        // Sorting the already-sorted sequence changes nothing
        let again: Vec<String> = sorted_users(store.snapshot(), DAY)
            .iter()
            .map(|u| u.name.clone())
            .collect();
        assert_eq!(again, first);
    }

    #[test]
    fn test_earliest_active_expiry_picks_minimum() {
        let (mut store, ids) = store_with_users(&["A"]);
        store.add_item(&ids[0], ItemType::Glove, 2 * DAY);
        store.add_item(&ids[0], ItemType::Glove, DAY);

        let user = &store.snapshot().users[0];
        assert_eq!(
            earliest_active_expiry(user, ItemType::Glove, 3 * DAY),
            Some(DAY + ITEM_TTL_MS)
        );
    }

    #[test]
    fn test_earliest_active_expiry_skips_expired() {
        let (mut store, ids) = store_with_users(&["A"]);
        store.add_item(&ids[0], ItemType::Glove, 0);
        store.add_item(&ids[0], ItemType::Glove, 2 * DAY);

        // First glove expired; the later one is the key now
        let now = ITEM_TTL_MS + 1;
        let user = &store.snapshot().users[0];
        assert_eq!(
            earliest_active_expiry(user, ItemType::Glove, now),
            Some(2 * DAY + ITEM_TTL_MS)
        );

        // All expired
        assert_eq!(
            earliest_active_expiry(user, ItemType::Glove, 10 * ITEM_TTL_MS),
            None
        );
    }

    #[test]
    fn test_items_of_type_partition_and_fifo_order() {
        let (mut store, ids) = store_with_users(&["A"]);
        // Inserted out of acquisition order
        let newer = store.add_item(&ids[0], ItemType::Glove, 2 * DAY).unwrap();
        let older = store.add_item(&ids[0], ItemType::Glove, DAY).unwrap();
        let dead = store.add_item(&ids[0], ItemType::Glove, 0).unwrap();
        store.add_item(&ids[0], ItemType::Time, DAY);

        let now = ITEM_TTL_MS; // only the t=0 glove has expired
        let user = &store.snapshot().users[0];
        let partition = items_of_type(user, ItemType::Glove, now);

        let active_ids: Vec<&str> = partition.active.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(active_ids, [older.id.as_str(), newer.id.as_str()]);
        assert_eq!(partition.expired.len(), 1);
        assert_eq!(partition.expired[0].id, dead.id);
    }

    #[test]
    fn test_active_count() {
        let (mut store, ids) = store_with_users(&["A"]);
        store.add_item(&ids[0], ItemType::Glove, 0);
        store.add_item(&ids[0], ItemType::Glove, DAY);
        store.add_item(&ids[0], ItemType::Time, DAY);

        let user = &store.snapshot().users[0];
        assert_eq!(active_count(user, ItemType::Glove, 0), 2);
        assert_eq!(active_count(user, ItemType::Glove, ITEM_TTL_MS), 1);
        assert_eq!(active_count(user, ItemType::Glove, DAY + ITEM_TTL_MS), 0);
        assert_eq!(active_count(user, ItemType::Time, 0), 1);
    }

    #[test]
    fn test_next_to_expire_follows_fifo_head() {
        let (mut store, ids) = store_with_users(&["A"]);
        store.add_item(&ids[0], ItemType::Glove, DAY);
        store.add_item(&ids[0], ItemType::Glove, 0);

        // FIFO head is the t=0 glove: full window at t=0
        let user = &store.snapshot().users[0];
        let r = next_to_expire(user, ItemType::Glove, 0).unwrap();
        assert_eq!((r.days, r.hours, r.minutes), (5, 0, 0));

        // After it expires the head moves to the t=DAY glove
        let r = next_to_expire(user, ItemType::Glove, ITEM_TTL_MS).unwrap();
        assert_eq!((r.days, r.hours, r.minutes), (1, 0, 0));
    }

    #[test]
    fn test_next_to_expire_none_without_active_items() {
        let (mut store, ids) = store_with_users(&["A"]);
        let user_id = &ids[0];

        let user = store.snapshot().user(user_id).unwrap();
        assert!(next_to_expire(user, ItemType::Glove, 0).is_none());

        store.add_item(user_id, ItemType::Glove, 0);
        let user = store.snapshot().user(user_id).unwrap();
        assert!(next_to_expire(user, ItemType::Glove, ITEM_TTL_MS).is_none());
    }
}
