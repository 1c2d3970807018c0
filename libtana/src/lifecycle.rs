//! Item expiry lifecycle
//!
//! Items expire a fixed interval after acquisition. Classification into
//! active/expired and the remaining-time breakdown always take the caller's
//! `now`; nothing here caches clock state.

use serde::Serialize;
use uuid::Uuid;

use crate::types::{Item, ItemType};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Items expire exactly this long after acquisition (5 days).
pub const ITEM_TTL_MS: i64 = 5 * MS_PER_DAY;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Item {
    /// Create an item acquired at `now_ms` with a fresh id
    pub fn new(item_type: ItemType, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item_type,
            acquired_at: now_ms,
            expires_at: now_ms + ITEM_TTL_MS,
        }
    }

    /// An item is active strictly before its expiry timestamp
    pub fn is_active(&self, now_ms: i64) -> bool {
        self.expires_at > now_ms
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        !self.is_active(now_ms)
    }

    /// Time left until expiry, or `None` once expired.
    ///
    /// The breakdown truncates: a countdown never rounds up.
    pub fn remaining(&self, now_ms: i64) -> Option<Remaining> {
        if self.is_expired(now_ms) {
            return None;
        }
        let left = self.expires_at - now_ms;
        Some(Remaining {
            days: left / MS_PER_DAY,
            hours: (left % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (left % MS_PER_HOUR) / MS_PER_MINUTE,
        })
    }
}

/// Whole days, hours within the day, and minutes within the hour left
/// before an item expires.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl std::fmt::Display for Remaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_is_exactly_five_days() {
        let item = Item::new(ItemType::Glove, 1_000);
        assert_eq!(item.expires_at - item.acquired_at, ITEM_TTL_MS);
        assert_eq!(ITEM_TTL_MS, 432_000_000);
    }

    #[test]
    fn test_new_items_have_unique_ids() {
        let a = Item::new(ItemType::Glove, 0);
        let b = Item::new(ItemType::Glove, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_active_boundary() {
        let item = Item::new(ItemType::Glove, 0);

        assert!(item.is_active(0));
        assert!(item.is_active(ITEM_TTL_MS - 1));
        // Expiry is exclusive: at exactly expires_at the item is expired
        assert!(!item.is_active(ITEM_TTL_MS));
        assert!(!item.is_active(ITEM_TTL_MS + 1));
    }

    #[test]
    fn test_is_expired_is_negation_of_is_active() {
        let item = Item::new(ItemType::Time, 500);
        for t in [0, 500, ITEM_TTL_MS + 499, ITEM_TTL_MS + 500, i64::MAX] {
            assert_eq!(item.is_expired(t), !item.is_active(t));
        }
    }

    #[test]
    fn test_remaining_full_ttl() {
        let item = Item::new(ItemType::Glove, 0);
        assert_eq!(
            item.remaining(0),
            Some(Remaining {
                days: 5,
                hours: 0,
                minutes: 0
            })
        );
    }

    #[test]
    fn test_remaining_truncates() {
        let item = Item::new(ItemType::Glove, 0);

        // One millisecond in: still shows the full window minus nothing whole
        let r = item.remaining(1).unwrap();
        assert_eq!((r.days, r.hours, r.minutes), (4, 23, 59));

        // 1 day, 2 hours, 3 minutes and change consumed
        let consumed = MS_PER_DAY + 2 * MS_PER_HOUR + 3 * MS_PER_MINUTE + 4_321;
        let r = item.remaining(consumed).unwrap();
        assert_eq!((r.days, r.hours, r.minutes), (3, 21, 56));
    }

    #[test]
    fn test_remaining_decomposition_bounds() {
        // days*day + hours*hour + minutes*minute <= left < ... + one more minute
        let item = Item::new(ItemType::Glove, 0);
        for now in [0, 1, 59_999, 60_000, MS_PER_HOUR, MS_PER_DAY, ITEM_TTL_MS - 1] {
            let left = item.expires_at - now;
            let r = item.remaining(now).unwrap();
            let floor = r.days * MS_PER_DAY + r.hours * MS_PER_HOUR + r.minutes * MS_PER_MINUTE;
            assert!(floor <= left, "floor {} > left {} at now={}", floor, left, now);
            assert!(left < floor + MS_PER_MINUTE);
            assert!((0..24).contains(&r.hours));
            assert!((0..60).contains(&r.minutes));
        }
    }

    #[test]
    fn test_remaining_none_once_expired() {
        let item = Item::new(ItemType::Glove, 0);
        assert_eq!(item.remaining(ITEM_TTL_MS), None);
        assert_eq!(item.remaining(ITEM_TTL_MS + 1), None);
    }

    #[test]
    fn test_remaining_display() {
        let r = Remaining {
            days: 5,
            hours: 0,
            minutes: 0,
        };
        assert_eq!(r.to_string(), "5d 0h 0m");

        let r = Remaining {
            days: 0,
            hours: 23,
            minutes: 59,
        };
        assert_eq!(r.to_string(), "0d 23h 59m");
    }

    #[test]
    fn test_now_ms_is_current() {
        let before = chrono::Utc::now().timestamp_millis();
        let now = now_ms();
        let after = chrono::Utc::now().timestamp_millis();
        assert!(now >= before && now <= after);
    }
}
