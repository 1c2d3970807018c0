//! Tana - per-user consumable item tracking with automatic expiry
//!
//! This library provides the core functionality for granting users
//! consumable items that expire a fixed time after acquisition, sweeping
//! expired items out of the persisted state, and deriving display-ready
//! views (ordering, counts, countdowns) from it.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod persist;
pub mod service;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TanaError};
pub use lifecycle::{now_ms, Remaining, ITEM_TTL_MS};
pub use persist::SnapshotStore;
pub use service::InventoryService;
pub use store::InventoryStore;
pub use types::{Item, ItemType, Snapshot, User};
