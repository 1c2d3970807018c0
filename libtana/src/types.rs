//! Core types for Tana

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a consumable item.
///
/// `Time` is retained because historical snapshot blobs contain it; user
/// ranking only ever considers `Glove` (see [`crate::view::sorted_users`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemType {
    Glove,
    Time,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Glove => "glove",
            ItemType::Time => "time",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "glove" => Ok(ItemType::Glove),
            "time" => Ok(ItemType::Time),
            _ => Err(format!(
                "Invalid item type: '{}'. Valid options: glove, time",
                s
            )),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A consumable item owned by a single user.
///
/// All fields are immutable after creation; an item leaves the snapshot
/// only by consumption, explicit purge, or the periodic sweep. Field names
/// follow the persisted blob format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(rename = "acquiredAt")]
    pub acquired_at: i64,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// A named owner of a collection of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
}

impl User {
    /// Create a user with a fresh id and no items
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            items: Vec::new(),
        }
    }
}

/// The full ordered sequence of users; the unit of persistence.
///
/// Serializes as a bare JSON array so existing blobs round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Snapshot {
    pub users: Vec<User>,
}

impl Snapshot {
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub(crate) fn user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    /// Total number of items across all users
    pub fn item_count(&self) -> usize {
        self.users.iter().map(|u| u.items.len()).sum()
    }
}
