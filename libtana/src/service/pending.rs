//! Two-phase confirmation for destructive operations
//!
//! Store operations are unconditional once invoked. A caller that wants
//! operator confirmation first captures the intent as a [`PendingAction`],
//! shows its summary, and only on explicit approval passes it to
//! [`InventoryService::apply`](super::InventoryService::apply).

use serde::{Deserialize, Serialize};

use crate::types::ItemType;

/// A destructive intent awaiting confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PendingAction {
    RenameUser { user_id: String, new_name: String },
    DeleteUser { user_id: String },
    ConsumeItem { user_id: String, item_id: String },
    PurgeExpired {
        user_id: String,
        item_type: Option<ItemType>,
    },
}

impl PendingAction {
    /// Human-readable description shown in confirmation prompts
    pub fn summary(&self) -> String {
        match self {
            PendingAction::RenameUser { user_id, new_name } => {
                format!("rename user {} to '{}'", user_id, new_name)
            }
            PendingAction::DeleteUser { user_id } => {
                format!("delete user {} and all their items", user_id)
            }
            PendingAction::ConsumeItem { user_id, item_id } => {
                format!("use (delete) item {} of user {}", item_id, user_id)
            }
            PendingAction::PurgeExpired {
                user_id,
                item_type: Some(t),
            } => format!("remove expired {} items of user {}", t, user_id),
            PendingAction::PurgeExpired {
                user_id,
                item_type: None,
            } => format!("remove all expired items of user {}", user_id),
        }
    }
}
