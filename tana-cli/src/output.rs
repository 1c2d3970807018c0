//! Rendering of snapshot projections

use chrono::{Local, LocalResult, TimeZone};
use serde::Serialize;

use libtana::error::StoreError;
use libtana::view;
use libtana::{ItemType, Result, Snapshot, User};

/// One user in display order with per-type summaries
#[derive(Debug, Serialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub glove: TypeSummary,
    pub time: TypeSummary,
}

/// Display summary for one item type of one user
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub active: usize,
    pub expired: usize,
    /// Countdown of the item next offered for use
    pub next_remaining: Option<String>,
    /// Absolute expiry of that item, `MM/dd HH:mm` local time
    pub next_expires_at: Option<String>,
}

/// Project the snapshot into display rows, soonest glove expiry first
pub fn rows(snapshot: &Snapshot, now_ms: i64) -> Vec<UserRow> {
    view::sorted_users(snapshot, now_ms)
        .into_iter()
        .map(|user| UserRow {
            id: user.id.clone(),
            name: user.name.clone(),
            glove: summarize(user, ItemType::Glove, now_ms),
            time: summarize(user, ItemType::Time, now_ms),
        })
        .collect()
}

fn summarize(user: &User, item_type: ItemType, now_ms: i64) -> TypeSummary {
    let partition = view::items_of_type(user, item_type, now_ms);
    let next = partition.active.first();

    TypeSummary {
        active: partition.active.len(),
        expired: partition.expired.len(),
        next_remaining: next.and_then(|i| i.remaining(now_ms)).map(|r| r.to_string()),
        next_expires_at: next.map(|i| format_expiry(i.expires_at)),
    }
}

/// Absolute timestamp as `MM/dd HH:mm` in the operator's timezone
pub fn format_expiry(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms) {
        LocalResult::Single(dt) => dt.format("%m/%d %H:%M").to_string(),
        _ => "--/-- --:--".to_string(),
    }
}

pub fn render_text(snapshot: &Snapshot, now_ms: i64) -> String {
    let rows = rows(snapshot, now_ms);
    if rows.is_empty() {
        return "No users.\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{}  [glove] {}  [time] {}\n",
            row.name,
            format_summary(&row.glove),
            format_summary(&row.time),
        ));
    }
    out
}

fn format_summary(summary: &TypeSummary) -> String {
    let mut s = format!("{} active", summary.active);
    if let (Some(remaining), Some(expires)) = (&summary.next_remaining, &summary.next_expires_at) {
        s.push_str(&format!(", next {} (expires {})", remaining, expires));
    }
    if summary.expired > 0 {
        s.push_str(&format!(", {} expired", summary.expired));
    }
    s
}

pub fn render_json(snapshot: &Snapshot, now_ms: i64) -> Result<String> {
    let rows = rows(snapshot, now_ms);
    Ok(serde_json::to_string_pretty(&rows).map_err(StoreError::Serialize)?)
}
