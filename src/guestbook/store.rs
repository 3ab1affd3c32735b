use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::{TwibbonError, TwibbonResult};

/// A stored guestbook message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// Sender name.
    pub name: String,
    /// Message body.
    pub message: String,
    /// Creation time (RFC 3339 on the wire).
    pub created_at: DateTime<Utc>,
    /// Soft-deletion flag; deleted messages are never listed or counted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Sender address as seen by the server.
    #[serde(default)]
    pub sender_ip: String,
    /// Sender user agent.
    #[serde(default)]
    pub user_agent: String,
}

/// Fields supplied when inserting a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessageRecord {
    pub name: String,
    pub message: String,
    pub sender_ip: String,
    pub user_agent: String,
}

/// Message persistence collaborator.
pub trait MessageStore {
    /// Non-deleted messages, newest first, `page_size` per page, 0-based `page`.
    fn list(&self, page: u32, page_size: u32) -> TwibbonResult<Vec<MessageRecord>>;
    /// Number of non-deleted messages.
    fn count(&self) -> TwibbonResult<u64>;
    /// Persist a message and return the stored record.
    fn insert(&mut self, msg: NewMessageRecord) -> TwibbonResult<MessageRecord>;
}

/// In-memory [`MessageStore`] with JSON snapshot persistence.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MemoryMessageStore {
    next_id: u64,
    records: Vec<MessageRecord>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time.
    pub fn insert_at(
        &mut self,
        msg: NewMessageRecord,
        created_at: DateTime<Utc>,
    ) -> MessageRecord {
        self.next_id += 1;
        let record = MessageRecord {
            id: self.next_id,
            name: msg.name,
            message: msg.message,
            created_at,
            is_deleted: false,
            sender_ip: msg.sender_ip,
            user_agent: msg.user_agent,
        };
        self.records.push(record.clone());
        record
    }

    /// Soft-delete a message. Returns `NotFound` for unknown or already deleted ids.
    pub fn delete(&mut self, id: u64) -> TwibbonResult<()> {
        let rec = self
            .records
            .iter_mut()
            .find(|r| r.id == id && !r.is_deleted)
            .ok_or_else(|| TwibbonError::not_found(format!("message {id}")))?;
        rec.is_deleted = true;
        Ok(())
    }

    /// Write a JSON snapshot.
    pub fn save_json(&self, path: &Path) -> TwibbonResult<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| TwibbonError::serde(e.to_string()))?;
        std::fs::write(path, json)
            .with_context(|| format!("write message store '{}'", path.display()))?;
        Ok(())
    }

    /// Load a JSON snapshot written by [`MemoryMessageStore::save_json`].
    pub fn load_json(path: &Path) -> TwibbonResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read message store '{}'", path.display()))?;
        let mut store: Self =
            serde_json::from_str(&text).map_err(|e| TwibbonError::serde(e.to_string()))?;
        let max_id = store.records.iter().map(|r| r.id).max().unwrap_or(0);
        store.next_id = store.next_id.max(max_id);
        Ok(store)
    }

    fn visible_newest_first(&self) -> Vec<&MessageRecord> {
        let mut visible: Vec<&MessageRecord> =
            self.records.iter().filter(|r| !r.is_deleted).collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        visible
    }
}

impl MessageStore for MemoryMessageStore {
    fn list(&self, page: u32, page_size: u32) -> TwibbonResult<Vec<MessageRecord>> {
        if page_size == 0 {
            return Err(TwibbonError::validation("page_size must be > 0"));
        }
        let skip = (page as usize).saturating_mul(page_size as usize);
        Ok(self
            .visible_newest_first()
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    fn count(&self) -> TwibbonResult<u64> {
        Ok(self.records.iter().filter(|r| !r.is_deleted).count() as u64)
    }

    fn insert(&mut self, msg: NewMessageRecord) -> TwibbonResult<MessageRecord> {
        Ok(self.insert_at(msg, Utc::now()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guestbook/store.rs"]
mod tests;
