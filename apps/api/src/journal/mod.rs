//! Dream journal: the storage collaborator behind the interpretation pipeline.
//!
//! Only the in-memory repository lives here; durable storage plugs in behind
//! `DreamRepository`. Interpretations are stored on the entry as a JSON string
//! (`InterpretationResult::to_stored_response`), while entries imported from
//! older clients may carry free-form prose in the same field.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::DreamEntry;

pub mod handlers;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Dream {0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait DreamRepository: Send + Sync {
    /// Stores a new entry, assigning an id and timestamp when absent.
    async fn create(&self, entry: DreamEntry) -> Result<DreamEntry, JournalError>;

    async fn get(&self, id: &str) -> Result<DreamEntry, JournalError>;

    /// Entries for one user, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<DreamEntry>, JournalError>;

    async fn set_response(&self, id: &str, response: String) -> Result<DreamEntry, JournalError>;
}

#[derive(Debug, Default)]
pub struct InMemoryDreamRepository {
    entries: RwLock<HashMap<String, DreamEntry>>,
}

impl InMemoryDreamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DreamRepository for InMemoryDreamRepository {
    async fn create(&self, mut entry: DreamEntry) -> Result<DreamEntry, JournalError> {
        if entry.id.trim().is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        entry.timestamp.get_or_insert_with(Utc::now);

        self.entries
            .write()
            .await
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: &str) -> Result<DreamEntry, JournalError> {
        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| JournalError::NotFound(id.to_string()))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<DreamEntry>, JournalError> {
        let mut entries: Vec<DreamEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn set_response(&self, id: &str, response: String) -> Result<DreamEntry, JournalError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
        entry.response = response;
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry_for(user_id: &str, text: &str) -> DreamEntry {
        DreamEntry {
            user_id: user_id.to_string(),
            ..DreamEntry::new(text)
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let repo = InMemoryDreamRepository::new();
        let created = repo.create(entry_for("u1", "a dream")).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(created.timestamp.is_some());
        assert_eq!(repo.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_keeps_caller_supplied_id() {
        let repo = InMemoryDreamRepository::new();
        let entry = DreamEntry {
            id: "dream_123".to_string(),
            ..entry_for("u1", "a dream")
        };
        let created = repo.create(entry).await.unwrap();
        assert_eq!(created.id, "dream_123");
    }

    #[tokio::test]
    async fn test_list_for_user_filters_and_orders_newest_first() {
        let repo = InMemoryDreamRepository::new();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            let entry = DreamEntry {
                timestamp: Some(base + Duration::days(i as i64)),
                ..entry_for("u1", text)
            };
            repo.create(entry).await.unwrap();
        }
        repo.create(entry_for("u2", "someone else")).await.unwrap();

        let listed = repo.list_for_user("u1").await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|e| e.dream_text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_set_response_updates_entry() {
        let repo = InMemoryDreamRepository::new();
        let created = repo.create(entry_for("u1", "a dream")).await.unwrap();
        let updated = repo
            .set_response(&created.id, "{\"summary\":\"s\"}".to_string())
            .await
            .unwrap();
        assert!(updated.is_interpreted());
        assert_eq!(repo.get(&created.id).await.unwrap().response, updated.response);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let repo = InMemoryDreamRepository::new();
        assert!(matches!(
            repo.get("missing").await,
            Err(JournalError::NotFound(id)) if id == "missing"
        ));
        assert!(repo.set_response("missing", String::new()).await.is_err());
    }
}
