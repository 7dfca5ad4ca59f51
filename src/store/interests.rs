use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::store::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRecord {
    pub user_id: String,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user interest lists, persisted as a single JSON file keyed by user id.
/// Feeds the suggestion prompt.
#[derive(Debug, Clone)]
pub struct InterestStore {
    path: PathBuf,
}

impl InterestStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            error!(?e, "Failed to create interest store directory: {:?}", root);
            StoreError::CreateDirError(e)
        })?;
        Ok(Self {
            path: root.join("interests.json"),
        })
    }

    fn read_all(&self) -> Result<HashMap<String, InterestRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let s = fs::read_to_string(&self.path).map_err(StoreError::ReadError)?;
        Ok(serde_json::from_str(&s)?)
    }

    fn write_all(&self, records: &HashMap<String, InterestRecord>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(StoreError::WriteError)
    }

    /// Create or update the interest list for `user_id`, stamping `updated_at`.
    pub fn save(&self, user_id: &str, interests: Vec<String>) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        let now = Utc::now();
        records
            .entry(user_id.to_string())
            .and_modify(|r| {
                r.interests = interests.clone();
                r.updated_at = now;
            })
            .or_insert_with(|| InterestRecord {
                user_id: user_id.to_string(),
                interests,
                created_at: now,
                updated_at: now,
            });
        self.write_all(&records)
    }

    /// Interest list for `user_id`; empty when none was ever saved.
    pub fn get(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let records = self.read_all()?;
        Ok(records
            .get(user_id)
            .map(|r| r.interests.clone())
            .unwrap_or_default())
    }

    pub fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        if records.remove(user_id).is_some() {
            self.write_all(&records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = InterestStore::new(dir.path()).unwrap();

        store
            .save("user-1", vec!["cycling".into(), "cooking".into()])
            .unwrap();
        assert_eq!(store.get("user-1").unwrap(), vec!["cycling", "cooking"]);
    }

    #[test]
    fn get_unknown_user_is_empty() {
        let dir = tempdir().unwrap();
        let store = InterestStore::new(dir.path()).unwrap();
        assert!(store.get("nobody").unwrap().is_empty());
    }

    #[test]
    fn save_twice_updates_in_place() {
        let dir = tempdir().unwrap();
        let store = InterestStore::new(dir.path()).unwrap();

        store.save("user-1", vec!["cycling".into()]).unwrap();
        store.save("user-1", vec!["reading".into()]).unwrap();
        assert_eq!(store.get("user-1").unwrap(), vec!["reading"]);
    }

    #[test]
    fn users_do_not_interfere() {
        let dir = tempdir().unwrap();
        let store = InterestStore::new(dir.path()).unwrap();

        store.save("a", vec!["x".into()]).unwrap();
        store.save("b", vec!["y".into()]).unwrap();
        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_empty());
        assert_eq!(store.get("b").unwrap(), vec!["y"]);
    }
}
