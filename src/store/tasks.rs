use std::fs;
use std::path::PathBuf;

use tracing::error;
use uuid::Uuid;

use crate::model::TodoTask;
use crate::store::error::StoreError;

/// File-backed task store: one JSON document per task id under `root`.
/// Queries load everything and filter in memory.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pub(crate) root: PathBuf,
}

impl TaskStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            error!(?e, "Failed to create task store directory: {:?}", root);
            StoreError::CreateDirError(e)
        })?;
        Ok(Self { root })
    }

    fn task_file(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Insert or overwrite a task record.
    pub fn save(&self, task: &TodoTask) -> Result<(), StoreError> {
        let path = self.task_file(task.id);
        let json = serde_json::to_string_pretty(task)?;
        fs::write(&path, &json).map_err(|e| {
            error!(?e, "Failed to write task to file: {:?}", path);
            StoreError::WriteError(e)
        })?;
        Ok(())
    }

    pub fn load(&self, id: Uuid) -> Result<TodoTask, StoreError> {
        let path = self.task_file(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        let s = fs::read_to_string(path).map_err(StoreError::ReadError)?;
        Ok(serde_json::from_str(&s)?)
    }

    /// Delete a task record. Deleting an absent id is not an error.
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let path = self.task_file(id);
        if path.exists() {
            fs::remove_file(path).map_err(StoreError::DeleteError)?;
        }
        Ok(())
    }

    /// All tasks, newest first. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<TodoTask>, StoreError> {
        let mut out = Vec::new();
        if !self.root.exists() {
            return Ok(out);
        }
        for entry in fs::read_dir(&self.root).map_err(StoreError::ReadError)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let p = entry.path();
            if p.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(s) = fs::read_to_string(&p)
                && let Ok(task) = serde_json::from_str::<TodoTask>(&s)
            {
                out.push(task);
            }
        }
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    /// Tasks matching `predicate`, newest first.
    pub fn query(&self, predicate: impl Fn(&TodoTask) -> bool) -> Result<Vec<TodoTask>, StoreError> {
        let mut tasks = self.list()?;
        tasks.retain(|t| predicate(t));
        Ok(tasks)
    }
}
