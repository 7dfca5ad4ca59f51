use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::TaskDraft;

/// The five task categories the app knows about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskGroup {
    #[default]
    Work,
    Personal,
    Health,
    Finance,
    Other,
}

impl TaskGroup {
    pub const ALL: [TaskGroup; 5] = [
        TaskGroup::Work,
        TaskGroup::Personal,
        TaskGroup::Health,
        TaskGroup::Finance,
        TaskGroup::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskGroup::Work => "Work",
            TaskGroup::Personal => "Personal",
            TaskGroup::Health => "Health",
            TaskGroup::Finance => "Finance",
            TaskGroup::Other => "Other",
        }
    }

    /// Map free text from the model onto one of the five labels.
    /// Unrecognized or empty input falls back to `default`.
    pub fn normalize(text: &str, default: TaskGroup) -> TaskGroup {
        let trimmed = text.trim();
        Self::ALL
            .into_iter()
            .find(|g| trimmed.eq_ignore_ascii_case(g.as_str()))
            .unwrap_or(default)
    }
}

impl std::fmt::Display for TaskGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

/// A persisted task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoTask {
    pub id: Uuid,
    pub group: TaskGroup,
    pub project_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub status: CompletionStatus,
    /// Manually set progress percentage; 0 means "derive from elapsed time".
    pub progress: f64,
}

impl TodoTask {
    pub fn new(
        group: TaskGroup,
        project_name: impl Into<String>,
        description: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            project_name: project_name.into(),
            description: description.into(),
            start_date,
            end_date,
            completed: false,
            created_at: Utc::now(),
            status: CompletionStatus::Todo,
            progress: 0.0,
        }
    }

    /// Build a task from a parsed AI draft.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self::new(
            draft.group,
            draft.project_name,
            draft.description,
            draft.start_date,
            draft.end_date,
        )
    }

    /// Progress percentage: the manually set value when present, otherwise
    /// the share of the start..end window elapsed at `now`, clamped to 0-100.
    pub fn progress_percentage(&self, now: DateTime<Utc>) -> f64 {
        if self.progress > 0.0 {
            return self.progress;
        }
        let total = (self.end_date - self.start_date).num_seconds() as f64;
        if total <= 0.0 {
            return 0.0;
        }
        let elapsed = (now - self.start_date).num_seconds() as f64;
        (elapsed / total).clamp(0.0, 1.0) * 100.0
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && now > self.end_date
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == CompletionStatus::InProgress
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.status = CompletionStatus::Completed;
        self.progress = 100.0;
    }

    pub fn mark_in_progress(&mut self) {
        self.completed = false;
        self.status = CompletionStatus::InProgress;
        self.progress = self.progress.max(50.0);
    }

    pub fn mark_todo(&mut self) {
        self.completed = false;
        self.status = CompletionStatus::Todo;
        self.progress = 0.0;
    }

    pub fn toggle_completion(&mut self) {
        if self.completed {
            // back to to-do, but keep whatever manual progress was set
            self.completed = false;
            self.status = CompletionStatus::Todo;
        } else {
            self.mark_completed();
        }
    }

    pub fn update_progress(&mut self, percentage: f64) {
        self.progress = percentage.clamp(0.0, 100.0);
    }
}

/// Share of `tasks` that are completed, as a percentage. Zero when empty.
pub fn completion_rate(tasks: &[TodoTask]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    done as f64 / tasks.len() as f64 * 100.0
}
