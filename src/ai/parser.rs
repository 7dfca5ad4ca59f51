use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::ai::dates::resolve_dates;
use crate::ai::extract::extract_object;
use crate::ai::prompt::{TASK_PARSER_MAX_TOKENS, TASK_PARSER_TEMPERATURE, task_parser_messages};
use crate::llm::{CompletionClient, CompletionError};
use crate::model::TaskGroup;

pub const DEFAULT_PROJECT_NAME: &str = "General";

/// Failures of one `parse_task` call. All-or-nothing: no partial draft is
/// ever produced, and nothing is retried internally.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("could not interpret model output as JSON")]
    Extraction,

    #[error("model output did not match the task schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// The raw decoded model reply. All five fields are required; a missing or
/// mistyped one fails the decode rather than producing a partial record.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTaskResponse {
    pub task_group: String,
    pub project_name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

/// A fully normalized task, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub group: TaskGroup,
    pub project_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Turns free-form text into a [`TaskDraft`] via the completion endpoint.
#[derive(Debug, Clone)]
pub struct TaskParser {
    client: CompletionClient,
    model: String,
    default_group: TaskGroup,
}

impl TaskParser {
    pub fn new(client: CompletionClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            default_group: TaskGroup::Work,
        }
    }

    #[allow(dead_code)]
    pub fn with_default_group(mut self, group: TaskGroup) -> Self {
        self.default_group = group;
        self
    }

    /// Parse `text` into a task draft, resolving relative dates against `now`.
    pub async fn parse_task(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<TaskDraft, ParseError> {
        let messages = task_parser_messages(now, text);
        let content = self
            .client
            .complete(
                &self.model,
                messages,
                TASK_PARSER_TEMPERATURE,
                TASK_PARSER_MAX_TOKENS,
            )
            .await?;
        debug!(target: "ai", content=%content, "task parser raw model output");

        // Extract the JSON object in case the model wrapped it in fences or
        // prose; when extraction finds nothing, the whole reply may itself be
        // clean JSON, so try decoding it directly before giving up.
        let parsed: ParsedTaskResponse = match extract_object(&content) {
            Some(json) => serde_json::from_str(json)?,
            None => serde_json::from_str(content.trim()).map_err(|_| ParseError::Extraction)?,
        };

        let group = TaskGroup::normalize(&parsed.task_group, self.default_group);
        let project_name = if parsed.project_name.trim().is_empty() {
            DEFAULT_PROJECT_NAME.to_string()
        } else {
            parsed.project_name
        };
        let (start_date, end_date) = resolve_dates(&parsed.start_date, &parsed.end_date, now);

        Ok(TaskDraft {
            group,
            project_name,
            description: parsed.description,
            start_date,
            end_date,
        })
    }
}
