use serde::Deserialize;
use tracing::debug;

use crate::ai::extract::extract_array;
use crate::ai::parser::ParseError;
use crate::ai::prompt::{SUGGESTION_MAX_TOKENS, SUGGESTION_TEMPERATURE, suggestion_messages};
use crate::llm::CompletionClient;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestedTask {
    pub title: String,
    pub category: String,
    pub description: String,
}

/// Generates daily-task suggestions from a user's interest list. Same
/// completion client and extraction scheme as the task parser, with an
/// array-shaped payload and a higher temperature.
#[derive(Debug, Clone)]
pub struct SuggestionService {
    client: CompletionClient,
    model: String,
}

impl SuggestionService {
    pub fn new(client: CompletionClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn generate(&self, interests: &[String]) -> Result<Vec<SuggestedTask>, ParseError> {
        let messages = suggestion_messages(interests);
        let content = self
            .client
            .complete(
                &self.model,
                messages,
                SUGGESTION_TEMPERATURE,
                SUGGESTION_MAX_TOKENS,
            )
            .await?;
        debug!(target: "ai", content=%content, "suggestion raw model output");

        let json = extract_array(&content).ok_or(ParseError::Extraction)?;
        let mut suggestions: Vec<SuggestedTask> = serde_json::from_str(json)?;
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }
}
