//! Natural-language task pipeline: prompt construction, completion call,
//! JSON extraction, schema validation, and date resolution.

pub mod dates;
pub mod extract;
pub mod parser;
pub mod prompt;
pub mod suggest;

pub use parser::{DEFAULT_PROJECT_NAME, ParseError, ParsedTaskResponse, TaskDraft, TaskParser};
pub use suggest::{SuggestedTask, SuggestionService};
