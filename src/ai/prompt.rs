use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::llm::ChatMessage;

pub const TASK_PARSER_TEMPERATURE: f32 = 0.0;
pub const TASK_PARSER_MAX_TOKENS: u32 = 400;

pub const SUGGESTION_TEMPERATURE: f32 = 0.7;
pub const SUGGESTION_MAX_TOKENS: u32 = 500;

/// Build the two-message prompt for natural-language task parsing.
///
/// The system message anchors relative phrases ("today", "tomorrow", "in 2
/// days") to concrete instants and fully specifies the output schema, so the
/// low-temperature completion has no degrees of freedom left.
pub fn task_parser_messages(now: DateTime<Utc>, user_text: &str) -> Vec<ChatMessage> {
    let now_iso = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let tomorrow_iso = (now + Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let system = format!(
        r#"You are a task parser. The current date/time is {now_iso} and tomorrow is {tomorrow_iso}.
Convert the user's input into ONLY valid JSON matching this schema:
{{
    "task_group": "Work" | "Personal" | "Health" | "Finance" | "Other",
    "project_name": "short project name (1-3 words)",
    "description": "task description",
    "start_date": "ISO8601 datetime (e.g. {now_iso})",
    "end_date": "ISO8601 datetime"
}}

Rules:
- Resolve relative dates ("today", "tomorrow", "in 2 days", "next week") against the current date/time above.
- If no date is provided, set start_date = 09:00 today and end_date = start_date + 2 hours.
- If only one date/time is provided, treat it as start_date and set end_date = start_date + 2 hours.
- Always emit UTC datetimes with a Z suffix.
- Output ONLY valid JSON (no markdown fences, no explanatory text)."#
    );

    vec![ChatMessage::system(system), ChatMessage::user(user_text)]
}

/// Build the prompt for interest-driven task suggestions.
pub fn suggestion_messages(interests: &[String]) -> Vec<ChatMessage> {
    let interests_text = interests.join(", ");

    let system = format!(
        r#"Generate 5 practical daily tasks based on these interests: {interests_text}

Return ONLY this exact JSON format (no extra text or markdown):
[
    {{"title": "Task 1", "category": "Work", "description": "Do this task"}},
    {{"title": "Task 2", "category": "Health", "description": "Do this task"}},
    {{"title": "Task 3", "category": "Personal", "description": "Do this task"}},
    {{"title": "Task 4", "category": "Finance", "description": "Do this task"}},
    {{"title": "Task 5", "category": "Other", "description": "Do this task"}}
]"#
    );

    vec![ChatMessage::system(system), ChatMessage::user("Generate 5 tasks")]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn task_parser_prompt_anchors_now_and_tomorrow() {
        let now = at("2025-11-22T10:30:00Z");
        let messages = task_parser_messages(now, "call the dentist tomorrow");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("2025-11-22T10:30:00Z"));
        assert!(messages[0].content.contains("2025-11-23T10:30:00Z"));
        assert!(messages[0].content.contains("\"task_group\""));
        assert!(messages[0].content.contains("\"end_date\""));
    }

    #[test]
    fn task_parser_prompt_passes_user_text_unmodified() {
        let now = at("2025-11-22T10:30:00Z");
        let raw = "  Create task for client tomorrow 5pm for Marketing project  ";
        let messages = task_parser_messages(now, raw);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, raw);
    }

    #[test]
    fn suggestion_prompt_embeds_interests() {
        let interests = vec!["cycling".to_string(), "cooking".to_string()];
        let messages = suggestion_messages(&interests);
        assert!(messages[0].content.contains("cycling, cooking"));
        assert_eq!(messages[1].content, "Generate 5 tasks");
    }
}
