//! Prompt for the travel agent
//!
//! The conversation is laid out as system instruction, user input, then the
//! scratchpad of assistant tool calls and tool responses.

use crate::llm::ChatMessage;

const SYSTEM_PROMPT: &str = r#"You are an intelligent Travel Assistant.
Given a user's destination, ALWAYS do the following:
1) Call get_weather to fetch the current weather and the multi-day forecast.
2) Call search_attractions to fetch top attractions for the city.

Then synthesize a friendly, concise answer that takes into account the weather and attractions.
Use the weather data to suggest appropriate clothing or activities.
If the weather is bad, suggest indoor attractions. Give 3-5 top attractions with brief notes.

Keep it practical and avoid redundant chatter."#;

const USER_TEMPLATE: &str =
    "Destination: {destination}. Please provide the weather and a list of top attractions with brief notes.";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
    user_template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT, USER_TEMPLATE)
    }
}

impl PromptTemplate {
    /// `user_template` may contain a `{destination}` placeholder
    pub fn new(system: impl Into<String>, user_template: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user_template: user_template.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system
    }

    pub fn render_input(&self, destination: &str) -> String {
        self.user_template.replace("{destination}", destination)
    }

    /// Conversation prefix; the scratchpad grows after these messages
    pub fn initial_messages(&self, input: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::system(&self.system), ChatMessage::user(input)]
    }

    pub fn reminder(missing_tools: &[String]) -> String {
        format!(
            "Before answering you must call these tools: {}. Call them now, then write the final answer.",
            missing_tools.join(", ")
        )
    }
}
