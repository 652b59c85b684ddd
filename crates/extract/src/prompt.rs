use crate::error::{ExtractError, Result};
use crate::llm::ChatMessage;
use crate::schema::OutputSchema;

pub const CITIES_PROMPT: &str = "List 5 cities from around the world and their countries";

pub const PETS_PROMPT: &str = r#"
I have two pets.
A cat named Luna who is 5 years old and loves playing with yarn. She has grey fur.
I also have a 2 year old black cat named Loki who loves tennis balls.
"#;

pub fn cities_messages() -> Vec<ChatMessage> {
    vec![ChatMessage::user(CITIES_PROMPT)]
}

pub fn pets_messages() -> Vec<ChatMessage> {
    vec![ChatMessage::user(PETS_PROMPT)]
}

/// System message for JSON mode, where the schema travels in the prompt
/// instead of the request's format field.
pub fn json_mode_instruction(output: &OutputSchema) -> Result<ChatMessage> {
    let schema = serde_json::to_string_pretty(&output.schema)
        .map_err(|e| ExtractError::Schema(e.to_string()))?;

    Ok(ChatMessage::system(format!(
        "As a genius expert, your task is to understand the content and provide \
         the parsed objects in json that match the following json_schema:\n\n\
         {}\n\n\
         Make sure to return an instance of the JSON, not the schema itself",
        schema
    )))
}
