pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod validate;

pub use config::ClientConfig;
pub use error::{ExtractError, FailureKind, Result};
pub use llm::{ChatClient, ChatMessage, OllamaClient, OpenAiCompatClient, ResponseFormat, Role};
pub use schema::{Cities, City, OutputSchema, Pet, PetList};
pub use validate::{parse_and_validate, parse_response, validate_value};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::info;

pub struct Extractor<C> {
    llm_client: C,
}

impl<C: ChatClient> Extractor<C> {
    pub fn new(llm_client: C) -> Self {
        Self { llm_client }
    }

    /// Ask the model for a record of shape `T` and validate what comes back.
    /// Exactly one model call is made; any failure is returned as-is.
    pub async fn extract<T>(&self, messages: &[ChatMessage]) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let output = OutputSchema::for_type::<T>()?;
        let schema_name = output.name.clone();

        self.complete(messages, &ResponseFormat::Schema(output), &schema_name)
            .await
    }

    /// Same as [`Extractor::extract`], but the schema is described in a leading
    /// system message and the request only asks for JSON output.
    pub async fn extract_json_mode<T>(&self, messages: &[ChatMessage]) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let output = OutputSchema::for_type::<T>()?;

        let mut with_schema = Vec::with_capacity(messages.len() + 1);
        with_schema.push(prompt::json_mode_instruction(&output)?);
        with_schema.extend_from_slice(messages);

        self.complete(&with_schema, &ResponseFormat::Json, &output.name)
            .await
    }

    async fn complete<T>(
        &self,
        messages: &[ChatMessage],
        format: &ResponseFormat,
        schema_name: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let text = self.llm_client.chat(messages, format).await?;
        let record = parse_and_validate::<T>(&text)?;

        info!(
            model = self.llm_client.model(),
            schema = schema_name,
            "Validated structured response"
        );

        Ok(record)
    }

    pub fn client(&self) -> &C {
        &self.llm_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedClient {
        reply: std::result::Result<String, u16>,
        seen: Mutex<Vec<ResponseFormat>>,
    }

    impl CannedClient {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        fn model(&self) -> &str {
            "canned"
        }

        async fn chat(&self, _messages: &[ChatMessage], format: &ResponseFormat) -> Result<String> {
            self.seen.lock().unwrap().push(format.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ExtractError::Status {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_extract_passes_schema_and_validates() {
        let client = CannedClient::replying(r#"{"cities":[{"name":"Tokyo","country":"Japan"}]}"#);
        let extractor = Extractor::new(client);

        let cities: Cities = extractor.extract(&prompt::cities_messages()).await.unwrap();
        assert_eq!(cities.cities[0].name, "Tokyo");

        let seen = extractor.client().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            ResponseFormat::Schema(output) => {
                assert_eq!(output.name, "Cities");
                assert_eq!(output.schema, schema::json_schema_for::<Cities>().unwrap());
            }
            other => panic!("expected schema format, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_mode_prepends_schema_message() {
        let client = CannedClient::replying(r#"{"cities":[{"name":"Lima","country":"Peru"}]}"#);
        let extractor = Extractor::new(client);

        let cities: Cities = extractor
            .extract_json_mode(&prompt::cities_messages())
            .await
            .unwrap();
        assert_eq!(cities.cities[0].country, "Peru");

        let seen = extractor.client().seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[ResponseFormat::Json]);
    }

    #[tokio::test]
    async fn test_extract_propagates_service_error() {
        let client = CannedClient {
            reply: Err(503),
            seen: Mutex::new(Vec::new()),
        };
        let extractor = Extractor::new(client);

        let err = extractor
            .extract::<PetList>(&prompt::pets_messages())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Service);
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_shape() {
        let extractor = Extractor::new(CannedClient::replying(r#"{"pets":[{"name":"Luna"}]}"#));

        let err = extractor
            .extract::<PetList>(&prompt::pets_messages())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
    }
}
