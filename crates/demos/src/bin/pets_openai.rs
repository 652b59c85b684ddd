use std::process::ExitCode;

use extract::{ClientConfig, Extractor, OpenAiCompatClient, PetList, prompt};

/// Same extraction as `pets`, through Ollama's OpenAI-compatible endpoint at temperature 0.
#[tokio::main]
async fn main() -> ExitCode {
    demos::run(async {
        let client = OpenAiCompatClient::new(ClientConfig::deterministic())?;
        Extractor::new(client)
            .extract::<PetList>(&prompt::pets_messages())
            .await
    })
    .await
}
