use std::process::ExitCode;

use extract::{Extractor, OllamaClient, PetList, prompt};

#[tokio::main]
async fn main() -> ExitCode {
    demos::run(async {
        let extractor = Extractor::new(OllamaClient::default()?);
        extractor.extract::<PetList>(&prompt::pets_messages()).await
    })
    .await
}
