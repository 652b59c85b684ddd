use std::process::ExitCode;

use extract::{Cities, Extractor, OllamaClient, prompt};

#[tokio::main]
async fn main() -> ExitCode {
    demos::run(async {
        let extractor = Extractor::new(OllamaClient::default()?);
        extractor.extract::<Cities>(&prompt::cities_messages()).await
    })
    .await
}
