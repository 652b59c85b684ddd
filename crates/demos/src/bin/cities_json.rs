use std::process::ExitCode;

use extract::{Cities, Extractor, OpenAiCompatClient, prompt};

/// Cities through the OpenAI-compatible endpoint in JSON mode: the schema rides
/// in a system message and the request only asks for a JSON object.
#[tokio::main]
async fn main() -> ExitCode {
    demos::run(async {
        Extractor::new(OpenAiCompatClient::default()?)
            .extract_json_mode::<Cities>(&prompt::cities_messages())
            .await
    })
    .await
}
