use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use extract::ExtractError;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    writeln!(out, "{}", json).context("Failed to write result")?;
    Ok(())
}

pub fn diagnostic(err: &ExtractError) -> String {
    format!("{}: {}", err.kind(), err)
}

/// Print the validated value on success, or a diagnostic naming the failure kind
pub fn report<T: Serialize>(outcome: extract::Result<T>) -> ExitCode {
    match outcome {
        Ok(value) => match write_json(&mut std::io::stdout().lock(), &value) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(kind = %e.kind(), error = %e, "Extraction failed");
            eprintln!("{}", diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

/// Shared entry point for the demo binaries
pub async fn run<T, F>(job: F) -> ExitCode
where
    T: Serialize,
    F: std::future::Future<Output = extract::Result<T>>,
{
    if let Err(e) = init_tracing() {
        eprintln!("Warning: {:#}", e);
    }

    report(job.await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Cities, City};

    #[test]
    fn test_write_json_is_pretty() {
        let cities = Cities {
            cities: vec![City {
                name: "Paris".to_string(),
                country: "France".to_string(),
            }],
        };

        let mut out = Vec::new();
        write_json(&mut out, &cities).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("{\n"));
        assert!(text.ends_with("}\n"));
        let back: Cities = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cities);
    }

    #[test]
    fn test_diagnostic_names_failure_kind() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(diagnostic(&ExtractError::Parse(parse)).starts_with("parse error: "));

        let validation = ExtractError::Validation {
            errors: vec!["\"country\" is a required property at /cities/0".to_string()],
        };
        assert_eq!(
            diagnostic(&validation),
            "validation error: response does not match schema: \"country\" is a required property at /cities/0"
        );

        assert!(diagnostic(&ExtractError::EmptyResponse).starts_with("service error: "));
    }

    #[test]
    fn test_report_exit_codes() {
        assert_eq!(report::<Cities>(Err(ExtractError::EmptyResponse)), ExitCode::FAILURE);
        assert_eq!(report(Ok(Cities { cities: vec![] })), ExitCode::SUCCESS);
    }
}
