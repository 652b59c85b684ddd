use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ExtractError, Result};
use crate::schema::json_schema_for;

/// Parse model output text as JSON. No cleanup is applied to the text.
pub fn parse_response(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(ExtractError::Parse)
}

/// Validate a JSON value against a JSON-Schema, collecting every violation
pub fn validate_value(schema: &Value, instance: &Value) -> Result<()> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| ExtractError::Schema(format!("Invalid JSON Schema: {}", e)))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|err| {
            let path = err.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            format!("{} at {}", err, path)
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::Validation { errors })
    }
}

/// Parse, validate and deserialize model output into a typed record
pub fn parse_and_validate<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let value = parse_response(text)?;
    let schema = json_schema_for::<T>()?;
    validate_value(&schema, &value)?;

    serde_path_to_error::deserialize(value).map_err(|e| ExtractError::Validation {
        errors: vec![format!("{} at {}", e.inner(), json_pointer(e.path()))],
    })
}

/// Render a serde path the same way `jsonschema` renders instance paths
fn json_pointer(path: &serde_path_to_error::Path) -> String {
    use serde_path_to_error::Segment;

    let pointer: String = path
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.replace('~', "~0").replace('/', "~1")),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .map(|token| format!("/{}", token))
        .collect();

    if pointer.is_empty() { "/".to_string() } else { pointer }
}
