use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::error::{ExtractError, Result};

/// Represents a city with its country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub name: String,
    pub country: String,
}

/// Collection of cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cities {
    pub cities: Vec<City>,
}

/// Represents a pet with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pet {
    pub name: String,
    pub animal: String,
    #[serde(deserialize_with = "whole_number")]
    #[schemars(with = "u32")]
    pub age: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub favorite_toy: Option<String>,
}

/// Collection of pets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

/// JSON-Schema counts `5.0` as an integer, so integral floats are accepted too.
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    let whole = match (number.as_u64(), number.as_f64()) {
        (Some(n), _) => Some(n),
        (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u64),
        _ => None,
    };

    whole
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            D::Error::custom(format!(
                "expected a whole number between 0 and {}, got {}",
                u32::MAX,
                number
            ))
        })
}

/// A named JSON-Schema document describing the expected model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn for_type<T: JsonSchema>() -> Result<Self> {
        Ok(Self {
            name: T::schema_name().into_owned(),
            schema: json_schema_for::<T>()?,
        })
    }
}

/// Generate the JSON-Schema document for a record shape
pub fn json_schema_for<T: JsonSchema>() -> Result<Value> {
    let schema = schemars::schema_for!(T);
    let value = serde_json::to_value(&schema)
        .map_err(|e| ExtractError::Schema(e.to_string()))?;

    if !value.is_object() {
        return Err(ExtractError::Schema(format!(
            "schema for {} is not an object",
            T::schema_name()
        )));
    }

    Ok(value)
}
