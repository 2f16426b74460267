//! Lenient deserialization helpers.
//!
//! Backend payloads are not always consistently typed: decimal columns arrive
//! as strings, counts may be quoted, and unset optional text is sometimes an
//! empty string rather than `null`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Float(f64),
    Text(String),
}

/// Deserializes a non-negative count from a number or a numeric string.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Int(n) => Ok(n),
        NumberRepr::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        NumberRepr::Float(f) => Err(serde::de::Error::custom(format!("invalid count {}", f))),
        NumberRepr::Text(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom),
    }
}

/// Like [`deserialize_count`], treating `null` and empty strings as `None`.
pub fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<NumberRepr> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(NumberRepr::Int(n)) => Ok(Some(n)),
        Some(NumberRepr::Float(f)) if f >= 0.0 && f.fract() == 0.0 => Ok(Some(f as u64)),
        Some(NumberRepr::Float(f)) => {
            Err(serde::de::Error::custom(format!("invalid count {}", f)))
        }
        Some(NumberRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberRepr::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Deserializes an `f64` from a number or a numeric string.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Int(n) => Ok(n as f64),
        NumberRepr::Float(f) => Ok(f),
        NumberRepr::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Like [`deserialize_decimal`], treating `null` and empty strings as `None`.
pub fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<NumberRepr> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(NumberRepr::Int(n)) => Ok(Some(n as f64)),
        Some(NumberRepr::Float(f)) => Ok(Some(f)),
        Some(NumberRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberRepr::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Deserializes optional text, mapping empty strings to `None`.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
