//! Lenient deserializers for query-string input.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Deserializes an integer sent either as a number or as a string.
///
/// A missing value or an empty string becomes `0`, so callers can apply
/// their own defaults afterwards.
pub fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(NumberOrText::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_lenient_i64")]
        value: i64,
    }

    fn parse(json: &str) -> Result<i64, serde_json::Error> {
        serde_json::from_str::<Query>(json).map(|q| q.value)
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        assert_eq!(parse(r#"{"value":12}"#).unwrap(), 12);
        assert_eq!(parse(r#"{"value":"-3"}"#).unwrap(), -3);
    }

    #[test]
    fn test_empty_values_become_zero() {
        assert_eq!(parse(r#"{"value":""}"#).unwrap(), 0);
        assert_eq!(parse(r#"{"value":null}"#).unwrap(), 0);
        assert_eq!(parse(r#"{}"#).unwrap(), 0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse(r#"{"value":"ten"}"#).is_err());
    }
}
