//! Serde helpers for numeric form fields.
//!
//! Browser forms submit numbers as strings (`"age": "34"`), so numeric
//! inputs accept either a JSON number or a numeric string. An empty string
//! is treated as absent.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

pub(crate) fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Int(n)) => Ok(Some(n)),
        Some(NumberOrString::Float(f)) if f.fract() == 0.0 => Ok(Some(f as i64)),
        Some(NumberOrString::Float(f)) => {
            Err(de::Error::custom(format!("expected a whole number, got {}", f)))
        }
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a whole number, got {:?}", s))),
    }
}

pub(crate) fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Int(n)) => Ok(Some(n as f64)),
        Some(NumberOrString::Float(f)) => Ok(Some(f)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s))),
    }
}

/// A list of names where `null` (for the list or an entry) reads as empty.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "optional_i64")]
        age: Option<i64>,
        #[serde(default, deserialize_with = "optional_f64")]
        amount: Option<f64>,
    }

    #[derive(Deserialize)]
    struct Names {
        #[serde(default, deserialize_with = "string_list")]
        names: Vec<String>,
    }

    #[test]
    fn test_string_list_nulls() {
        let names: Names = serde_json::from_str(r#"{"names": ["a", null, "b"]}"#).unwrap();
        assert_eq!(names.names, vec!["a", "", "b"]);

        let names: Names = serde_json::from_str(r#"{"names": null}"#).unwrap();
        assert!(names.names.is_empty());

        let names: Names = serde_json::from_str("{}").unwrap();
        assert!(names.names.is_empty());
    }

    #[test]
    fn test_numbers_and_strings() {
        let form: Form = serde_json::from_str(r#"{"age": 34, "amount": "1500.50"}"#).unwrap();
        assert_eq!(form.age, Some(34));
        assert_eq!(form.amount, Some(1500.5));

        let form: Form = serde_json::from_str(r#"{"age": "34", "amount": 200}"#).unwrap();
        assert_eq!(form.age, Some(34));
        assert_eq!(form.amount, Some(200.0));
    }

    #[test]
    fn test_empty_and_missing() {
        let form: Form = serde_json::from_str(r#"{"age": "", "amount": null}"#).unwrap();
        assert_eq!(form.age, None);
        assert_eq!(form.amount, None);

        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.age, None);
        assert_eq!(form.amount, None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(serde_json::from_str::<Form>(r#"{"age": "old"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"amount": "lots"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"age": 3.5}"#).is_err());
    }
}
