//! Transport-neutral operation parameters.
//!
//! The web facade hands over query strings, the tool facade hands over JSON
//! arguments. Both become a [`Params`] map, and every accessor accepts either
//! representation: integers may arrive as JSON numbers or numeric strings,
//! structured inputs as JSON objects or strings containing one.

use crate::error::GatewayError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Named parameters for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters from a JSON arguments object.
    #[must_use]
    pub const fn from_object(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Parameters from string pairs, e.g. a query string or path captures.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Add or replace one parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Merge `other` into `self`; `other` wins on conflicts.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    fn present(&self, name: &str) -> Option<&Value> {
        match self.0.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    /// A text parameter that must be present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns a validation error when missing, empty, or not text.
    pub fn required_text(&self, name: &str) -> Result<String, GatewayError> {
        self.present(name)
            .ok_or_else(|| GatewayError::validation(name, "is required"))
            .and_then(|value| text(name, value))
    }

    /// A string parameter taken verbatim; empty and blank values are kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error when missing or not a JSON string.
    pub fn raw_text(&self, name: &str) -> Result<String, GatewayError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Err(GatewayError::validation(name, "is required")),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(GatewayError::validation(name, "must be a string")),
        }
    }

    /// A text parameter defaulting to the empty string.
    ///
    /// # Errors
    ///
    /// Returns a validation error when present but not text.
    pub fn text(&self, name: &str) -> Result<String, GatewayError> {
        self.present(name)
            .map_or_else(|| Ok(String::new()), |value| text(name, value))
    }

    /// An integer parameter with a default.
    ///
    /// # Errors
    ///
    /// Returns a validation error when present but not an integer.
    pub fn integer(&self, name: &str, default: i64) -> Result<i64, GatewayError> {
        let Some(value) = self.present(name) else {
            return Ok(default);
        };
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| GatewayError::validation(name, "must be an integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| GatewayError::validation(name, format!("'{s}' is not an integer"))),
            _ => Err(GatewayError::validation(name, "must be an integer")),
        }
    }

    /// An integer parameter that must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns a validation error when not an integer or below 1.
    pub fn positive(&self, name: &str, default: u32) -> Result<u32, GatewayError> {
        let value = self.integer(name, i64::from(default))?;
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| GatewayError::validation(name, "must be at least 1"))
    }

    /// An integer parameter that must be zero or more.
    ///
    /// # Errors
    ///
    /// Returns a validation error when not an integer or negative.
    pub fn non_negative(&self, name: &str, default: u32) -> Result<u32, GatewayError> {
        let value = self.integer(name, i64::from(default))?;
        u32::try_from(value).map_err(|_| GatewayError::validation(name, "must not be negative"))
    }

    /// A structured input, decoded from an object or a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed JSON or the wrong shape. A
    /// malformed blob is never forwarded.
    pub fn structured<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, GatewayError> {
        let Some(value) = self.present(name) else {
            return Ok(None);
        };
        let decoded = match value {
            Value::String(s) => serde_json::from_str::<Value>(s)
                .map_err(|e| GatewayError::validation(name, format!("malformed JSON: {e}")))?,
            other => other.clone(),
        };
        if !decoded.is_object() {
            return Err(GatewayError::validation(name, "must be a JSON object"));
        }
        serde_json::from_value(decoded)
            .map(Some)
            .map_err(|e| GatewayError::validation(name, e.to_string()))
    }
}

fn text(name: &str, value: &Value) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(GatewayError::validation(name, "must be a string")),
    }
}
