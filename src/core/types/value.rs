//! Preference value enum for handling the store's typed value model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the types of values the preference store accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PrefValue {
    /// Gets the value type enum for this value
    pub fn value_type(&self) -> ValueType {
        match self {
            PrefValue::Bool(_) => ValueType::Bool,
            PrefValue::Int(_) => ValueType::Int,
            PrefValue::Float(_) => ValueType::Float,
            PrefValue::String(_) => ValueType::String,
        }
    }

    /// Renders the value the way `defaults write` expects it on the command line
    pub fn to_arg(&self) -> String {
        match self {
            PrefValue::Bool(true) => "true".to_string(),
            PrefValue::Bool(false) => "false".to_string(),
            PrefValue::Int(v) => v.to_string(),
            PrefValue::Float(v) => v.to_string(),
            PrefValue::String(s) => s.clone(),
        }
    }

    /// Renders the value as an `on`/`off` switch, if it is a boolean
    pub fn as_switch(&self) -> Option<&'static str> {
        match self {
            PrefValue::Bool(true) => Some("on"),
            PrefValue::Bool(false) => Some("off"),
            _ => None,
        }
    }
}

/// Enum representing the type of a preference value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
}

impl ValueType {
    /// Type flag passed to `defaults write`
    pub fn defaults_flag(&self) -> &'static str {
        match self {
            ValueType::Bool => "-bool",
            ValueType::Int => "-int",
            ValueType::Float => "-float",
            ValueType::String => "-string",
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(v) => write!(f, "{}", v),
            PrefValue::Int(v) => write!(f, "{}", v),
            PrefValue::Float(v) => write!(f, "{}", v),
            PrefValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(v: bool) -> Self {
        PrefValue::Bool(v)
    }
}

impl From<i64> for PrefValue {
    fn from(v: i64) -> Self {
        PrefValue::Int(v)
    }
}

impl From<f64> for PrefValue {
    fn from(v: f64) -> Self {
        PrefValue::Float(v)
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        PrefValue::String(v.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(v: String) -> Self {
        PrefValue::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type() {
        assert_eq!(PrefValue::Bool(true).value_type(), ValueType::Bool);
        assert_eq!(PrefValue::Int(2).value_type(), ValueType::Int);
        assert_eq!(PrefValue::Float(0.5).value_type(), ValueType::Float);
        assert_eq!(PrefValue::from("png").value_type(), ValueType::String);
    }

    #[test]
    fn test_defaults_flags() {
        assert_eq!(ValueType::Bool.defaults_flag(), "-bool");
        assert_eq!(ValueType::Int.defaults_flag(), "-int");
        assert_eq!(ValueType::Float.defaults_flag(), "-float");
        assert_eq!(ValueType::String.defaults_flag(), "-string");
    }

    #[test]
    fn test_to_arg() {
        assert_eq!(PrefValue::Bool(false).to_arg(), "false");
        assert_eq!(PrefValue::Int(-1).to_arg(), "-1");
        assert_eq!(PrefValue::Float(0.1).to_arg(), "0.1");
        assert_eq!(PrefValue::from("clmv").to_arg(), "clmv");
    }

    #[test]
    fn test_as_switch() {
        assert_eq!(PrefValue::Bool(true).as_switch(), Some("on"));
        assert_eq!(PrefValue::Bool(false).as_switch(), Some("off"));
        assert_eq!(PrefValue::Int(1).as_switch(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PrefValue::Int(36).to_string(), "36");
        assert_eq!(PrefValue::from("Nlsv").to_string(), "\"Nlsv\"");
    }

    #[test]
    fn test_toml_shape() {
        #[derive(Deserialize)]
        struct Wrapper {
            value: PrefValue,
        }

        let parsed: Wrapper = toml::from_str(r#"value = { type = "int", value = 2 }"#).unwrap();
        assert_eq!(parsed.value, PrefValue::Int(2));

        let parsed: Wrapper =
            toml::from_str(r#"value = { type = "string", value = "png" }"#).unwrap();
        assert_eq!(parsed.value, PrefValue::from("png"));
    }
}
