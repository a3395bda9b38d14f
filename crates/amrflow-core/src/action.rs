use crate::types::ActionType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ConfigValue
// ---------------------------------------------------------------------------

/// A single configuration value: text, number, or flag.
///
/// Variant order matters for untagged deserialization: booleans and
/// numbers must be tried before the string fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Truthiness as the validity predicates define it: non-empty text,
    /// non-zero finite number, or `true`. A present `false` is falsy but
    /// still *defined*; see `registry::Requirement::Defined`.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Number(n) => *n != 0.0 && n.is_finite(),
            ConfigValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse a CLI-supplied literal: `true`/`false` and numbers become
    /// typed values, everything else stays text.
    pub fn parse(raw: &str) -> ConfigValue {
        match raw {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => match raw.parse::<f64>() {
                Ok(n) => ConfigValue::Number(n),
                Err(_) => ConfigValue::Text(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

/// Per-action configuration, keyed by schema field name. A BTreeMap keeps
/// serialized output deterministic.
pub type ActionConfig = BTreeMap<String, ConfigValue>;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One configured step in a task's execution sequence.
///
/// The id is assigned at creation and stays stable across reordering; the
/// config shape is only meaningful relative to the action type's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub config: ActionConfig,
}

impl Action {
    /// Create an action with a fresh unique id and empty configuration.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            id: format!("action-{}", Uuid::new_v4()),
            action_type,
            config: ActionConfig::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.config.insert(key.into(), value.into());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(ConfigValue::from("Loading Bay").is_truthy());
        assert!(!ConfigValue::from("").is_truthy());
        assert!(ConfigValue::from(1.5).is_truthy());
        assert!(!ConfigValue::from(0.0).is_truthy());
        assert!(!ConfigValue::Number(f64::NAN).is_truthy());
        assert!(ConfigValue::from(true).is_truthy());
        assert!(!ConfigValue::from(false).is_truthy());
    }

    #[test]
    fn untagged_value_roundtrip() {
        let json = r#"{"location":"Loading Bay","speed":10,"hitch":false}"#;
        let config: ActionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config["location"], ConfigValue::from("Loading Bay"));
        assert_eq!(config["speed"], ConfigValue::from(10.0));
        assert_eq!(config["hitch"], ConfigValue::from(false));
    }

    #[test]
    fn parse_literal() {
        assert_eq!(ConfigValue::parse("true"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::parse("false"), ConfigValue::Bool(false));
        assert_eq!(ConfigValue::parse("-0.7"), ConfigValue::Number(-0.7));
        assert_eq!(
            ConfigValue::parse("Charging Station"),
            ConfigValue::Text("Charging Station".to_string())
        );
    }

    #[test]
    fn new_action_has_unique_id_and_empty_config() {
        let a = Action::new(ActionType::Move);
        let b = Action::new(ActionType::Move);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("action-"));
        assert!(a.config.is_empty());
    }

    #[test]
    fn action_serializes_type_tag() {
        let action = Action::new(ActionType::WaitForTrigger);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "WAIT FOR TRIGGER");
    }
}
