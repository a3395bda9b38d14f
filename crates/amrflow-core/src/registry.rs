use crate::action::ActionConfig;
use crate::error::{AmrError, Result};
use crate::types::ActionType;

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Bool,
}

/// How a field participates in the validity predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must be present and truthy.
    Truthy,
    /// Must be present; `false` is a legitimate value. Only ReleaseTrigger's
    /// `state` uses this. Do not collapse it into `Truthy`.
    Defined,
    /// Exposed by the configuration surface but never checked.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
}

const fn field(key: &'static str, kind: FieldKind, requirement: Requirement) -> FieldSpec {
    FieldSpec {
        key,
        kind,
        requirement,
    }
}

/// Configuration schema for one action type.
#[derive(Debug, Clone, Copy)]
pub struct ConfigSchema {
    pub fields: &'static [FieldSpec],
}

impl ConfigSchema {
    pub fn required(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|f| !matches!(f.requirement, Requirement::Optional))
    }
}

// ---------------------------------------------------------------------------
// Static catalog
// ---------------------------------------------------------------------------

static MOVE: ConfigSchema = ConfigSchema {
    fields: &[field("location", FieldKind::Text, Requirement::Truthy)],
};

static EMPTY: ConfigSchema = ConfigSchema { fields: &[] };

static REVERSE: ConfigSchema = ConfigSchema {
    fields: &[
        field("name", FieldKind::Text, Requirement::Truthy),
        field("state", FieldKind::Text, Requirement::Truthy),
        field("presetName", FieldKind::Text, Requirement::Truthy),
        field("hitch", FieldKind::Text, Requirement::Truthy),
        field("y_threshold", FieldKind::Number, Requirement::Optional),
        field("x_threshold", FieldKind::Number, Requirement::Optional),
        field("ka_1", FieldKind::Number, Requirement::Optional),
        field("ka_2", FieldKind::Number, Requirement::Optional),
        field("kc", FieldKind::Number, Requirement::Optional),
        field("speed", FieldKind::Number, Requirement::Optional),
        field("angle_factor", FieldKind::Number, Requirement::Optional),
        field("zone", FieldKind::Number, Requirement::Optional),
        field("vehicle_latch_distance", FieldKind::Number, Requirement::Optional),
        field("latch_project_dist", FieldKind::Number, Requirement::Optional),
    ],
};

static WAIT_FOR_TRIGGER: ConfigSchema = ConfigSchema {
    fields: &[field("trigger_id", FieldKind::Text, Requirement::Truthy)],
};

// wait_time is surfaced by the config panel but deliberately not enforced;
// a WAIT with no duration is accepted as-is.
static WAIT_FOR_TIME: ConfigSchema = ConfigSchema {
    fields: &[field("wait_time", FieldKind::Number, Requirement::Optional)],
};

static RELEASE_TRIGGER: ConfigSchema = ConfigSchema {
    fields: &[
        field("wait_id", FieldKind::Text, Requirement::Truthy),
        field("state", FieldKind::Bool, Requirement::Defined),
    ],
};

static HORN: ConfigSchema = ConfigSchema {
    fields: &[
        field("horn", FieldKind::Text, Requirement::Truthy),
        field("repetitions", FieldKind::Number, Requirement::Optional),
    ],
};

static ANNOUNCE: ConfigSchema = ConfigSchema {
    fields: &[
        field("announcement", FieldKind::Text, Requirement::Truthy),
        field("repetitions", FieldKind::Number, Requirement::Optional),
    ],
};

// Rotate ships its numeric fields unchecked, matching the live behavior of
// the configuration surface.
static ROTATE: ConfigSchema = ConfigSchema {
    fields: &[
        field("steering_angle", FieldKind::Number, Requirement::Optional),
        field("target_diff", FieldKind::Number, Requirement::Optional),
    ],
};

// ---------------------------------------------------------------------------
// Lookup and validation
// ---------------------------------------------------------------------------

/// Schema for a known action type. Total over the closed enum; string-keyed
/// lookups go through `ActionType::from_str`, which reports
/// `UnknownActionType` before this is ever reached.
pub fn schema_for(action_type: ActionType) -> &'static ConfigSchema {
    match action_type {
        ActionType::Move => &MOVE,
        ActionType::Latch | ActionType::Unlatch => &EMPTY,
        ActionType::Reverse => &REVERSE,
        ActionType::WaitForTrigger => &WAIT_FOR_TRIGGER,
        ActionType::WaitForTime => &WAIT_FOR_TIME,
        ActionType::ReleaseTrigger => &RELEASE_TRIGGER,
        ActionType::Horn => &HORN,
        ActionType::Announce => &ANNOUNCE,
        ActionType::Rotate => &ROTATE,
    }
}

/// Required fields of `action_type` that `config` fails to satisfy.
pub fn missing_fields(action_type: ActionType, config: &ActionConfig) -> Vec<&'static str> {
    schema_for(action_type)
        .required()
        .filter(|f| match f.requirement {
            Requirement::Truthy => !config.get(f.key).is_some_and(|v| v.is_truthy()),
            Requirement::Defined => !config.contains_key(f.key),
            Requirement::Optional => false,
        })
        .map(|f| f.key)
        .collect()
}

pub fn is_valid(action_type: ActionType, config: &ActionConfig) -> bool {
    missing_fields(action_type, config).is_empty()
}

pub fn validate(action_type: ActionType, config: &ActionConfig) -> Result<()> {
    let missing = missing_fields(action_type, config);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AmrError::ValidationFailed {
            action_type,
            missing: missing.iter().map(|s| s.to_string()).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ConfigValue;

    fn config(pairs: &[(&str, ConfigValue)]) -> ActionConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn move_requires_location() {
        assert!(!is_valid(ActionType::Move, &ActionConfig::new()));
        assert!(!is_valid(
            ActionType::Move,
            &config(&[("location", ConfigValue::from(""))])
        ));
        assert!(is_valid(
            ActionType::Move,
            &config(&[("location", ConfigValue::from("Loading Bay"))])
        ));
    }

    #[test]
    fn wait_for_trigger_requires_trigger_id() {
        assert!(!is_valid(ActionType::WaitForTrigger, &ActionConfig::new()));
        assert!(is_valid(
            ActionType::WaitForTrigger,
            &config(&[("trigger_id", ConfigValue::from("Door Open"))])
        ));
    }

    #[test]
    fn release_trigger_state_false_is_defined() {
        // `state: false` must count as configured; only absence fails.
        let with_false = config(&[
            ("wait_id", ConfigValue::from("Button Press")),
            ("state", ConfigValue::from(false)),
        ]);
        assert!(is_valid(ActionType::ReleaseTrigger, &with_false));

        let without_state = config(&[("wait_id", ConfigValue::from("Button Press"))]);
        assert_eq!(
            missing_fields(ActionType::ReleaseTrigger, &without_state),
            vec!["state"]
        );

        let without_wait = config(&[("state", ConfigValue::from(true))]);
        assert_eq!(
            missing_fields(ActionType::ReleaseTrigger, &without_wait),
            vec!["wait_id"]
        );
    }

    #[test]
    fn announce_and_horn_require_selection_only() {
        assert!(is_valid(
            ActionType::Announce,
            &config(&[("announcement", ConfigValue::from("Clear Path - English"))])
        ));
        assert!(!is_valid(ActionType::Announce, &ActionConfig::new()));
        assert!(is_valid(
            ActionType::Horn,
            &config(&[("horn", ConfigValue::from("caution"))])
        ));
        assert!(!is_valid(ActionType::Horn, &ActionConfig::new()));
    }

    #[test]
    fn reverse_requires_all_four() {
        let mut cfg = config(&[
            ("presetName", ConfigValue::from("Standard Reverse")),
            ("name", ConfigValue::from("Loading Bay")),
            ("state", ConfigValue::from("Shipping Dock")),
        ]);
        assert_eq!(missing_fields(ActionType::Reverse, &cfg), vec!["hitch"]);

        cfg.insert("hitch".to_string(), ConfigValue::from("True"));
        assert!(is_valid(ActionType::Reverse, &cfg));

        // A bare boolean false hitch is falsy, unlike the text "False".
        cfg.insert("hitch".to_string(), ConfigValue::from(false));
        assert!(!is_valid(ActionType::Reverse, &cfg));
        cfg.insert("hitch".to_string(), ConfigValue::from("False"));
        assert!(is_valid(ActionType::Reverse, &cfg));
    }

    #[test]
    fn unconstrained_types_are_always_valid() {
        for ty in [
            ActionType::Latch,
            ActionType::Unlatch,
            ActionType::WaitForTime,
            ActionType::Rotate,
        ] {
            assert!(is_valid(ty, &ActionConfig::new()), "{ty} should be valid");
        }
    }

    #[test]
    fn validate_reports_missing_fields() {
        let err = validate(ActionType::Reverse, &ActionConfig::new()).unwrap_err();
        match err {
            AmrError::ValidationFailed {
                action_type,
                missing,
            } => {
                assert_eq!(action_type, ActionType::Reverse);
                assert_eq!(missing, vec!["name", "state", "presetName", "hitch"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_type_has_a_schema() {
        for ty in ActionType::all() {
            // Lookup must be total; required fields must carry a kind.
            let schema = schema_for(*ty);
            for f in schema.fields {
                assert!(!f.key.is_empty());
            }
        }
    }
}
