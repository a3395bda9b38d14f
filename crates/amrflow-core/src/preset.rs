use crate::action::{Action, ActionConfig, ConfigValue};
use crate::error::{AmrError, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReversePreset
// ---------------------------------------------------------------------------

/// A named bundle of reverse-docking tuning values that can be merged
/// wholesale into a REVERSE action's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversePreset {
    pub name: String,
    pub config: ActionConfig,
}

// ---------------------------------------------------------------------------
// PresetCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCatalog {
    presets: Vec<ReversePreset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<ReversePreset>) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &[ReversePreset] {
        &self.presets
    }

    pub fn find(&self, name: &str) -> Option<&ReversePreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Merge the named preset into `action`'s configuration and stamp
    /// `presetName`. Preset values win on key collision; keys the preset
    /// does not carry are preserved. The input action is untouched; an
    /// unknown name reports `PresetNotFound` and produces nothing.
    pub fn apply(&self, action: &Action, name: &str) -> Result<Action> {
        let preset = self
            .find(name)
            .ok_or_else(|| AmrError::PresetNotFound(name.to_string()))?;

        let mut merged = action.clone();
        for (key, value) in &preset.config {
            merged.config.insert(key.clone(), value.clone());
        }
        merged
            .config
            .insert("presetName".to_string(), ConfigValue::from(name));
        Ok(merged)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new(builtin_presets())
    }
}

// ---------------------------------------------------------------------------
// Built-in presets
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn tuning(
    y_threshold: f64,
    x_threshold: f64,
    ka_1: f64,
    ka_2: f64,
    kc: f64,
    speed: f64,
    angle_factor: f64,
    zone: f64,
    vehicle_latch_distance: f64,
    latch_project_dist: f64,
    hitch: bool,
) -> ActionConfig {
    let mut config = ActionConfig::new();
    config.insert("y_threshold".to_string(), ConfigValue::from(y_threshold));
    config.insert("x_threshold".to_string(), ConfigValue::from(x_threshold));
    config.insert("ka_1".to_string(), ConfigValue::from(ka_1));
    config.insert("ka_2".to_string(), ConfigValue::from(ka_2));
    config.insert("kc".to_string(), ConfigValue::from(kc));
    config.insert("speed".to_string(), ConfigValue::from(speed));
    config.insert("angle_factor".to_string(), ConfigValue::from(angle_factor));
    config.insert("zone".to_string(), ConfigValue::from(zone));
    config.insert(
        "vehicle_latch_distance".to_string(),
        ConfigValue::from(vehicle_latch_distance),
    );
    config.insert(
        "latch_project_dist".to_string(),
        ConfigValue::from(latch_project_dist),
    );
    config.insert("hitch".to_string(), ConfigValue::from(hitch));
    config
}

/// The tuning bundles shipped with the fleet.
pub fn builtin_presets() -> Vec<ReversePreset> {
    vec![
        ReversePreset {
            name: "Standard Reverse".to_string(),
            config: tuning(0.02, 0.0, -50.0, -50.0, 0.0, 10.0, 1.5, 99.0, -0.7, 0.7, false),
        },
        ReversePreset {
            name: "Precision Reverse".to_string(),
            config: tuning(0.01, 0.0, -60.0, -60.0, 0.0, 5.0, 2.0, 99.0, -0.5, 0.5, false),
        },
        ReversePreset {
            name: "High Speed Reverse".to_string(),
            config: tuning(0.05, 0.0, -40.0, -40.0, 0.0, 15.0, 1.2, 99.0, -0.7, 0.7, false),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;

    #[test]
    fn builtin_catalog_names() {
        let catalog = PresetCatalog::default();
        assert_eq!(catalog.presets().len(), 3);
        assert!(catalog.find("Standard Reverse").is_some());
        assert!(catalog.find("Precision Reverse").is_some());
        assert!(catalog.find("High Speed Reverse").is_some());
        assert!(catalog.find("Turbo Reverse").is_none());
    }

    #[test]
    fn apply_merges_and_stamps_preset_name() {
        let catalog = PresetCatalog::default();
        let mut action = Action::new(ActionType::Reverse);
        action.set("name", "Loading Bay");
        action.set("state", "Shipping Dock");
        action.set("hitch", "True");

        let merged = catalog.apply(&action, "Precision Reverse").unwrap();
        assert_eq!(
            merged.get("presetName"),
            Some(&ConfigValue::from("Precision Reverse"))
        );
        assert_eq!(merged.get("speed"), Some(&ConfigValue::from(5.0)));
        assert_eq!(merged.get("ka_1"), Some(&ConfigValue::from(-60.0)));
        // Operator-chosen fields absent from the preset survive.
        assert_eq!(merged.get("name"), Some(&ConfigValue::from("Loading Bay")));
        assert_eq!(merged.get("state"), Some(&ConfigValue::from("Shipping Dock")));
        // Preset values win on collision.
        assert_eq!(merged.get("hitch"), Some(&ConfigValue::from(false)));
        // The original action is untouched.
        assert_eq!(action.get("speed"), None);
        assert_eq!(merged.id, action.id);
    }

    #[test]
    fn apply_overwrites_previous_preset_values() {
        let catalog = PresetCatalog::default();
        let action = Action::new(ActionType::Reverse);
        let standard = catalog.apply(&action, "Standard Reverse").unwrap();
        let high_speed = catalog.apply(&standard, "High Speed Reverse").unwrap();
        assert_eq!(high_speed.get("speed"), Some(&ConfigValue::from(15.0)));
        assert_eq!(
            high_speed.get("presetName"),
            Some(&ConfigValue::from("High Speed Reverse"))
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let catalog = PresetCatalog::default();
        let action = Action::new(ActionType::Reverse);
        let once = catalog.apply(&action, "Standard Reverse").unwrap();
        let twice = catalog.apply(&once, "Standard Reverse").unwrap();
        assert_eq!(once.config, twice.config);
    }

    #[test]
    fn unknown_preset_reports_and_changes_nothing() {
        let catalog = PresetCatalog::default();
        let action = Action::new(ActionType::Reverse);
        let err = catalog.apply(&action, "Ghost Preset").unwrap_err();
        assert!(matches!(err, AmrError::PresetNotFound(name) if name == "Ghost Preset"));
        assert!(action.config.is_empty());
    }
}
