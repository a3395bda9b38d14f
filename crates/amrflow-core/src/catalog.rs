use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SiteCatalog
// ---------------------------------------------------------------------------

/// The configuration vocabulary for a site: the named locations, trigger
/// signals, horn sounds, and voice announcements an operator can pick from
/// when filling in action configs. Defaults to the demo site's dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCatalog {
    pub locations: Vec<String>,
    pub signals: Vec<String>,
    pub horn_sounds: Vec<String>,
    pub announcements: Vec<String>,
}

impl Default for SiteCatalog {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            locations: strings(&[
                "Loading Bay",
                "Assembly Line A",
                "Assembly Line B",
                "Warehouse Zone 1",
                "Warehouse Zone 2",
                "Charging Station",
                "Maintenance Area",
                "Shipping Dock",
            ]),
            signals: strings(&[
                "Button Press",
                "Door Open",
                "Line Cleared",
                "Package Detected",
                "Battery Low",
                "Emergency Stop Released",
                "Operator Confirmation",
            ]),
            horn_sounds: strings(&["stop-0", "caution", "warning", "emergency"]),
            announcements: strings(&[
                "Clear Path - Kannada",
                "Clear Path - English",
                "Emergency evacuation - Kannada",
                "Emergency evacuation - English",
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
