use crate::output::{print_json, print_table};
use amrflow_core::catalog::SiteCatalog;
use amrflow_core::preset::PresetCatalog;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// Named locations a MOVE or REVERSE can target
    Locations,
    /// Trigger signals for WAIT FOR TRIGGER / RELEASE TRIGGER
    Signals,
    /// Horn sounds
    Horns,
    /// Voice announcements
    Announcements,
    /// Reverse-docking presets
    Presets,
}

pub fn run(subcmd: CatalogSubcommand, json: bool) -> anyhow::Result<()> {
    let site = SiteCatalog::default();
    match subcmd {
        CatalogSubcommand::Locations => items(&site.locations, json),
        CatalogSubcommand::Signals => items(&site.signals, json),
        CatalogSubcommand::Horns => items(&site.horn_sounds, json),
        CatalogSubcommand::Announcements => items(&site.announcements, json),
        CatalogSubcommand::Presets => presets(json),
    }
}

fn items(values: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&values);
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}

fn presets(json: bool) -> anyhow::Result<()> {
    let catalog = PresetCatalog::default();
    if json {
        return print_json(&catalog.presets());
    }

    let rows: Vec<Vec<String>> = catalog
        .presets()
        .iter()
        .map(|p| {
            let speed = p.config.get("speed").map(|v| v.to_string()).unwrap_or_default();
            let y = p
                .config
                .get("y_threshold")
                .map(|v| v.to_string())
                .unwrap_or_default();
            let angle = p
                .config
                .get("angle_factor")
                .map(|v| v.to_string())
                .unwrap_or_default();
            vec![p.name.clone(), speed, y, angle]
        })
        .collect();
    print_table(&["NAME", "SPEED", "Y_THRESHOLD", "ANGLE_FACTOR"], &rows);
    Ok(())
}
