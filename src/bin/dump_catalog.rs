//! Dump the parsed upgrade catalog (upgrades and groups) as JSON.
//! Run: cargo run --bin dump_catalog -- [scripts/items/mvm_upgrades.txt]

use mvm_upgrades::schema::StaticSchema;
use mvm_upgrades::{Settings, UpgradeManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.upgrades_path().to_string());

    let schema = StaticSchema::from_file(&settings.schema_path)?;
    let mut manager = UpgradeManager::new(schema, settings);
    let report = manager.load_from_path(&path)?;
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }

    if let Some(catalog) = manager.catalog() {
        println!("{}", serde_json::to_string_pretty(catalog)?);
    }
    Ok(())
}
