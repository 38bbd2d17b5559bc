use serde::Serialize;

use crate::catalog::{LoadReport, Severity};
use crate::loadout::{load_loadout_fixture, LoadoutFixture, LoadoutSlot};
use crate::manager::{LoadError, UpgradeManager};
use crate::report::{eligible_rows, rows_to_csv, rows_to_table};
use crate::rules::{Predicate, UpgradeContext};
use crate::schema::StaticSchema;
use crate::settings::Settings;

const USAGE: &str = "usage: mvm_upgrades <validate|eligible|steps|predicates>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Validate,
    Eligible,
    Steps,
    Predicates,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("validate") => Some(Command::Validate),
        Some("eligible") => Some(Command::Eligible),
        Some("steps") => Some(Command::Steps),
        Some("predicates") => Some(Command::Predicates),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Eligible) => handle_eligible(args),
        Some(Command::Steps) => handle_steps(args),
        Some(Command::Predicates) => handle_predicates(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn load_manager(
    settings: Settings,
    upgrades_path: &str,
) -> Result<(UpgradeManager<StaticSchema>, LoadReport), i32> {
    let schema = StaticSchema::from_file(&settings.schema_path).map_err(|err| {
        eprintln!("schema load failed: {err}");
        1
    })?;
    let mut manager = UpgradeManager::new(schema, settings);
    match manager.load_from_path(upgrades_path) {
        Ok(report) => Ok((manager, report)),
        Err(err @ LoadError::PathRejected { .. }) => {
            eprintln!("{err}");
            Err(2)
        }
        Err(err) => {
            eprintln!("load failed: {err}");
            Err(1)
        }
    }
}

fn load_loadout(path: &str) -> Result<LoadoutFixture, i32> {
    load_loadout_fixture(path).map_err(|err| {
        eprintln!("loadout load failed: {err}");
        1
    })
}

fn parse_slot(raw: &str) -> Result<LoadoutSlot, i32> {
    raw.parse::<LoadoutSlot>().map_err(|err| {
        eprintln!("{err}");
        2
    })
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let settings = Settings::from_env();
    let path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| settings.upgrades_path().to_string());

    let (manager, report) = match load_manager(settings, &path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        return 1;
    }
    let (upgrades, groups) = manager
        .catalog()
        .map_or((0, 0), |catalog| (catalog.len(), catalog.groups().len()));
    println!(
        "validation passed: {path} (upgrades={upgrades}, groups={groups}, warnings={warnings})"
    );
    0
}

fn handle_eligible(args: &[String]) -> i32 {
    let (Some(upgrades_path), Some(loadout_path), Some(slot)) =
        (args.get(2), args.get(3), args.get(4))
    else {
        eprintln!(
            "usage: mvm_upgrades eligible <upgrades.txt> <loadout.yaml> <slot> [--table|--csv]"
        );
        return 2;
    };
    let slot = match parse_slot(slot) {
        Ok(slot) => slot,
        Err(code) => return code,
    };
    let loadout = match load_loadout(loadout_path) {
        Ok(loadout) => loadout,
        Err(code) => return code,
    };
    let (manager, _) = match load_manager(Settings::from_env(), upgrades_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let rows = eligible_rows(&manager, &loadout, slot);
    if args.iter().any(|arg| arg == "--table") {
        print!("{}", rows_to_table(&rows));
        0
    } else if args.iter().any(|arg| arg == "--csv") {
        match rows_to_csv(&rows) {
            Ok(csv) => {
                print!("{csv}");
                0
            }
            Err(err) => {
                eprintln!("{err}");
                1
            }
        }
    } else {
        print_json(&rows, "eligible upgrades")
    }
}

#[derive(Debug, Serialize)]
struct StepRecord<'a> {
    attribute: &'a str,
    index: usize,
    slot: LoadoutSlot,
    eligible: bool,
    current_step: i32,
    total_steps: i32,
    over_cap: bool,
}

fn handle_steps(args: &[String]) -> i32 {
    let (Some(upgrades_path), Some(loadout_path), Some(slot), Some(attribute)) =
        (args.get(2), args.get(3), args.get(4), args.get(5))
    else {
        eprintln!("usage: mvm_upgrades steps <upgrades.txt> <loadout.yaml> <slot> <attribute>");
        return 2;
    };
    let slot = match parse_slot(slot) {
        Ok(slot) => slot,
        Err(code) => return code,
    };
    let loadout = match load_loadout(loadout_path) {
        Ok(loadout) => loadout,
        Err(code) => return code,
    };
    let (manager, _) = match load_manager(Settings::from_env(), upgrades_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let Some(index) = manager.index_of_attribute(attribute) else {
        eprintln!("no upgrade for attribute '{attribute}'");
        return 1;
    };
    let step = manager.compute_step(&loadout, slot, index);
    print_json(
        &StepRecord {
            attribute,
            index,
            slot,
            eligible: manager.is_upgrade_eligible(index, &loadout, slot),
            current_step: step.current_step,
            total_steps: step.total_steps,
            over_cap: step.over_cap,
        },
        "step data",
    )
}

fn handle_predicates(args: &[String]) -> i32 {
    let (Some(loadout_path), Some(slot)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: mvm_upgrades predicates <loadout.yaml> <slot>");
        return 2;
    };
    let slot = match parse_slot(slot) {
        Ok(slot) => slot,
        Err(code) => return code,
    };
    let loadout = match load_loadout(loadout_path) {
        Ok(loadout) => loadout,
        Err(code) => return code,
    };

    let ctx = UpgradeContext::resolve(&loadout, slot);
    let names: Vec<&str> = Predicate::all()
        .filter(|predicate| predicate.evaluate(&ctx))
        .map(|predicate| predicate.name())
        .collect();
    print_json(&names, "predicates")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["bin", "validate"])), Some(Command::Validate));
        assert_eq!(parse_command(&args(&["bin", "steps"])), Some(Command::Steps));
        assert_eq!(parse_command(&args(&["bin", "serve"])), None);
        assert_eq!(parse_command(&args(&["bin"])), None);
    }

    #[test]
    fn missing_arguments_print_usage() {
        assert_eq!(run_with_args(&args(&["bin"])), 2);
        assert_eq!(run_with_args(&args(&["bin", "eligible", "a.txt"])), 2);
        assert_eq!(run_with_args(&args(&["bin", "predicates"])), 2);
    }
}
