//! Process configuration read from the environment.
//!
//! | variable            | meaning                                          | default                |
//! |---------------------|--------------------------------------------------|------------------------|
//! | `MVM_UPGRADES_FILE` | upgrades file loaded instead of the default one  | unset                  |
//! | `MVM_UPGRADE_MULT`  | global difficulty multiplier for caps/increments | `1.0`                  |
//! | `MVM_SCHEMA_PATH`   | attribute schema JSON                            | `data/attributes.json` |
//! | `MVM_CONTENT_ROOT`  | directory relative upgrade paths resolve against | `.`                    |

use std::env;
use std::path::PathBuf;

use crate::catalog::DEFAULT_UPGRADES_PATH;
use crate::schema::DEFAULT_SCHEMA_PATH;

pub const UPGRADES_FILE_VAR: &str = "MVM_UPGRADES_FILE";
pub const UPGRADE_MULT_VAR: &str = "MVM_UPGRADE_MULT";
pub const SCHEMA_PATH_VAR: &str = "MVM_SCHEMA_PATH";
pub const CONTENT_ROOT_VAR: &str = "MVM_CONTENT_ROOT";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Overrides the default upgrades file when set and non-empty.
    pub custom_upgrades_file: Option<String>,
    pub upgrade_mult: f64,
    pub schema_path: PathBuf,
    pub content_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_upgrades_file: None,
            upgrade_mult: 1.0,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            content_root: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup. Invalid values keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        settings.custom_upgrades_file = lookup(UPGRADES_FILE_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(raw) = lookup(UPGRADE_MULT_VAR) {
            match raw.trim().parse::<f64>() {
                Ok(mult) if mult.is_finite() && mult > 0.0 => settings.upgrade_mult = mult,
                _ => tracing::warn!(
                    target: "mvm_upgrades::settings",
                    variable = UPGRADE_MULT_VAR,
                    value = %raw,
                    "expected a positive number, using {}",
                    settings.upgrade_mult
                ),
            }
        }

        if let Some(path) = lookup(SCHEMA_PATH_VAR).filter(|value| !value.trim().is_empty()) {
            settings.schema_path = PathBuf::from(path);
        }
        if let Some(root) = lookup(CONTENT_ROOT_VAR).filter(|value| !value.trim().is_empty()) {
            settings.content_root = PathBuf::from(root);
        }
        settings
    }

    /// The upgrades file `load_default` reads.
    pub fn upgrades_path(&self) -> &str {
        self.custom_upgrades_file
            .as_deref()
            .unwrap_or(DEFAULT_UPGRADES_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let settings = settings(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.upgrades_path(), "scripts/items/mvm_upgrades.txt");
    }

    #[test]
    fn custom_file_overrides_default_path() {
        let custom = settings(&[(UPGRADES_FILE_VAR, "scripts/items/mvm_mannworks.txt")]);
        assert_eq!(custom.upgrades_path(), "scripts/items/mvm_mannworks.txt");
        let blank = settings(&[(UPGRADES_FILE_VAR, "  ")]);
        assert_eq!(blank.custom_upgrades_file, None);
    }

    #[test]
    fn invalid_multiplier_falls_back() {
        assert_eq!(settings(&[(UPGRADE_MULT_VAR, "2.5")]).upgrade_mult, 2.5);
        assert_eq!(settings(&[(UPGRADE_MULT_VAR, "lots")]).upgrade_mult, 1.0);
        assert_eq!(settings(&[(UPGRADE_MULT_VAR, "-1")]).upgrade_mult, 1.0);
    }
}
