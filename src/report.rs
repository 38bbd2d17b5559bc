//! Eligible-upgrade rows for one slot, rendered as JSON, a tab table or CSV.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::loadout::{Loadout, LoadoutSlot};
use crate::manager::UpgradeManager;
use crate::schema::AttributeSchema;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeRow {
    pub index: usize,
    pub attribute: String,
    pub icon: String,
    pub group: String,
    pub ui_group: i64,
    pub cost: i64,
    pub increment: f64,
    pub cap: f64,
    pub current_step: i32,
    pub total_steps: i32,
    pub over_cap: bool,
}

const TABLE_HEADER: &str =
    "index\tattribute\tgroup\tui_group\tcost\tincrement\tcap\tcurrent_step\ttotal_steps\tover_cap";

/// One row per upgrade offered for `slot`, in catalog order, with step data filled in.
pub fn eligible_rows<S, L>(
    manager: &UpgradeManager<S>,
    loadout: &L,
    slot: LoadoutSlot,
) -> Vec<UpgradeRow>
where
    S: AttributeSchema,
    L: Loadout + ?Sized,
{
    manager
        .eligible_indices(loadout, slot)
        .into_iter()
        .filter_map(|index| {
            let upgrade = manager.upgrade(index)?;
            let step = manager.compute_step(loadout, slot, index);
            Some(UpgradeRow {
                index,
                attribute: upgrade.attribute.clone(),
                icon: upgrade.icon.clone(),
                group: upgrade.group.clone(),
                ui_group: upgrade.ui_group.code(),
                cost: upgrade.cost,
                increment: upgrade.increment,
                cap: upgrade.cap,
                current_step: step.current_step,
                total_steps: step.total_steps,
                over_cap: step.over_cap,
            })
        })
        .collect()
}

pub fn rows_to_table(rows: &[UpgradeRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TABLE_HEADER}");
    for row in rows {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{}\t{}\t{}",
            row.index,
            row.attribute,
            row.group,
            row.ui_group,
            row.cost,
            row.increment,
            row.cap,
            row.current_step,
            row.total_steps,
            row.over_cap
        );
    }
    out
}

pub fn rows_to_csv(rows: &[UpgradeRow]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
