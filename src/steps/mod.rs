//! Step/cap arithmetic: turns a continuous attribute value into "level N of M" for an upgrade.

mod calculator;
mod format;
mod query;

pub use calculator::{
    charge_steps, compute_step, compute_steps, default_value, difficulty_scale,
    effective_cap, effective_increment, is_over_cap, remap_val_clamped, StepData,
    OVER_CAP_EPSILON,
};
pub use format::DescriptionFormat;
pub use query::compute_step_for;
