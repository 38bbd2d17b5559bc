use serde::Serialize;

use crate::catalog::UpgradeDefinition;
use crate::steps::DescriptionFormat;

/// Slack used when deciding whether one more increment would pass the cap.
pub const OVER_CAP_EPSILON: f64 = 1e-4;

/// Where an upgrade currently sits. `total_steps` counts from the baseline (the 0th step is
/// not counted), so an upgrade bought three times out of five reads `3 / 5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepData {
    pub total_steps: i32,
    pub current_step: i32,
    pub over_cap: bool,
}

/// Linear remap of `value` from `[a, b]` onto `[c, d]`, clamped to the input range.
pub fn remap_val_clamped(value: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if a == b {
        return if value >= b { d } else { c };
    }
    let t = ((value - a) / (b - a)).clamp(0.0, 1.0);
    c + (d - c) * t
}

/// Per-upgrade difficulty factor: a config `mult` of 0 ignores the global multiplier,
/// 1 applies it fully.
pub fn difficulty_scale(mult: f64, global_mult: f64) -> f64 {
    remap_val_clamped(mult, 0.0, 1.0, 1.0, global_mult)
}

pub fn effective_cap(
    _raw_increment: f64,
    raw_cap: f64,
    mult: f64,
    format: DescriptionFormat,
    global_mult: f64,
) -> f64 {
    let scale = difficulty_scale(mult, global_mult);
    match format {
        DescriptionFormat::InvertedPercentage => raw_cap / scale,
        // 1.0 is "no change", so only the distance from it scales.
        DescriptionFormat::Percentage => (raw_cap - 1.0) * scale + 1.0,
        DescriptionFormat::Linear => raw_cap * scale,
    }
}

pub fn effective_increment(
    raw_increment: f64,
    raw_cap: f64,
    mult: f64,
    format: DescriptionFormat,
    global_mult: f64,
) -> f64 {
    match format {
        DescriptionFormat::InvertedPercentage => {
            // Keep the raw step count and spread it over the remapped distance to the cap.
            let raw_steps = (1.0 - raw_cap) / -raw_increment;
            if raw_steps == 0.0 || !raw_steps.is_finite() {
                return 0.0;
            }
            let cap = effective_cap(raw_increment, raw_cap, mult, format, global_mult);
            -(1.0 - cap) / raw_steps
        }
        DescriptionFormat::Percentage | DescriptionFormat::Linear => {
            raw_increment * difficulty_scale(mult, global_mult)
        }
    }
}

/// True when buying one more `increment` would move `current` past `cap`.
pub fn is_over_cap(current: f64, increment: f64, cap: f64) -> bool {
    if increment > 0.0 {
        current + increment > cap + OVER_CAP_EPSILON
    } else if increment < 0.0 {
        current + increment < cap - OVER_CAP_EPSILON
    } else {
        false
    }
}

/// Value an attribute has when nothing sets it.
pub fn default_value(format: DescriptionFormat) -> f64 {
    if format.is_percentage() {
        1.0
    } else {
        0.0
    }
}

fn steps_between(from: f64, to: f64, increment: f64) -> i32 {
    if increment == 0.0 {
        return 0;
    }
    ((to - from) / increment).abs().round() as i32
}

/// Step data from already-effective increment and cap.
pub fn compute_steps(base: f64, current: f64, increment: f64, cap: f64) -> StepData {
    let current_step = steps_between(base, current, increment);
    if is_over_cap(current, increment, cap) {
        return StepData {
            total_steps: current_step,
            current_step,
            over_cap: true,
        };
    }
    StepData {
        total_steps: steps_between(base, cap, increment),
        current_step,
        over_cap: false,
    }
}

/// Step data for an upgrade given its baseline and current attribute values.
pub fn compute_step(
    upgrade: &UpgradeDefinition,
    base: f64,
    current: f64,
    format: DescriptionFormat,
    global_mult: f64,
) -> StepData {
    let increment = effective_increment(
        upgrade.increment,
        upgrade.cap,
        upgrade.mult,
        format,
        global_mult,
    );
    let cap = effective_cap(
        upgrade.increment,
        upgrade.cap,
        upgrade.mult,
        format,
        global_mult,
    );
    compute_steps(base, current, increment, cap)
}

/// Charge items count natively: a step is a charge.
pub fn charge_steps(charges: u32, max_charges: u32, has_attribute: bool) -> StepData {
    let current_step = if has_attribute { charges as i32 } else { 0 };
    StepData {
        total_steps: max_charges as i32,
        current_step,
        over_cap: current_step == max_charges as i32,
    }
}
