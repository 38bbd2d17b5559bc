use crate::catalog::{
    ConditionKind, UpgradeCatalog, UpgradeDefinition, UpgradeGroup, DEFAULT_GROUP,
};
use crate::rules::{Predicate, UpgradeContext};

/// Evaluates a condition name. Names outside the vocabulary are false.
pub fn predicate_result(name: &str, ctx: &UpgradeContext<'_>) -> bool {
    match name.parse::<Predicate>() {
        Ok(predicate) => predicate.evaluate(ctx),
        Err(_) => false,
    }
}

/// `allow && !exclude`: allow if any `RequireAnyTrue` condition holds, exclude if any
/// `ExcludeIfTrue` holds or any `ExcludeUnlessTrue` fails.
pub fn group_verdict(group: &UpgradeGroup, ctx: &UpgradeContext<'_>) -> bool {
    let mut allowed = false;
    let mut excluded = false;
    for condition in group.conditions() {
        let holds = || condition.predicate.is_some_and(|p| p.evaluate(ctx));
        match condition.kind {
            ConditionKind::ExcludeIfTrue => excluded = excluded || holds(),
            ConditionKind::RequireAnyTrue => allowed = allowed || holds(),
            ConditionKind::ExcludeUnlessTrue => excluded = excluded || !holds(),
            ConditionKind::Ignored(_) => {}
        }
    }
    allowed && !excluded
}

/// Whether upgrades in `group_name` are offered in this context. `"default"` always is;
/// an unknown group never is.
pub fn group_eligible(
    catalog: &UpgradeCatalog,
    group_name: &str,
    ctx: &UpgradeContext<'_>,
) -> bool {
    if group_name.eq_ignore_ascii_case(DEFAULT_GROUP) {
        return true;
    }
    match catalog.group(group_name) {
        Some(group) => group_verdict(group, ctx),
        None => {
            tracing::debug!(
                target: "mvm_upgrades::rules",
                group = group_name,
                "unresolvable upgrade group, treating as ineligible"
            );
            false
        }
    }
}

pub fn is_upgrade_eligible(
    catalog: &UpgradeCatalog,
    upgrade: &UpgradeDefinition,
    ctx: &UpgradeContext<'_>,
) -> bool {
    group_eligible(catalog, &upgrade.group, ctx)
}
