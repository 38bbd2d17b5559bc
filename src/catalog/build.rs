use crate::catalog::{
    ConditionKind, LoadDiagnosticKind, LoadReport, UiGroup, UpgradeDefinition, UpgradeGroup,
    UpgradeQuality, DEFAULT_GROUP,
};
use crate::keyvalues::KeyValues;
use crate::schema::AttributeSchema;

const REQUIRED_KEYS: [&str; 5] = ["attribute", "icon", "increment", "cap", "cost"];

pub(crate) struct CatalogBuilder<'s, S: ?Sized> {
    schema: &'s S,
    pub(crate) upgrades: Vec<UpgradeDefinition>,
    pub(crate) groups: Vec<UpgradeGroup>,
    pub(crate) report: LoadReport,
}

impl<'s, S: AttributeSchema + ?Sized> CatalogBuilder<'s, S> {
    pub(crate) fn new(schema: &'s S) -> Self {
        Self {
            schema,
            upgrades: Vec::new(),
            groups: Vec::new(),
            report: LoadReport::default(),
        }
    }

    pub(crate) fn upgrade_block(&mut self, block: &KeyValues, default_ui_group: UiGroup) {
        for entry in block.children() {
            let context = format!("{}.{}", block.name, entry.name);
            let missing: Vec<&str> = REQUIRED_KEYS
                .into_iter()
                .filter(|key| entry.find_key(key).is_none())
                .collect();
            if !missing.is_empty() {
                tracing::warn!(
                    target: "mvm_upgrades::catalog",
                    entry = %context,
                    missing = ?missing,
                    "upgrade entry skipped"
                );
                self.report.push(
                    LoadDiagnosticKind::MalformedEntry,
                    context,
                    format!("missing {}", missing.join(", ")),
                );
                continue;
            }

            let attribute = entry.get_str_or("attribute", "");
            let rejection = match self.schema.attribute_by_name(attribute) {
                None => Some("is not a known attribute"),
                Some(definition) => definition.upgrade_rejection(),
            };
            if let Some(reason) = rejection {
                tracing::warn!(
                    target: "mvm_upgrades::catalog",
                    entry = %context,
                    attribute,
                    "invalid attribute reference: {reason}"
                );
                self.report.push(
                    LoadDiagnosticKind::InvalidAttributeReference,
                    context,
                    format!("attribute '{attribute}' {reason}"),
                );
                continue;
            }

            self.upgrades.push(UpgradeDefinition {
                attribute: attribute.to_string(),
                icon: entry.get_str_or("icon", "").to_string(),
                increment: entry.get_float("increment", 0.0),
                cap: entry.get_float("cap", 0.0),
                cost: entry.get_int("cost", 0),
                ui_group: UiGroup::from_code(entry.get_int("ui_group", default_ui_group.code())),
                quality: UpgradeQuality::from_code(
                    entry.get_int("quality", UpgradeQuality::Normal.code()),
                ),
                tier: entry.get_int("tier", 0),
                group: entry.get_str_or("group", DEFAULT_GROUP).to_string(),
                mult: entry.get_float("mult", 1.0),
                cost_mult: entry.get_float("cost_mult", 1.0),
            });
        }
    }

    pub(crate) fn group_block(&mut self, block: &KeyValues) {
        for entry in block.children() {
            let mut group = UpgradeGroup::new(entry.name.as_str());
            for condition in entry.children() {
                let context = format!("{}.{}.{}", block.name, entry.name, condition.name);
                let kind = ConditionKind::from_code(condition.int_value());

                if let ConditionKind::Ignored(code) = kind {
                    tracing::warn!(
                        target: "mvm_upgrades::catalog",
                        condition = %context,
                        code,
                        "unknown condition kind"
                    );
                    self.report.push(
                        LoadDiagnosticKind::UnknownConditionKind,
                        context.as_str(),
                        format!("condition kind {code} is ignored"),
                    );
                }

                if let Some(previous) = group.insert(condition.name.as_str(), kind) {
                    tracing::warn!(
                        target: "mvm_upgrades::catalog",
                        condition = %context,
                        previous = previous.code(),
                        current = kind.code(),
                        "duplicate condition"
                    );
                    self.report.push(
                        LoadDiagnosticKind::DuplicateCondition,
                        context.as_str(),
                        format!(
                            "condition listed twice, kind {} replaces {}",
                            kind.code(),
                            previous.code()
                        ),
                    );
                } else if group.conditions().last().is_some_and(|c| c.predicate.is_none()) {
                    tracing::warn!(
                        target: "mvm_upgrades::catalog",
                        condition = %context,
                        "unknown predicate, always false"
                    );
                    self.report.push(
                        LoadDiagnosticKind::UnknownPredicate,
                        context,
                        format!("'{}' is not a known predicate", condition.name),
                    );
                }
            }
            self.groups.push(group);
        }
    }
}
