use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadDiagnosticKind {
    /// Missing one of attribute, icon, increment, cap or cost.
    MalformedEntry,
    /// Attribute unknown to the schema, not networked, or not stored as a float.
    InvalidAttributeReference,
    DuplicateCondition,
    UnknownConditionKind,
    UnknownPredicate,
}

impl LoadDiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MalformedEntry | Self::InvalidAttributeReference => Severity::Error,
            Self::DuplicateCondition | Self::UnknownConditionKind | Self::UnknownPredicate => {
                Severity::Warning
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostic {
    pub severity: Severity,
    pub kind: LoadDiagnosticKind,
    pub context: String,
    pub message: String,
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

/// Everything noteworthy that happened while building a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    pub fn push(
        &mut self,
        kind: LoadDiagnosticKind,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(LoadDiagnostic {
            severity: kind.severity(),
            kind,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }

    pub fn of_kind(&self, kind: LoadDiagnosticKind) -> impl Iterator<Item = &LoadDiagnostic> {
        self.diagnostics.iter().filter(move |diag| diag.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_kind() {
        let mut report = LoadReport::default();
        report.push(LoadDiagnosticKind::DuplicateCondition, "UpgradeGroups.g", "dup");
        assert!(!report.has_errors());
        report.push(LoadDiagnosticKind::MalformedEntry, "ItemUpgrades.3", "missing cap");
        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(
            report.diagnostics[1].to_string(),
            "[error] ItemUpgrades.3: missing cap"
        );
    }
}
