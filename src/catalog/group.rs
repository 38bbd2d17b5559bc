use serde::Serialize;

use crate::rules::Predicate;

/// How one condition of an upgrade group contributes to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum ConditionKind {
    /// Code 0: the upgrade is hidden when the predicate holds.
    ExcludeIfTrue,
    /// Code 1: the upgrade is offered when any of these predicates holds.
    RequireAnyTrue,
    /// Code 2: the upgrade is hidden unless the predicate holds.
    ExcludeUnlessTrue,
    /// Any other code. Contributes nothing.
    Ignored(i64),
}

impl ConditionKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::ExcludeIfTrue,
            1 => Self::RequireAnyTrue,
            2 => Self::ExcludeUnlessTrue,
            other => Self::Ignored(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::ExcludeIfTrue => 0,
            Self::RequireAnyTrue => 1,
            Self::ExcludeUnlessTrue => 2,
            Self::Ignored(code) => *code,
        }
    }
}

impl From<ConditionKind> for i64 {
    fn from(kind: ConditionKind) -> Self {
        kind.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub name: String,
    /// `None` when the name is outside the predicate vocabulary; such a condition is false.
    #[serde(skip)]
    pub predicate: Option<Predicate>,
    pub kind: ConditionKind,
}

/// Named rule bundle. Conditions are keyed by exact name: re-inserting a name replaces its
/// kind and keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeGroup {
    pub name: String,
    conditions: Vec<Condition>,
}

impl UpgradeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
        }
    }

    /// Returns the kind that was replaced, if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, kind: ConditionKind) -> Option<ConditionKind> {
        let name = name.into();
        if let Some(existing) = self.conditions.iter_mut().find(|c| c.name == name) {
            return Some(std::mem::replace(&mut existing.kind, kind));
        }
        let predicate = name.parse().ok();
        self.conditions.push(Condition {
            name,
            predicate,
            kind,
        });
        None
    }

    pub fn with(mut self, name: &str, kind: ConditionKind) -> Self {
        self.insert(name, kind);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn kind_of(&self, name: &str) -> Option<ConditionKind> {
        self.conditions
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.kind)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_keep_position_and_take_last_kind() {
        let mut group = UpgradeGroup::new("rocket_upgrades");
        assert_eq!(group.insert("rocket", ConditionKind::RequireAnyTrue), None);
        group.insert("melee", ConditionKind::ExcludeIfTrue);
        assert_eq!(
            group.insert("rocket", ConditionKind::ExcludeUnlessTrue),
            Some(ConditionKind::RequireAnyTrue)
        );
        let names: Vec<&str> = group.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["rocket", "melee"]);
        assert_eq!(group.kind_of("rocket"), Some(ConditionKind::ExcludeUnlessTrue));
    }

    #[test]
    fn names_are_matched_exactly() {
        let group = UpgradeGroup::new("g")
            .with("Sticky", ConditionKind::RequireAnyTrue)
            .with("sticky", ConditionKind::ExcludeIfTrue);
        assert_eq!(group.len(), 2);
        assert_eq!(group.conditions()[0].predicate, Some(Predicate::Sticky));
    }

    #[test]
    fn unknown_names_have_no_predicate() {
        let group = UpgradeGroup::new("g").with("laser_beam", ConditionKind::RequireAnyTrue);
        assert_eq!(group.conditions()[0].predicate, None);
        assert_eq!(ConditionKind::from_code(5), ConditionKind::Ignored(5));
    }
}
