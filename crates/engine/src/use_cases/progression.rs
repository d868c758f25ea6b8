//! Class progression use cases.

use serde::Serialize;
use vagabond_domain::rules::{AppliedFeature, Tagged};
use vagabond_domain::{
    compute_feature_diff, compute_resource_totals, select_class_entries, ClassDefinition,
    FeatureDiff, ResourceTotals,
};

/// What changes when a character's level in a class moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionReport {
    pub class_name: String,
    pub from: u8,
    pub to: u8,
    pub diff: FeatureDiff,
    /// Resource totals at the target level, for caster classes
    pub resources: Option<ResourceTotals>,
}

/// Compute feature and resource changes for a class level change.
#[derive(Debug, Default)]
pub struct ApplyClassLevel;

impl ApplyClassLevel {
    pub fn new() -> Self {
        Self
    }

    /// `from = 0` adds the class; `to = 0` removes everything it granted.
    pub fn execute(&self, class: &ClassDefinition, from: u8, to: u8) -> ProgressionReport {
        let diff = compute_feature_diff(class, from, to);
        let resources = class
            .is_caster
            .then(|| compute_resource_totals(class, to));

        tracing::info!(
            class = %class.name,
            from,
            to,
            added = diff.to_add.len(),
            removed = diff.to_remove.len(),
            "Class level applied"
        );

        ProgressionReport {
            class_name: class.name.clone(),
            from,
            to,
            diff,
            resources,
        }
    }

    /// Entries previously produced for `class_name`, to delete with the class.
    pub fn entries_for_removal<'a, T: Tagged>(
        &self,
        entries: &'a [T],
        class_name: &str,
    ) -> Vec<&'a T> {
        let selected = select_class_entries(entries, class_name);
        tracing::info!(
            class = %class_name,
            entries = selected.len(),
            "Class entries selected for removal"
        );
        selected
    }
}

/// Names of applied features, in order.
pub fn feature_names(features: &[AppliedFeature]) -> Vec<&str> {
    features
        .iter()
        .map(|f| f.tag.feature_name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use vagabond_domain::{ClassFeature, ProgressionEntry};

    use super::*;

    fn wizard() -> ClassDefinition {
        ClassDefinition::new("Wizard")
            .caster()
            .with_entry(
                ProgressionEntry::new(1)
                    .with_resources(4, 1)
                    .with_feature(ClassFeature::new("Spellcasting")),
            )
            .with_entry(ProgressionEntry::new(2).with_resources(2, 0))
            .with_entry(
                ProgressionEntry::new(3)
                    .with_resources(2, 1)
                    .with_feature(ClassFeature::new("Sculpt Spell")),
            )
    }

    #[test]
    fn adding_a_caster_class_reports_resources() {
        let report = ApplyClassLevel::new().execute(&wizard(), 0, 3);
        assert_eq!(feature_names(&report.diff.to_add), vec!["Spellcasting", "Sculpt Spell"]);
        assert_eq!(
            report.resources,
            Some(ResourceTotals {
                mana: 8,
                casting_capacity: 2
            })
        );
    }

    #[test]
    fn non_casters_have_no_resources() {
        let fighter = ClassDefinition::new("Fighter")
            .with_entry(ProgressionEntry::new(1).with_feature(ClassFeature::new("Valor")));
        let report = ApplyClassLevel::new().execute(&fighter, 0, 1);
        assert!(report.resources.is_none());
    }

    #[test]
    fn removal_selects_only_that_class() {
        let applier = ApplyClassLevel::new();
        let fighter = ClassDefinition::new("Fighter")
            .with_entry(ProgressionEntry::new(1).with_feature(ClassFeature::new("Valor")));
        let mut entries = applier.execute(&wizard(), 0, 3).diff.to_add;
        entries.extend(applier.execute(&fighter, 0, 1).diff.to_add);

        let removed = applier.entries_for_removal(&entries, "Fighter");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].tag.feature_name, "Valor");
    }
}
