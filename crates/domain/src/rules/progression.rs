//! Class progression: which features apply at a level, and resource totals.
//!
//! The applier never tracks what it handed out. Instead every produced entry
//! carries a [`FeatureTag`] so the host can later select (and delete) exactly
//! the entries that came from one class.

use serde::{Deserialize, Serialize};

use crate::entities::{ClassDefinition, ClassFeature};

/// Stable identity of an entry produced for a class feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTag {
    pub class_name: String,
    pub feature_name: String,
    pub feature_level: u8,
}

/// Anything that carries a [`FeatureTag`].
pub trait Tagged {
    fn tag(&self) -> &FeatureTag;
}

/// A class feature ready for the host to materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFeature {
    pub tag: FeatureTag,
    pub description: String,
}

impl AppliedFeature {
    fn new(class: &ClassDefinition, level: u8, feature: &ClassFeature) -> Self {
        Self {
            tag: FeatureTag {
                class_name: class.name.clone(),
                feature_name: feature.name.clone(),
                feature_level: level,
            },
            description: feature.description.clone(),
        }
    }
}

impl Tagged for AppliedFeature {
    fn tag(&self) -> &FeatureTag {
        &self.tag
    }
}

impl Tagged for FeatureTag {
    fn tag(&self) -> &FeatureTag {
        self
    }
}

/// Features to add, keep and remove when moving between two levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDiff {
    pub to_add: Vec<AppliedFeature>,
    pub unchanged: Vec<AppliedFeature>,
    /// Only non-empty when the level went down
    pub to_remove: Vec<AppliedFeature>,
}

impl FeatureDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff the feature set of `class` from `from` to `to`.
///
/// A level of 0 means the class is not held, so `from = 0` yields every
/// feature up to `to` as an addition and `to = 0` removes everything.
pub fn compute_feature_diff(class: &ClassDefinition, from: u8, to: u8) -> FeatureDiff {
    let mut diff = FeatureDiff::default();
    for (level, feature) in class.features() {
        let had = level <= from;
        let has = level <= to;
        let applied = AppliedFeature::new(class, level, feature);
        match (had, has) {
            (false, true) => diff.to_add.push(applied),
            (true, true) => diff.unchanged.push(applied),
            (true, false) => diff.to_remove.push(applied),
            (false, false) => {}
        }
    }
    diff
}

/// Running resource totals of a caster class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTotals {
    pub mana: i32,
    pub casting_capacity: i32,
}

/// Sum every progression row at or below `upto`.
pub fn compute_resource_totals(class: &ClassDefinition, upto: u8) -> ResourceTotals {
    class
        .progression
        .iter()
        .filter(|entry| entry.level <= upto)
        .fold(ResourceTotals::default(), |acc, entry| ResourceTotals {
            mana: acc.mana + entry.mana,
            casting_capacity: acc.casting_capacity + entry.casting_capacity,
        })
}

/// Entries produced for `class_name`, for removal when the class is deleted.
pub fn select_class_entries<'a, T: Tagged>(entries: &'a [T], class_name: &str) -> Vec<&'a T> {
    entries
        .iter()
        .filter(|entry| entry.tag().class_name == class_name)
        .collect()
}
