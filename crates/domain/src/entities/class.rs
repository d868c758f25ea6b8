//! Class definitions and their progression tables.

use serde::{Deserialize, Serialize};

/// A feature granted by a class.
///
/// Pure data with no invariants; all fields are public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ClassFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One row of a class progression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionEntry {
    pub level: u8,
    /// Mana granted at this level (added to the running total)
    #[serde(default)]
    pub mana: i32,
    /// Casting capacity granted at this level
    #[serde(default)]
    pub casting_capacity: i32,
    /// Features unlocked at this level
    #[serde(default)]
    pub features: Vec<ClassFeature>,
}

impl ProgressionEntry {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            mana: 0,
            casting_capacity: 0,
            features: Vec::new(),
        }
    }

    pub fn with_resources(mut self, mana: i32, casting_capacity: i32) -> Self {
        self.mana = mana;
        self.casting_capacity = casting_capacity;
        self
    }

    pub fn with_feature(mut self, feature: ClassFeature) -> Self {
        self.features.push(feature);
        self
    }
}

/// A class as authored by the host: a name and its progression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default)]
    pub is_caster: bool,
    #[serde(default)]
    pub progression: Vec<ProgressionEntry>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_caster: false,
            progression: Vec::new(),
        }
    }

    pub fn caster(mut self) -> Self {
        self.is_caster = true;
        self
    }

    pub fn with_entry(mut self, entry: ProgressionEntry) -> Self {
        self.progression.push(entry);
        self
    }

    /// Every feature with its unlock level, in table order.
    pub fn features(&self) -> impl Iterator<Item = (u8, &ClassFeature)> {
        self.progression
            .iter()
            .flat_map(|entry| entry.features.iter().map(move |f| (entry.level, f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_are_listed_with_unlock_level() {
        let class = ClassDefinition::new("Wizard")
            .with_entry(ProgressionEntry::new(1).with_feature(ClassFeature::new("Spellcasting")))
            .with_entry(
                ProgressionEntry::new(3)
                    .with_feature(ClassFeature::new("Sculpt"))
                    .with_feature(ClassFeature::new("Ritualist")),
            );
        let listed: Vec<(u8, &str)> = class.features().map(|(l, f)| (l, f.name.as_str())).collect();
        assert_eq!(listed, vec![(1, "Spellcasting"), (3, "Sculpt"), (3, "Ritualist")]);
    }

    #[test]
    fn deserializes_sparse_rows() {
        let json = r#"{"name":"Fighter","progression":[{"level":1,"features":[{"name":"Valor"}]}]}"#;
        let class: ClassDefinition = serde_json::from_str(json).unwrap();
        assert!(!class.is_caster);
        assert_eq!(class.progression[0].mana, 0);
        assert_eq!(class.progression[0].features[0].name, "Valor");
    }
}
