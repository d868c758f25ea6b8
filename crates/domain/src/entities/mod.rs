//! Domain entities - the actors, classes and gear the rules operate on

mod character;
mod class;
mod gear;

pub use character::{Actor, Character, Npc, SlotBonus, StatBonuses};
pub use class::{ClassDefinition, ClassFeature, ProgressionEntry};
pub use gear::{apply_armor, slots_used, Armor, Coins, Grip, Slotted, Weapon};
