//! Defense system - Armor multipliers and elemental resistances

mod armour;
mod resistance;

pub use armour::apply_armor;
pub use resistance::{apply_resistance, ResistanceTable};
