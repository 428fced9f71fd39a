// Draft Battle Schema - Shared type definitions
// This crate holds the immutable data contracts that the battle engine reads
// from its external collaborators: creature definitions, moves, elemental
// types, the type effectiveness table and weather.

// Re-export the main types
pub use battle_data::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use type_chart::*;

pub mod battle_data;
pub mod pokemon_types;
pub mod species_data;
pub mod type_chart;
