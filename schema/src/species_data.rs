use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
}

impl fmt::Display for DamageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageClass::Physical => write!(f, "Physical"),
            DamageClass::Special => write!(f, "Special"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

/// Most moves a creature can know.
pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: u32,
    pub name: String,
    pub move_type: PokemonType,
    pub power: Option<u16>,
    /// `None` means the move never misses.
    pub accuracy: Option<u8>,
    pub damage_class: DamageClass,
    #[serde(default)]
    pub effect: Option<String>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.power.is_some_and(|power| power > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionOption {
    pub name: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// Immutable creature data as supplied by the creature data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureDefinition {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprite: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub evolutions: Vec<EvolutionOption>,
}

impl CreatureDefinition {
    /// Drop moves that deal no damage and keep the strongest [`MAX_MOVES`].
    /// Moves of equal power keep their listed order.
    pub fn normalize_moves(&mut self) {
        self.moves.retain(MoveData::is_damaging);
        self.moves.sort_by(|a, b| b.power.cmp(&a.power));
        self.moves.truncate(MAX_MOVES);
    }

    pub fn can_evolve_into(&self, name: &str) -> bool {
        self.evolutions
            .iter()
            .any(|evo| evo.name.eq_ignore_ascii_case(name))
    }
}
