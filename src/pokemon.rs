use schema::{BaseStats, CreatureDefinition, MoveData, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCondition {
    Burn,
    Poison,
    Sleep,
    Freeze,
    Paralyze,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCondition::Burn => "burn",
            StatusCondition::Poison => "poison",
            StatusCondition::Sleep => "sleep",
            StatusCondition::Freeze => "freeze",
            StatusCondition::Paralyze => "paralysis",
        };
        write!(f, "{}", name)
    }
}

/// One creature's in-battle condition, wrapping its immutable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonState {
    pub pokemon: CreatureDefinition,
    pub max_hp: u16,
    pub current_hp: u16,
    pub fainted: bool,
    /// One-shot: halves the next incoming hit.
    pub shielded: bool,
    pub boosted_atk_turns: u8,
    pub status: Option<StatusCondition>,
    pub status_turns_remaining: Option<u8>,
    pub friendship: u32,
    pub times_used: u32,
    /// Live stat snapshot used by damage and speed checks.
    pub stats: BaseStats,
}

impl PokemonState {
    /// Create a combatant at full health. Max HP is twice the base HP stat.
    pub fn new(pokemon: CreatureDefinition) -> Self {
        let max_hp = Self::derive_max_hp(&pokemon);
        let stats = pokemon.base_stats;
        Self {
            pokemon,
            max_hp,
            current_hp: max_hp,
            fainted: false,
            shielded: false,
            boosted_atk_turns: 0,
            status: None,
            status_turns_remaining: None,
            friendship: 0,
            times_used: 0,
            stats,
        }
    }

    fn derive_max_hp(pokemon: &CreatureDefinition) -> u16 {
        pokemon.base_stats.hp.saturating_mul(2)
    }

    pub fn name(&self) -> &str {
        &self.pokemon.name
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.pokemon.types
    }

    pub fn speed(&self) -> u16 {
        self.stats.speed
    }

    pub fn get_move(&self, move_index: usize) -> Option<&MoveData> {
        self.pokemon.moves.get(move_index)
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    /// Subtract damage, flooring at 0 HP.
    /// Returns true only when this hit caused the faint.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 && !self.fainted {
            self.fainted = true;
            return true;
        }
        false
    }

    /// Heal up to max HP. Fainted combatants cannot be healed.
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.fainted {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp - before
    }

    /// Bring a fainted combatant back with the given HP (at least 1).
    pub fn revive(&mut self, hp: u16) {
        self.fainted = false;
        self.current_hp = hp.clamp(1, self.max_hp.max(1));
    }

    pub fn apply_status(&mut self, status: StatusCondition, turns: u8) {
        self.status = Some(status);
        self.status_turns_remaining = Some(turns);
    }

    pub fn clear_status(&mut self) -> Option<StatusCondition> {
        self.status_turns_remaining = None;
        self.status.take()
    }

    /// Rebuild this combatant around a new definition.
    ///
    /// Battle progress (HP, flags, counters, status) carries over; max HP and
    /// stats come from the new definition.
    pub fn evolve_into(&self, evolved: CreatureDefinition) -> PokemonState {
        let max_hp = Self::derive_max_hp(&evolved);
        let stats = evolved.base_stats;
        PokemonState {
            pokemon: evolved,
            max_hp,
            current_hp: self.current_hp.min(max_hp),
            fainted: self.fainted,
            shielded: self.shielded,
            boosted_atk_turns: self.boosted_atk_turns,
            status: self.status,
            status_turns_remaining: self.status_turns_remaining,
            friendship: self.friendship,
            times_used: self.times_used,
            stats,
        }
    }
}

impl fmt::Display for PokemonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} HP {}/{}", self.name(), self.current_hp, self.max_hp)?;
        if self.fainted {
            write!(f, " (fainted)")?;
        } else if let Some(status) = self.status {
            write!(f, " [{}]", status)?;
        }
        Ok(())
    }
}
