use crate::pokemon::PokemonState;
use crate::deck::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active Pokémon's move list.
    Attack { move_index: usize },

    // The index refers to the Pokémon's position in the player's bench.
    Switch { bench_index: usize },

    Dodge,

    Block,

    // Targets the active Pokémon when no bench index is given.
    UseCard {
        card_id: String,
        target_bench_index: Option<usize>,
    },

    Reinforcements,

    Evolve { target_name: String, bench_index: usize },

    SuperMove,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Attack { move_index } => write!(f, "Attack with move #{}", move_index),
            PlayerAction::Switch { bench_index } => write!(f, "Switch to slot {}", bench_index),
            PlayerAction::Dodge => write!(f, "Dodge"),
            PlayerAction::Block => write!(f, "Block"),
            PlayerAction::UseCard { card_id, target_bench_index } => match target_bench_index {
                Some(index) => write!(f, "Use card {} on slot {}", card_id, index),
                None => write!(f, "Use card {}", card_id),
            },
            PlayerAction::Reinforcements => write!(f, "Call reinforcements"),
            PlayerAction::Evolve { target_name, bench_index } => {
                write!(f, "Evolve slot {} into {}", bench_index, target_name)
            }
            PlayerAction::SuperMove => write!(f, "Super move"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: String,
    pub name: String,

    // Drafted combatants, in draft order. Fainted members stay here.
    pub bench: Vec<PokemonState>,

    // Undrafted combatants that reinforcements can pull from.
    pub pool: Vec<PokemonState>,

    // The index of the Pokémon in `bench` that is currently fighting.
    pub active_index: usize,

    pub hand: Vec<Card>,

    // Knockouts scored.
    pub points: u32,

    pub super_move_gauge: u8,
}

impl PlayerState {
    pub fn new(id: String, name: String, bench: Vec<PokemonState>, pool: Vec<PokemonState>) -> Self {
        PlayerState {
            id,
            name,
            bench,
            pool,
            active_index: 0,
            hand: Vec::new(),
            points: 0,
            super_move_gauge: 0,
        }
    }

    /// Get the currently active Pokemon
    pub fn active_pokemon(&self) -> Option<&PokemonState> {
        self.bench.get(self.active_index)
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> Option<&mut PokemonState> {
        self.bench.get_mut(self.active_index)
    }

    pub fn all_fainted(&self) -> bool {
        self.bench.iter().all(|pokemon| pokemon.is_fainted())
    }

    /// First non-fainted bench member, in bench order.
    pub fn first_available(&self) -> Option<usize> {
        self.bench.iter().position(|pokemon| !pokemon.is_fainted())
    }

    /// Sum of current HP across non-fainted bench members.
    pub fn total_remaining_hp(&self) -> u32 {
        self.bench
            .iter()
            .filter(|pokemon| !pokemon.is_fainted())
            .map(|pokemon| pokemon.current_hp as u32)
            .sum()
    }

    /// Remove a card from the hand by id.
    pub fn take_card(&mut self, card_id: &str) -> Option<Card> {
        let position = self.hand.iter().position(|card| card.id == card_id)?;
        Some(self.hand.remove(position))
    }

    pub fn add_gauge(&mut self, amount: u8, max: u8) {
        self.super_move_gauge = self.super_move_gauge.saturating_add(amount).min(max);
    }

    pub fn super_move_ready(&self, max: u8) -> bool {
        self.super_move_gauge >= max
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} | points: {} | gauge: {} | hand: {} cards",
            self.name,
            self.points,
            self.super_move_gauge,
            self.hand.len()
        )?;
        for (i, pokemon) in self.bench.iter().enumerate() {
            let marker = if i == self.active_index { "*" } else { " " };
            writeln!(f, " {} {}. {}", marker, i, pokemon)?;
        }
        Ok(())
    }
}
