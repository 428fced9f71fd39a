use crate::battle::state::TurnRng;
use crate::pokemon::{PokemonState, StatusCondition};

pub const THAW_CHANCE: f64 = 0.20;
pub const WAKE_CHANCE: f64 = 0.33;
pub const FULL_PARALYSIS_CHANCE: f64 = 0.25;
/// Per-turn recovery chance for a status with no countdown.
pub const UNTIMED_RECOVERY_CHANCE: f64 = 0.30;

/// Why a combatant lost its move this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPrevention {
    Frozen,
    Asleep,
    FullyParalyzed,
}

/// Result of the pre-move status gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCheck {
    pub prevented: Option<ActionPrevention>,
    /// Status that wore off during the check (thaw or wake-up).
    pub cleared: Option<StatusCondition>,
}

impl StatusCheck {
    pub fn can_act(&self) -> bool {
        self.prevented.is_none()
    }
}

/// Pre-move gate. Freeze and sleep may clear and let the combatant act;
/// paralysis may stop it outright. Burn and poison never block a move.
///
/// Consumes one roll for freeze, sleep and paralysis, none otherwise.
pub fn check_status_effects(pokemon: &mut PokemonState, rng: &mut TurnRng) -> StatusCheck {
    match pokemon.status {
        Some(StatusCondition::Freeze) => {
            if rng.chance(THAW_CHANCE, "Thaw Check") {
                StatusCheck {
                    prevented: None,
                    cleared: pokemon.clear_status(),
                }
            } else {
                StatusCheck {
                    prevented: Some(ActionPrevention::Frozen),
                    cleared: None,
                }
            }
        }
        Some(StatusCondition::Sleep) => {
            if rng.chance(WAKE_CHANCE, "Wake Check") {
                StatusCheck {
                    prevented: None,
                    cleared: pokemon.clear_status(),
                }
            } else {
                StatusCheck {
                    prevented: Some(ActionPrevention::Asleep),
                    cleared: None,
                }
            }
        }
        Some(StatusCondition::Paralyze) => {
            if rng.chance(FULL_PARALYSIS_CHANCE, "Paralysis Check") {
                StatusCheck {
                    prevented: Some(ActionPrevention::FullyParalyzed),
                    cleared: None,
                }
            } else {
                StatusCheck::default()
            }
        }
        Some(StatusCondition::Burn) | Some(StatusCondition::Poison) | None => StatusCheck::default(),
    }
}

/// End-of-turn damage for the current status.
pub fn status_damage(pokemon: &PokemonState) -> u16 {
    match pokemon.status {
        Some(StatusCondition::Burn) => (pokemon.max_hp / 16).max(1),
        Some(StatusCondition::Poison) => (pokemon.max_hp / 8).max(1),
        _ => 0,
    }
}

/// Advance the status countdown by one turn. Returns the status if it wore off.
///
/// A status without a countdown gets a random recovery roll instead.
pub fn tick_status(pokemon: &mut PokemonState, rng: &mut TurnRng) -> Option<StatusCondition> {
    pokemon.status?;
    match pokemon.status_turns_remaining {
        Some(turns) => {
            let remaining = turns.saturating_sub(1);
            if remaining == 0 {
                pokemon.clear_status()
            } else {
                pokemon.status_turns_remaining = Some(remaining);
                None
            }
        }
        None => {
            if rng.chance(UNTIMED_RECOVERY_CHANCE, "Status Recovery") {
                pokemon.clear_status()
            } else {
                None
            }
        }
    }
}
