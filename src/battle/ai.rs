//! A module for defining AI behaviors for battle opponents.

use crate::battle::engine::available_actions;
use crate::battle::state::GameState;
use crate::deck::CardKind;
use crate::player::{PlayerAction, PlayerState};
use ordered_float::OrderedFloat;
use schema::TypeChart;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the game state and decides on the next action for the given player.
    fn decide_action(&self, player_index: usize, state: &GameState) -> PlayerAction;
}

/// Picks uniformly among the legal actions.
pub struct RandomAI;

impl Behavior for RandomAI {
    fn decide_action(&self, player_index: usize, state: &GameState) -> PlayerAction {
        let actions = available_actions(state, player_index).unwrap_or_default();
        if actions.is_empty() {
            return PlayerAction::Dodge;
        }
        let pick = rand::random_range(0..actions.len());
        actions[pick].clone()
    }
}

/// Greedy scorer: attacks with the best expected damage unless a card or
/// reinforcement is clearly worth more this turn.
pub struct ScoringAI {
    chart: TypeChart,
}

impl ScoringAI {
    pub fn new(chart: TypeChart) -> Self {
        Self { chart }
    }

    /// The core scoring logic. Assigns a floating-point value to a given action.
    fn score_action(&self, action: &PlayerAction, player_index: usize, state: &GameState) -> f32 {
        let player = &state.players[player_index];
        let opponent = &state.players[1 - player_index];

        match action {
            PlayerAction::Attack { move_index } => self.score_move(*move_index, player, opponent),
            // Always worth firing once it's charged.
            PlayerAction::SuperMove => 500.0,
            PlayerAction::UseCard {
                card_id,
                target_bench_index,
            } => self.score_card(card_id, *target_bench_index, player),
            PlayerAction::Reinforcements => {
                let fainted = player.bench.iter().filter(|p| p.is_fainted()).count();
                if fainted > 0 {
                    25.0
                } else {
                    2.0
                }
            }
            PlayerAction::Evolve { .. } => 45.0,
            // A small, positive baseline score.
            PlayerAction::Switch { .. } => 1.0 + rand::random::<f32>() * 0.1,
            PlayerAction::Block => 0.5,
            PlayerAction::Dodge => 0.5,
        }
    }

    fn score_move(&self, move_index: usize, player: &PlayerState, opponent: &PlayerState) -> f32 {
        let (Some(attacker), Some(defender)) = (player.active_pokemon(), opponent.active_pokemon()) else {
            return 0.0;
        };
        let Some(move_data) = attacker.get_move(move_index) else {
            return -1.0;
        };

        let base_power = move_data.power.unwrap_or(0) as f32;
        let effectiveness = self.chart.multiplier(move_data.move_type, defender.types()) as f32;
        // If the opponent is immune, this is a terrible move.
        if effectiveness < 0.1 {
            return -1.0;
        }
        let stab_multiplier = if attacker.types().contains(&move_data.move_type) {
            1.5
        } else {
            1.0
        };
        let accuracy = move_data.accuracy.unwrap_or(101) as f32 / 100.0;

        // Add a small random factor to break ties and prevent repetitive loops.
        let random_factor = 1.0 + (rand::random::<f32>() * 0.1 - 0.05);
        base_power * effectiveness * stab_multiplier * accuracy * random_factor
    }

    fn score_card(&self, card_id: &str, target_bench_index: Option<usize>, player: &PlayerState) -> f32 {
        let Some(card) = player.hand.iter().find(|card| card.id == card_id) else {
            return -1.0;
        };
        let target_index = target_bench_index.unwrap_or(player.active_index);
        let Some(target) = player.bench.get(target_index) else {
            return -1.0;
        };

        match card.kind {
            CardKind::Heal if !target.is_fainted() => {
                let ratio = target.current_hp as f32 / target.max_hp.max(1) as f32;
                if ratio < 0.25 {
                    30.0
                } else {
                    -1.0
                }
            }
            CardKind::Revive if target.is_fainted() => 60.0,
            CardKind::Shield if !target.shielded => 8.0,
            CardKind::Boost if target.boosted_atk_turns == 0 => 12.0,
            CardKind::Draw => 6.0,
            _ => -1.0,
        }
    }

    /// Revive cards aimed at each fainted bench member. The engine's action
    /// list only targets the active slot.
    fn revive_targets(player: &PlayerState) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        for card in player.hand.iter().filter(|card| card.kind == CardKind::Revive) {
            for (bench_index, pokemon) in player.bench.iter().enumerate() {
                if pokemon.is_fainted() {
                    actions.push(PlayerAction::UseCard {
                        card_id: card.id.clone(),
                        target_bench_index: Some(bench_index),
                    });
                }
            }
        }
        actions
    }
}

impl Behavior for ScoringAI {
    fn decide_action(&self, player_index: usize, state: &GameState) -> PlayerAction {
        let mut candidates = available_actions(state, player_index).unwrap_or_default();
        if let Some(player) = state.players.get(player_index) {
            candidates.extend(Self::revive_targets(player));
        }

        candidates
            .into_iter()
            .map(|action| {
                let score = self.score_action(&action, player_index, state);
                (action, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(action, _)| action)
            .unwrap_or(PlayerAction::Dodge)
    }
}
