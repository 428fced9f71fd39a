use crate::config::BattleRules;
use crate::deck::Deck;
use crate::player::PlayerState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use schema::Weather;
use serde::{Deserialize, Serialize};

/// The single unit of truth passed into and returned from turn resolution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameState {
    pub players: [PlayerState; 2],
    pub deck: Deck,
    pub turn_number: u32,
    pub weather: Weather,
    /// Turns left before the weather clears. Always 0 under clear skies.
    pub weather_turns_remaining: u8,
    pub game_over: bool,
    /// `None` while the game is running and when it ends in a tie.
    pub winner_index: Option<usize>,
    pub rules: BattleRules,
}

impl GameState {
    pub fn new(players: [PlayerState; 2], deck: Deck, rules: BattleRules) -> Self {
        Self {
            players,
            deck,
            turn_number: 1,
            weather: Weather::Clear,
            weather_turns_remaining: 0,
            game_over: false,
            winner_index: None,
            rules,
        }
    }

    /// Change the weather. Without a duration the rules' default applies.
    pub fn set_weather(&mut self, weather: Weather, turns: Option<u8>) {
        self.weather = weather;
        self.weather_turns_remaining = match weather {
            Weather::Clear => 0,
            _ => turns.unwrap_or(self.rules.weather_duration),
        };
    }
}

/// Effects the presentation layer animates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Critical,
    SuperEffective,
    NotVeryEffective,
    NoEffect,
    Block,
    Shield,
    Dodge,
    Miss,
    StatusApply,
    StatusDamage,
    StatusCure,
    SuperMove,
    Faint,
    Heal,
    Revive,
    Evolve,
    Reinforcements,
    Switch,
    GameOver,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EffectEvent {
    pub kind: EffectKind,
    pub player_index: Option<usize>,
    pub bench_index: Option<usize>,
}

/// Collects the narration and effect events of one turn, in the order they happen.
#[derive(Debug, Clone, Default)]
pub struct TurnLog {
    logs: Vec<String>,
    events: Vec<EffectEvent>,
}

impl TurnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::debug!("{}", line);
        self.logs.push(line);
    }

    pub fn effect(&mut self, kind: EffectKind, player_index: Option<usize>, bench_index: Option<usize>) {
        self.events.push(EffectEvent {
            kind,
            player_index,
            bench_index,
        });
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<EffectEvent>) {
        (self.logs, self.events)
    }
}

/// Result of resolving one turn.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TurnOutcome {
    pub state: GameState,
    pub logs: Vec<String>,
    pub events: Vec<EffectEvent>,
}

impl TurnOutcome {
    pub fn has_event(&self, kind: EffectKind) -> bool {
        self.events.iter().any(|event| event.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Print all log lines with a header. Handy in tests.
    pub fn print_logs_with_message(&self, message: &str) {
        println!("{}", message);
        for line in &self.logs {
            println!("  {}", line);
        }
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<f64>, index: usize },
}

/// Source of every random decision made while resolving a turn.
///
/// Each roll is a unit value in `[0, 1)` tagged with the reason it was drawn.
/// Scripted sources replay a fixed list of rolls for tests.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random::<f64>(),
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    // Add the reason to the panic message for better debugging!
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
        };
        log::trace!("[RNG] Consumed {} for: {}", outcome, reason);
        outcome
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_outcome(reason) < probability
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64, reason: &str) -> f64 {
        min + (max - min) * self.next_outcome(reason)
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn index(&mut self, len: usize, reason: &str) -> usize {
        let raw = (self.next_outcome(reason) * len as f64).floor() as usize;
        raw.min(len.saturating_sub(1))
    }

    /// Seeded sources shuffle with the underlying generator. Scripted sources
    /// run Fisher-Yates over [`TurnRng::index`] so tests can pin the order.
    pub fn shuffle<T>(&mut self, items: &mut [T], reason: &str) {
        if let RngSource::Seeded(rng) = &mut self.source {
            items.shuffle(rng);
            log::trace!("[RNG] Shuffled {} items for: {}", items.len(), reason);
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1, reason);
            items.swap(i, j);
        }
    }
}
