//! Draft Battle Engine
//!
//! A two-player, turn-based battle simulator over drafted creature rosters,
//! with typed moves, status and weather effects, and a shared card deck.
//! The heart of the crate is [`resolve_turn`], which turns a game state and a
//! pair of simultaneous actions into a new state plus a log of what happened.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod deck;
pub mod draft;
pub mod errors;
pub mod player;
pub mod pokemon;
pub mod provider;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, CreatureDefinition, DamageClass, EvolutionOption, MoveData, PokemonType, TypeChart,
    TypeRelations, Weather,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{available_actions, ready_for_turn_resolution, resolve_turn};
pub use battle::state::{EffectEvent, EffectKind, GameState, TurnOutcome, TurnRng};

// Core runtime types for a match.
pub use deck::{Card, CardKind, Deck};
pub use draft::{build_game_state, deal_offers, Draft, DRAFT_OFFER_SIZE};
pub use player::{PlayerAction, PlayerState};
pub use pokemon::{PokemonState, StatusCondition};

pub use config::BattleRules;
pub use provider::{CachedProvider, CatalogProvider, CreatureProvider};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, DataError, DataResult,
    DraftError, ProviderError,
};
