use crate::battle::engine::resolve_turn;
use crate::battle::state::{GameState, TurnOutcome, TurnRng};
use crate::config::BattleRules;
use crate::deck::{standard_cards, Card, CardKind, Deck};
use crate::errors::{BattleResult, ProviderError};
use crate::player::{PlayerAction, PlayerState};
use crate::pokemon::PokemonState;
use crate::provider::{CatalogProvider, CreatureProvider};
use async_trait::async_trait;
use schema::{
    BaseStats, CreatureDefinition, DamageClass, EvolutionOption, MoveData, PokemonType, TypeChart,
};

/// A builder for creature definitions with neutral defaults.
///
/// # Example
/// ```ignore
/// let pikachu = CreatureBuilder::new("Pikachu")
///     .types(vec![PokemonType::Electric])
///     .speed(90)
///     .build();
/// ```
pub struct CreatureBuilder {
    id: u32,
    name: String,
    types: Vec<PokemonType>,
    stats: BaseStats,
    moves: Option<Vec<MoveData>>,
    evolutions: Vec<EvolutionOption>,
}

impl CreatureBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            types: vec![PokemonType::Normal],
            stats: BaseStats {
                hp: 50,
                atk: 50,
                def: 50,
                sp_atk: 50,
                sp_def: 50,
                speed: 50,
            },
            moves: None,
            evolutions: Vec::new(),
        }
    }

    pub fn id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    pub fn hp(mut self, hp: u16) -> Self {
        self.stats.hp = hp;
        self
    }

    pub fn atk(mut self, atk: u16) -> Self {
        self.stats.atk = atk;
        self
    }

    pub fn def(mut self, def: u16) -> Self {
        self.stats.def = def;
        self
    }

    pub fn speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    /// Sets the moves. Without this the creature knows a single 40-power Tackle.
    pub fn moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn evolves_into(mut self, name: &str) -> Self {
        self.evolutions.push(EvolutionOption {
            name: name.to_string(),
            condition: None,
        });
        self
    }

    pub fn build(self) -> CreatureDefinition {
        CreatureDefinition {
            id: self.id,
            name: self.name,
            sprite: String::new(),
            types: self.types,
            base_stats: self.stats,
            moves: self
                .moves
                .unwrap_or_else(|| vec![MoveBuilder::new("Tackle", PokemonType::Normal).build()]),
            evolutions: self.evolutions,
        }
    }
}

/// A builder for moves. Defaults to a 40-power, 100-accuracy physical move.
pub struct MoveBuilder {
    data: MoveData,
}

impl MoveBuilder {
    pub fn new(name: &str, move_type: PokemonType) -> Self {
        Self {
            data: MoveData {
                id: 0,
                name: name.to_string(),
                move_type,
                power: Some(40),
                accuracy: Some(100),
                damage_class: DamageClass::Physical,
                effect: None,
            },
        }
    }

    pub fn power(mut self, power: u16) -> Self {
        self.data.power = Some(power);
        self
    }

    pub fn no_power(mut self) -> Self {
        self.data.power = None;
        self
    }

    pub fn accuracy(mut self, accuracy: Option<u8>) -> Self {
        self.data.accuracy = accuracy;
        self
    }

    pub fn special(mut self) -> Self {
        self.data.damage_class = DamageClass::Special;
        self
    }

    pub fn build(self) -> MoveData {
        self.data
    }
}

/// Shorthand for a combatant built from a named creature with the given stats.
pub fn combatant(name: &str, hp: u16, speed: u16) -> PokemonState {
    PokemonState::new(CreatureBuilder::new(name).hp(hp).speed(speed).build())
}

/// Creates a game between two benches with empty hands and an unshuffled deck.
pub fn create_test_game(bench_a: Vec<PokemonState>, bench_b: Vec<PokemonState>) -> GameState {
    let players = [
        PlayerState::new("p1".to_string(), "Player 1".to_string(), bench_a, Vec::new()),
        PlayerState::new("p2".to_string(), "Player 2".to_string(), bench_b, Vec::new()),
    ];
    GameState::new(players, Deck::from_cards(standard_cards()), BattleRules::default())
}

/// First card of the given kind from the standard composition.
pub fn card_of_kind(kind: CardKind) -> Card {
    match standard_cards().into_iter().find(|card| card.kind == kind) {
        Some(card) => card,
        None => panic!("standard deck has no {:?} card", kind),
    }
}

/// Creates a `TurnRng` with a long run of 1.0 rolls.
/// A 1.0 roll never lands a chance, so hits land, nobody crits or dodges,
/// no status sticks, and a speed tie keeps player 0 first.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![1.0; 200])
}

/// Provider that is always down.
pub struct UnavailableProvider;

#[async_trait]
impl CreatureProvider for UnavailableProvider {
    async fn fetch(&self, identifier: &str) -> Result<Option<CreatureDefinition>, ProviderError> {
        Err(ProviderError::Unavailable(
            identifier.to_string(),
            "connection refused".to_string(),
        ))
    }
}

/// Resolve one turn against the standard chart and an empty catalog.
pub async fn resolve(
    state: &GameState,
    actions: [PlayerAction; 2],
    rng: &mut TurnRng,
) -> TurnOutcome {
    let [first, second] = actions;
    assert_ok(
        resolve_turn(
            state,
            [Some(first), Some(second)],
            &TypeChart::standard(),
            &CatalogProvider::default(),
            rng,
        )
        .await,
    )
}

pub fn attack(move_index: usize) -> PlayerAction {
    PlayerAction::Attack { move_index }
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
