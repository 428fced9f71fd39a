use thiserror::Error;

/// Main error type for the draft battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error raised while building a match from drafts
    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),
    /// Error related to loading rules, rosters or type charts
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Errors related to player actions handed to the resolver.
///
/// Invalid targets inside a turn are not errors; they are logged no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A player submitted no action for the turn
    #[error("No action chosen for player {player_index}")]
    MissingAction { player_index: usize },
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The match has already been decided
    #[error("The game is already over")]
    GameOver,
    /// Invalid player index
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
}

/// Errors related to turning two drafts into a match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// A player drafted nothing
    #[error("Player '{player}' has an empty bench")]
    EmptyBench { player: String },
}

/// Errors related to reading configuration and creature data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed data in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Errors surfaced by a creature data provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Creature lookup for '{0}' is unavailable: {1}")]
    Unavailable(String, String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;
