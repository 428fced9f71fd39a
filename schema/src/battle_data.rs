use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Sunny,
    Rainy,
    Stormy,
}

impl Weather {
    /// Damage multiplier this weather applies to a move of the given type.
    pub fn move_multiplier(self, move_type: PokemonType) -> f64 {
        match (self, move_type) {
            (Weather::Sunny, PokemonType::Fire) => 1.2,
            (Weather::Sunny, PokemonType::Water) => 0.8,
            (Weather::Rainy, PokemonType::Water) => 1.2,
            (Weather::Rainy, PokemonType::Fire) => 0.8,
            (Weather::Stormy, PokemonType::Electric) => 1.3,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Clear => "clear skies",
            Weather::Sunny => "harsh sunlight",
            Weather::Rainy => "rain",
            Weather::Stormy => "a thunderstorm",
        };

        write!(f, "{}", display_name)
    }
}
