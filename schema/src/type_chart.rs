use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Damage relations for one defending type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRelations {
    #[serde(default)]
    pub double_from: Vec<PokemonType>,
    #[serde(default)]
    pub half_from: Vec<PokemonType>,
    #[serde(default)]
    pub zero_from: Vec<PokemonType>,
}

/// Type effectiveness table, keyed by defending type.
///
/// Supplied once per match and treated as immutable for its duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeChart {
    relations: HashMap<PokemonType, TypeRelations>,
}

impl TypeChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical 18-type chart.
    pub fn standard() -> Self {
        let mut chart = Self::new();
        for defending in PokemonType::iter().filter(|t| *t != PokemonType::Typeless) {
            let mut relations = TypeRelations::default();
            for attacking in PokemonType::iter() {
                let multiplier = PokemonType::type_effectiveness(attacking, defending);
                if multiplier == 0.0 {
                    relations.zero_from.push(attacking);
                } else if multiplier > 1.0 {
                    relations.double_from.push(attacking);
                } else if multiplier < 1.0 {
                    relations.half_from.push(attacking);
                }
            }
            chart.insert(defending, relations);
        }
        chart
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    pub fn insert(&mut self, defending: PokemonType, relations: TypeRelations) {
        self.relations.insert(defending, relations);
    }

    pub fn relations(&self, defending: PokemonType) -> Option<&TypeRelations> {
        self.relations.get(&defending)
    }

    /// Combined multiplier of an attack type against every defending type.
    ///
    /// A zero relation from any defending type short-circuits to 0. Types
    /// missing from the chart contribute nothing.
    pub fn multiplier(&self, attack_type: PokemonType, defender_types: &[PokemonType]) -> f64 {
        let mut multiplier = 1.0;
        for defending in defender_types {
            let Some(relations) = self.relations.get(defending) else {
                continue;
            };
            if relations.zero_from.contains(&attack_type) {
                return 0.0;
            }
            if relations.double_from.contains(&attack_type) {
                multiplier *= 2.0;
            }
            if relations.half_from.contains(&attack_type) {
                multiplier *= 0.5;
            }
        }
        multiplier
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
