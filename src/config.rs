//! Tunable battle rules.
//!
//! Every constant the engine uses lives here so a match can be configured
//! from a RON file. [`BattleRules::default`] carries the standard values.

use crate::errors::{DataError, DataResult};
use schema::TypeChart;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleRules {
    /// Level used by the damage formula. There is no leveling system.
    pub level: u32,
    /// Cards dealt to each player when the match is built.
    pub initial_hand_size: usize,
    /// Turns a freshly applied status lasts.
    pub status_duration: u8,
    pub attacker_gauge_gain: u8,
    pub defender_gauge_gain: u8,
    pub gauge_max: u8,
    pub super_move_power: u16,
    /// Flat multiplier applied on top of a super move's calculated damage.
    pub super_move_multiplier: f64,
    pub boost_multiplier: f64,
    /// Turns a weather change lasts when no duration is given.
    pub weather_duration: u8,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            level: 50,
            initial_hand_size: 3,
            status_duration: 3,
            attacker_gauge_gain: 10,
            defender_gauge_gain: 5,
            gauge_max: 100,
            super_move_power: 150,
            super_move_multiplier: 1.5,
            boost_multiplier: 1.2,
            weather_duration: 5,
        }
    }
}

impl BattleRules {
    pub fn from_ron_str(source: &str) -> DataResult<Self> {
        ron::from_str(source).map_err(|source| DataError::Parse {
            origin: "rules".to_string(),
            source,
        })
    }

    /// Load rules from a RON file. Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> DataResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::from_ron_str(&content)?;
        log::debug!("Loaded battle rules from {}", path.display());
        Ok(rules)
    }
}

/// Load a type chart override. The file maps each defending type to its relations.
pub fn load_type_chart(path: &Path) -> DataResult<TypeChart> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let chart = TypeChart::from_ron_str(&content).map_err(|source| DataError::Parse {
        origin: path.display().to_string(),
        source,
    })?;
    log::debug!("Loaded type chart with {} entries from {}", chart.len(), path.display());
    Ok(chart)
}
