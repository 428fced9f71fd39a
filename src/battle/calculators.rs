use crate::battle::state::TurnRng;
use crate::config::BattleRules;
use crate::pokemon::{PokemonState, StatusCondition};
use schema::{DamageClass, MoveData, PokemonType, TypeChart, Weather};
use serde::{Deserialize, Serialize};

pub const CRITICAL_HIT_CHANCE: f64 = 0.0625;
pub const CRITICAL_HIT_MULTIPLIER: f64 = 1.5;
pub const STAB_MULTIPLIER: f64 = 1.5;
pub const RANDOM_FACTOR_MIN: f64 = 0.85;
pub const RANDOM_FACTOR_MAX: f64 = 1.0;
pub const BASE_DODGE_CHANCE: f64 = 0.20;
pub const MAX_DODGE_SPEED_BONUS: f64 = 0.15;

/// Every multiplier that went into a damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub stab: f64,
    pub type_effectiveness: f64,
    pub critical: f64,
    pub random_factor: f64,
    pub weather: f64,
}

impl DamageBreakdown {
    pub fn is_critical(&self) -> bool {
        self.critical > 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub damage: u16,
    pub breakdown: DamageBreakdown,
    /// Status rolled by the hit. The resolver applies it only if the defender survives.
    pub status_to_apply: Option<StatusCondition>,
}

/// Secondary status a move of this type may inflict, with its chance.
pub fn status_chance(move_type: PokemonType) -> Option<(StatusCondition, f64)> {
    match move_type {
        PokemonType::Fire => Some((StatusCondition::Burn, 0.10)),
        PokemonType::Electric => Some((StatusCondition::Paralyze, 0.10)),
        PokemonType::Ice => Some((StatusCondition::Freeze, 0.10)),
        PokemonType::Poison => Some((StatusCondition::Poison, 0.10)),
        PokemonType::Psychic => Some((StatusCondition::Sleep, 0.05)),
        _ => None,
    }
}

/// The move a player unleashes with a full gauge.
pub fn super_move(rules: &BattleRules) -> MoveData {
    MoveData {
        id: 0,
        name: "Super Move".to_string(),
        move_type: PokemonType::Typeless,
        power: Some(rules.super_move_power),
        accuracy: Some(100),
        damage_class: DamageClass::Physical,
        effect: None,
    }
}

/// Level-scaled base damage before any multiplier.
pub fn base_damage(attacker: &PokemonState, defender: &PokemonState, move_data: &MoveData, level: u32) -> f64 {
    let (attack, defense) = match move_data.damage_class {
        DamageClass::Physical => (attacker.stats.atk, defender.stats.def),
        DamageClass::Special => (attacker.stats.sp_atk, defender.stats.sp_def),
    };
    let power = move_data.power.unwrap_or(0) as f64;
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    let ratio = attack as f64 / defense.max(1) as f64;
    ((level_factor * power * ratio) / 50.0 + 2.0).floor()
}

/// Roll damage for one hit.
///
/// Rolls are consumed in a fixed order: critical, random factor, then the
/// status infliction roll (only when the move's type carries one and the
/// defender has no status). An immune defender takes 0 and consumes no rolls.
pub fn calculate_damage(
    attacker: &PokemonState,
    defender: &PokemonState,
    move_data: &MoveData,
    chart: &TypeChart,
    weather: Weather,
    level: u32,
    rng: &mut TurnRng,
) -> DamageOutcome {
    let stab = if attacker.types().contains(&move_data.move_type) {
        STAB_MULTIPLIER
    } else {
        1.0
    };
    let type_effectiveness = chart.multiplier(move_data.move_type, defender.types());
    let weather_multiplier = weather.move_multiplier(move_data.move_type);

    if type_effectiveness == 0.0 {
        return DamageOutcome {
            damage: 0,
            breakdown: DamageBreakdown {
                stab,
                type_effectiveness,
                critical: 1.0,
                random_factor: 1.0,
                weather: weather_multiplier,
            },
            status_to_apply: None,
        };
    }

    let critical = if rng.chance(CRITICAL_HIT_CHANCE, "Critical Hit Check") {
        CRITICAL_HIT_MULTIPLIER
    } else {
        1.0
    };
    let random_factor = rng.range(RANDOM_FACTOR_MIN, RANDOM_FACTOR_MAX, "Damage Variance");

    let base = base_damage(attacker, defender, move_data, level);
    let total = base * stab * type_effectiveness * critical * random_factor * weather_multiplier;
    let damage = (total.floor().max(1.0)).min(u16::MAX as f64) as u16;

    let status_to_apply = match (defender.status, status_chance(move_data.move_type)) {
        (None, Some((status, chance))) => {
            if rng.chance(chance, "Status Infliction") {
                Some(status)
            } else {
                None
            }
        }
        _ => None,
    };

    DamageOutcome {
        damage,
        breakdown: DamageBreakdown {
            stab,
            type_effectiveness,
            critical,
            random_factor,
            weather: weather_multiplier,
        },
        status_to_apply,
    }
}

/// Moves without an accuracy, or with an accuracy of 0, always hit and draw no
/// roll. Otherwise hits when roll * 100 <= accuracy.
pub fn accuracy_check(move_data: &MoveData, rng: &mut TurnRng) -> bool {
    let Some(accuracy) = move_data.accuracy.filter(|&accuracy| accuracy > 0) else {
        return true;
    };
    rng.next_outcome("Accuracy Check") * 100.0 <= accuracy as f64
}

/// Chance for a dodging defender to avoid the hit, scaled by the speed gap.
pub fn dodge_chance(defender: &PokemonState, attacker: &PokemonState) -> f64 {
    let speed_gap = (defender.speed() as f64 - attacker.speed() as f64) / 100.0;
    BASE_DODGE_CHANCE + speed_gap.clamp(-MAX_DODGE_SPEED_BONUS, MAX_DODGE_SPEED_BONUS)
}

pub fn dodge_check(defender: &PokemonState, attacker: &PokemonState, rng: &mut TurnRng) -> bool {
    rng.chance(dodge_chance(defender, attacker), "Dodge Check")
}

/// Halve damage for a shield or block. A non-zero hit never drops below 1.
pub fn halve_damage(damage: u16) -> u16 {
    if damage == 0 {
        0
    } else {
        (damage / 2).max(1)
    }
}

/// Scale damage by a flat multiplier, flooring, with the same minimum of 1.
pub fn scale_damage(damage: u16, multiplier: f64) -> u16 {
    if damage == 0 {
        return 0;
    }
    ((damage as f64 * multiplier).floor().max(1.0)).min(u16::MAX as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{CreatureBuilder, MoveBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn combatant(name: &str, types: Vec<PokemonType>) -> PokemonState {
        PokemonState::new(
            CreatureBuilder::new(name)
                .types(types)
                .atk(100)
                .def(100)
                .build(),
        )
    }

    #[test]
    fn test_base_damage_formula() {
        let attacker = combatant("A", vec![PokemonType::Normal]);
        let defender = combatant("B", vec![PokemonType::Normal]);
        let tackle = MoveBuilder::new("Tackle", PokemonType::Normal).power(40).build();
        // ((22 * 40 * 1) / 50 + 2) = 19.6 -> 19
        assert_eq!(base_damage(&attacker, &defender, &tackle, 50), 19.0);
    }

    #[test]
    fn test_special_moves_use_special_stats() {
        let mut attacker = combatant("A", vec![PokemonType::Normal]);
        attacker.stats.sp_atk = 200;
        let defender = combatant("B", vec![PokemonType::Normal]);
        let physical = MoveBuilder::new("Slam", PokemonType::Normal).power(50).build();
        let special = MoveBuilder::new("Beam", PokemonType::Normal)
            .power(50)
            .special()
            .build();
        assert!(
            base_damage(&attacker, &defender, &special, 50)
                > base_damage(&attacker, &defender, &physical, 50)
        );
    }

    #[test]
    fn test_neutral_rolls_apply_stab_and_type() {
        let attacker = combatant("Charmander", vec![PokemonType::Fire]);
        let defender = combatant("Bulbasaur", vec![PokemonType::Grass]);
        let ember = MoveBuilder::new("Ember", PokemonType::Fire).power(40).build();
        let chart = TypeChart::standard();
        // no crit, random factor 1.0, no burn
        let mut rng = TurnRng::new_for_test(vec![1.0, 1.0, 1.0]);

        let outcome = calculate_damage(&attacker, &defender, &ember, &chart, Weather::Clear, 50, &mut rng);

        // 19 * 1.5 * 2 = 57
        assert_eq!(outcome.damage, 57);
        assert_eq!(outcome.breakdown.stab, 1.5);
        assert_eq!(outcome.breakdown.type_effectiveness, 2.0);
        assert!(!outcome.breakdown.is_critical());
        assert_eq!(outcome.status_to_apply, None);
    }

    #[test]
    fn test_critical_hit_and_status_roll() {
        let attacker = combatant("Charmander", vec![PokemonType::Fire]);
        let defender = combatant("Rattata", vec![PokemonType::Normal]);
        let ember = MoveBuilder::new("Ember", PokemonType::Fire).power(40).build();
        let chart = TypeChart::standard();
        let mut rng = TurnRng::new_for_test(vec![0.0, 1.0, 0.05]);

        let outcome = calculate_damage(&attacker, &defender, &ember, &chart, Weather::Clear, 50, &mut rng);

        // 19 * 1.5 * 1.5 = 42.75
        assert_eq!(outcome.damage, 42);
        assert!(outcome.breakdown.is_critical());
        assert_eq!(outcome.status_to_apply, Some(StatusCondition::Burn));
    }

    #[test]
    fn test_statused_defender_skips_the_infliction_roll() {
        let attacker = combatant("Charmander", vec![PokemonType::Fire]);
        let mut defender = combatant("Rattata", vec![PokemonType::Normal]);
        defender.apply_status(StatusCondition::Poison, 3);
        let ember = MoveBuilder::new("Ember", PokemonType::Fire).power(40).build();
        // Only two rolls available: a third request would panic
        let mut rng = TurnRng::new_for_test(vec![1.0, 1.0]);

        let outcome = calculate_damage(
            &attacker,
            &defender,
            &ember,
            &TypeChart::standard(),
            Weather::Clear,
            50,
            &mut rng,
        );
        assert_eq!(outcome.status_to_apply, None);
    }

    #[test]
    fn test_immune_defender_takes_zero_without_rolls() {
        let attacker = combatant("Rattata", vec![PokemonType::Normal]);
        let defender = combatant("Gastly", vec![PokemonType::Ghost, PokemonType::Poison]);
        let tackle = MoveBuilder::new("Tackle", PokemonType::Normal).power(40).build();
        let mut rng = TurnRng::new_for_test(vec![]);

        let outcome = calculate_damage(
            &attacker,
            &defender,
            &tackle,
            &TypeChart::standard(),
            Weather::Clear,
            50,
            &mut rng,
        );
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.breakdown.type_effectiveness, 0.0);
    }

    #[rstest]
    #[case(vec![PokemonType::Normal], 1.0)]
    #[case(vec![PokemonType::Rock], 0.5)]
    #[case(vec![PokemonType::Rock, PokemonType::Steel], 0.25)]
    fn test_damage_never_drops_below_one(#[case] defender_types: Vec<PokemonType>, #[case] expected: f64) {
        let mut attacker = combatant("Weak", vec![PokemonType::Water]);
        attacker.stats.atk = 1;
        let mut defender = combatant("Wall", defender_types);
        defender.stats.def = 500;
        let tackle = MoveBuilder::new("Tackle", PokemonType::Normal).power(10).build();
        let mut rng = TurnRng::new_for_test(vec![1.0, 0.0]);

        let outcome = calculate_damage(
            &attacker,
            &defender,
            &tackle,
            &TypeChart::standard(),
            Weather::Clear,
            50,
            &mut rng,
        );
        assert_eq!(outcome.breakdown.type_effectiveness, expected);
        assert!(outcome.damage >= 1);
    }

    #[rstest]
    #[case(Weather::Sunny, PokemonType::Fire, 1.2)]
    #[case(Weather::Sunny, PokemonType::Water, 0.8)]
    #[case(Weather::Rainy, PokemonType::Water, 1.2)]
    #[case(Weather::Stormy, PokemonType::Electric, 1.3)]
    #[case(Weather::Clear, PokemonType::Fire, 1.0)]
    fn test_weather_lands_in_breakdown(#[case] weather: Weather, #[case] move_type: PokemonType, #[case] expected: f64) {
        let attacker = combatant("A", vec![PokemonType::Normal]);
        let defender = combatant("B", vec![PokemonType::Normal]);
        let attack = MoveBuilder::new("Hit", move_type).power(60).build();
        let mut rng = TurnRng::new_for_test(vec![1.0; 3]);

        let outcome = calculate_damage(&attacker, &defender, &attack, &TypeChart::standard(), weather, 50, &mut rng);
        assert_eq!(outcome.breakdown.weather, expected);
    }

    #[test]
    fn test_moves_without_power_still_deal_minimum_damage() {
        let attacker = combatant("A", vec![PokemonType::Normal]);
        let defender = combatant("B", vec![PokemonType::Normal]);
        let growl = MoveBuilder::new("Growl", PokemonType::Normal).no_power().build();
        let mut rng = TurnRng::new_for_test(vec![1.0, 1.0]);

        let outcome = calculate_damage(&attacker, &defender, &growl, &TypeChart::standard(), Weather::Clear, 50, &mut rng);
        // base 2 with STAB
        assert_eq!(outcome.damage, 3);
    }

    #[rstest]
    #[case(None, 1.0, true)]
    #[case(Some(100), 1.0, true)]
    #[case(Some(90), 0.89, true)]
    #[case(Some(90), 0.91, false)]
    fn test_accuracy_check(#[case] accuracy: Option<u8>, #[case] roll: f64, #[case] hits: bool) {
        let mut attack = MoveBuilder::new("Hit", PokemonType::Normal).power(40).build();
        attack.accuracy = accuracy;
        let mut rng = TurnRng::new_for_test(vec![roll]);
        assert_eq!(accuracy_check(&attack, &mut rng), hits);
    }

    #[test]
    fn test_zero_accuracy_always_hits_without_a_roll() {
        let mut attack = MoveBuilder::new("Swift", PokemonType::Normal).power(60).build();
        attack.accuracy = Some(0);
        // An empty script panics on any roll
        let mut rng = TurnRng::new_for_test(vec![]);
        assert!(accuracy_check(&attack, &mut rng));
    }

    #[rstest]
    #[case(100, 100, 0.20)]
    #[case(150, 100, 0.35)]
    #[case(300, 10, 0.35)]
    #[case(10, 300, 0.05)]
    fn test_dodge_chance_is_clamped(#[case] defender_speed: u16, #[case] attacker_speed: u16, #[case] expected: f64) {
        let defender = PokemonState::new(CreatureBuilder::new("D").speed(defender_speed).build());
        let attacker = PokemonState::new(CreatureBuilder::new("A").speed(attacker_speed).build());
        assert!((dodge_chance(&defender, &attacker) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_halving_and_scaling_floors() {
        assert_eq!(halve_damage(0), 0);
        assert_eq!(halve_damage(1), 1);
        assert_eq!(halve_damage(9), 4);
        assert_eq!(scale_damage(0, 1.5), 0);
        assert_eq!(scale_damage(10, 1.5), 15);
        assert_eq!(scale_damage(7, 1.5), 10);
    }

    #[test]
    fn test_super_move_shape() {
        let rules = BattleRules::default();
        let super_move = super_move(&rules);
        assert_eq!(super_move.power, Some(150));
        assert_eq!(super_move.accuracy, Some(100));
        assert_eq!(super_move.move_type, PokemonType::Typeless);
        assert_eq!(super_move.damage_class, DamageClass::Physical);
    }
}
