use crate::battle::calculators::{
    accuracy_check, calculate_damage, dodge_check, halve_damage, scale_damage, super_move,
};
use crate::battle::conditions::{check_status_effects, status_damage, tick_status, ActionPrevention};
use crate::battle::state::{EffectKind, GameState, TurnLog, TurnOutcome, TurnRng};
use crate::deck::{Card, CardKind};
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::player::PlayerAction;
use crate::pokemon::StatusCondition;
use crate::provider::CreatureProvider;
use schema::{TypeChart, Weather};

/// Per-turn flags recorded during the action phase and read by the attack phase.
#[derive(Debug, Clone, Copy, Default)]
struct TurnFlags {
    just_switched: [bool; 2],
    blocking: [bool; 2],
    dodging: [bool; 2],
    super_move: [bool; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttackKind {
    Move(usize),
    Super,
}

#[derive(Debug, Clone, Copy)]
struct AttackOrder {
    player_index: usize,
    kind: AttackKind,
}

/// Every action a player may legally submit right now.
pub fn available_actions(state: &GameState, player_index: usize) -> BattleResult<Vec<PlayerAction>> {
    let player = state
        .players
        .get(player_index)
        .ok_or(BattleStateError::InvalidPlayerIndex(player_index))?;
    if state.game_over {
        return Ok(Vec::new());
    }

    let mut actions = Vec::new();

    // --- Attacks ---
    if let Some(active) = player.active_pokemon().filter(|p| !p.is_fainted()) {
        for move_index in 0..active.pokemon.moves.len() {
            actions.push(PlayerAction::Attack { move_index });
        }
        if player.super_move_ready(state.rules.gauge_max) {
            actions.push(PlayerAction::SuperMove);
        }
    }

    // --- Switches ---
    for (bench_index, pokemon) in player.bench.iter().enumerate() {
        if bench_index != player.active_index && !pokemon.is_fainted() {
            actions.push(PlayerAction::Switch { bench_index });
        }
    }

    actions.push(PlayerAction::Dodge);
    actions.push(PlayerAction::Block);

    // --- Cards ---
    for card in &player.hand {
        actions.push(PlayerAction::UseCard {
            card_id: card.id.clone(),
            target_bench_index: None,
        });
    }

    if !player.pool.is_empty() {
        actions.push(PlayerAction::Reinforcements);
    }

    // --- Evolutions ---
    for (bench_index, pokemon) in player.bench.iter().enumerate() {
        if pokemon.is_fainted() {
            continue;
        }
        for evolution in &pokemon.pokemon.evolutions {
            actions.push(PlayerAction::Evolve {
                target_name: evolution.name.clone(),
                bench_index,
            });
        }
    }

    Ok(actions)
}

/// Check if a turn can be resolved with the given submissions
pub fn ready_for_turn_resolution(state: &GameState, actions: &[Option<PlayerAction>; 2]) -> bool {
    !state.game_over && actions.iter().all(Option::is_some)
}

/// Main entry point for turn resolution.
///
/// Borrows the incoming state and returns a freshly owned, fully resolved
/// one together with the turn's narration and effect events. The only
/// suspension point is the creature lookup behind an evolve action.
pub async fn resolve_turn<P>(
    state: &GameState,
    actions: [Option<PlayerAction>; 2],
    chart: &TypeChart,
    provider: &P,
    rng: &mut TurnRng,
) -> BattleResult<TurnOutcome>
where
    P: CreatureProvider + ?Sized,
{
    if state.game_over {
        return Err(BattleStateError::GameOver.into());
    }
    let [first, second] = actions;
    let actions = [
        first.ok_or(ActionError::MissingAction { player_index: 0 })?,
        second.ok_or(ActionError::MissingAction { player_index: 1 })?,
    ];

    let mut state = state.clone();
    let mut log = TurnLog::new();

    // 1. Initialization
    initialize_turn(&state, &actions, &mut log);

    // 2. Non-attack actions, player 0 first
    let flags = execute_action_phase(&mut state, &actions, provider, &mut log, rng).await;

    // 3. Attacks in speed order
    execute_attack_phase(&mut state, &actions, &flags, chart, &mut log, rng);

    // 4. End-of-turn status, replacements and the win check
    execute_end_turn_phase(&mut state, &mut log, rng);

    // 5. Counters and turn advance
    finalize_turn(&mut state, &mut log);

    let (logs, events) = log.into_parts();
    Ok(TurnOutcome { state, logs, events })
}

fn initialize_turn(state: &GameState, actions: &[PlayerAction; 2], log: &mut TurnLog) {
    log::debug!(
        "Resolving turn {}: {} chose '{}', {} chose '{}'",
        state.turn_number,
        state.players[0].name,
        actions[0],
        state.players[1].name,
        actions[1]
    );
    log.log(format!("Turn {}", state.turn_number));
}

async fn execute_action_phase<P>(
    state: &mut GameState,
    actions: &[PlayerAction; 2],
    provider: &P,
    log: &mut TurnLog,
    rng: &mut TurnRng,
) -> TurnFlags
where
    P: CreatureProvider + ?Sized,
{
    let mut flags = TurnFlags::default();

    for (player_index, action) in actions.iter().enumerate() {
        match action {
            PlayerAction::Switch { bench_index } => {
                if execute_switch(state, player_index, *bench_index, log) {
                    flags.just_switched[player_index] = true;
                }
            }
            PlayerAction::UseCard {
                card_id,
                target_bench_index,
            } => execute_use_card(state, player_index, card_id, *target_bench_index, log, rng),
            PlayerAction::Reinforcements => execute_reinforcements(state, player_index, log, rng),
            PlayerAction::Evolve {
                target_name,
                bench_index,
            } => execute_evolve(state, player_index, target_name, *bench_index, provider, log).await,
            PlayerAction::Block => {
                let player = &mut state.players[player_index];
                let active_index = player.active_index;
                if let Some(active) = player.active_pokemon_mut() {
                    active.shielded = true;
                }
                flags.blocking[player_index] = true;
                log.log(format!("{} used Block", player.name));
                log.effect(EffectKind::Block, Some(player_index), Some(active_index));
            }
            PlayerAction::Dodge => {
                flags.dodging[player_index] = true;
                log.log(format!("{} used Dodge", state.players[player_index].name));
            }
            PlayerAction::SuperMove => {
                let player = &state.players[player_index];
                if player.super_move_ready(state.rules.gauge_max) {
                    flags.super_move[player_index] = true;
                } else {
                    log.log(format!(
                        "{}'s Super Move is not ready ({}/{})",
                        player.name, player.super_move_gauge, state.rules.gauge_max
                    ));
                }
            }
            PlayerAction::Attack { .. } => {}
        }
    }

    flags
}

/// Returns true when the switch went through.
fn execute_switch(state: &mut GameState, player_index: usize, bench_index: usize, log: &mut TurnLog) -> bool {
    let player = &mut state.players[player_index];
    match player.bench.get(bench_index) {
        None => {
            log.log(format!("{} tried to switch to invalid slot", player.name));
            false
        }
        Some(target) if target.is_fainted() => {
            log.log(format!("{} tried to switch to a fainted Pokemon", player.name));
            false
        }
        Some(target) => {
            let line = format!("{} swapped to {}", player.name, target.name());
            player.active_index = bench_index;
            log.log(line);
            log.effect(EffectKind::Switch, Some(player_index), Some(bench_index));
            true
        }
    }
}

fn execute_use_card(
    state: &mut GameState,
    player_index: usize,
    card_id: &str,
    target_bench_index: Option<usize>,
    log: &mut TurnLog,
    rng: &mut TurnRng,
) {
    let Some(card) = state.players[player_index].take_card(card_id) else {
        log.log(format!("{} tried to use a missing card", state.players[player_index].name));
        return;
    };

    apply_card(state, player_index, &card, target_bench_index, log, rng);
    state.deck.discard(card);
}

fn apply_card(
    state: &mut GameState,
    player_index: usize,
    card: &Card,
    target_bench_index: Option<usize>,
    log: &mut TurnLog,
    rng: &mut TurnRng,
) {
    match card.kind {
        CardKind::Draw => {
            let drawn = state.deck.draw(card.value.max(0.0) as usize, rng);
            let player = &mut state.players[player_index];
            log.log(format!("{} used {} and drew {} cards", player.name, card.name, drawn.len()));
            player.hand.extend(drawn);
            return;
        }
        CardKind::Evolve | CardKind::Reinforcements => {
            log.log(format!("{} card is no longer supported.", card.name));
            return;
        }
        CardKind::Heal | CardKind::Revive | CardKind::Shield | CardKind::Boost => {}
    }

    let player = &mut state.players[player_index];
    let target_index = target_bench_index.unwrap_or(player.active_index);
    let player_name = player.name.clone();
    let Some(target) = player.bench.get_mut(target_index) else {
        log.log(format!("{} failed: no Pokemon in slot {}", card.name, target_index));
        return;
    };
    let magnitude = ((target.max_hp as f64 * card.value).floor() as u16).max(1);

    match card.kind {
        CardKind::Heal => {
            if target.is_fainted() {
                log.log(format!("{} failed: {} has fainted", card.name, target.name()));
                return;
            }
            let healed = target.heal(magnitude);
            log.log(format!(
                "{} used {} on {} healed {}",
                player_name,
                card.name,
                target.name(),
                healed
            ));
            log.effect(EffectKind::Heal, Some(player_index), Some(target_index));
        }
        CardKind::Revive => {
            if !target.is_fainted() {
                log.log(format!("{} failed: target wasn't fainted", card.name));
                return;
            }
            target.revive(magnitude);
            log.log(format!("{} revived {}", player_name, target.name()));
            log.effect(EffectKind::Revive, Some(player_index), Some(target_index));
        }
        CardKind::Shield => {
            target.shielded = true;
            log.log(format!("{} used {} on {}", player_name, card.name, target.name()));
            log.effect(EffectKind::Shield, Some(player_index), Some(target_index));
        }
        CardKind::Boost => {
            let turns = card.value.clamp(0.0, u8::MAX as f64) as u8;
            target.boosted_atk_turns = target.boosted_atk_turns.saturating_add(turns);
            log.log(format!("{} used {} on {}", player_name, card.name, target.name()));
        }
        CardKind::Draw | CardKind::Evolve | CardKind::Reinforcements => {}
    }
}

fn execute_reinforcements(state: &mut GameState, player_index: usize, log: &mut TurnLog, rng: &mut TurnRng) {
    let player = &mut state.players[player_index];
    if player.pool.is_empty() {
        log.log("No Pokémon available in the pool.");
        return;
    }

    let pick = rng.index(player.pool.len(), "Reinforcements");
    let mut recruit = player.pool.remove(pick);
    recruit.current_hp = recruit.max_hp;
    recruit.fainted = false;
    log.log(format!(
        "{} used Reinforcements and got a new Pokémon: {}!",
        player.name,
        recruit.name()
    ));
    player.bench.push(recruit);
    log.effect(EffectKind::Reinforcements, Some(player_index), Some(player.bench.len() - 1));
}

async fn execute_evolve<P>(
    state: &mut GameState,
    player_index: usize,
    target_name: &str,
    bench_index: usize,
    provider: &P,
    log: &mut TurnLog,
) where
    P: CreatureProvider + ?Sized,
{
    let player = &mut state.players[player_index];
    let Some(current) = player.bench.get(bench_index) else {
        log.log(format!("{} tried to evolve a non-existent Pokémon.", player.name));
        return;
    };
    if !current.pokemon.can_evolve_into(target_name) {
        log::debug!("{} has no evolution named '{}'", current.name(), target_name);
        log.log(format!("Evolution failed for {}.", current.name()));
        return;
    }

    match provider.fetch(target_name).await {
        Ok(Some(definition)) => {
            let evolved = current.evolve_into(definition);
            log.log(format!("{} evolved into {}!", current.name(), evolved.name()));
            player.bench[bench_index] = evolved;
            log.effect(EffectKind::Evolve, Some(player_index), Some(bench_index));
        }
        Ok(None) => {
            log::debug!("No creature named '{}' for evolution", target_name);
            log.log(format!("Evolution failed for {}.", current.name()));
        }
        Err(err) => {
            log::warn!("Evolution lookup failed: {}", err);
            log.log(format!("Evolution failed for {}.", current.name()));
        }
    }
}

fn execute_attack_phase(
    state: &mut GameState,
    actions: &[PlayerAction; 2],
    flags: &TurnFlags,
    chart: &TypeChart,
    log: &mut TurnLog,
    rng: &mut TurnRng,
) {
    let mut orders = Vec::with_capacity(2);
    for (player_index, action) in actions.iter().enumerate() {
        match action {
            PlayerAction::Attack { move_index } => orders.push(AttackOrder {
                player_index,
                kind: AttackKind::Move(*move_index),
            }),
            PlayerAction::SuperMove if flags.super_move[player_index] => orders.push(AttackOrder {
                player_index,
                kind: AttackKind::Super,
            }),
            _ => {}
        }
    }

    for order in determine_attack_order(state, orders, rng) {
        execute_attack(state, order, flags, chart, log, rng);
    }
}

/// Faster active combatant first. A speed tie is settled by a coin flip.
fn determine_attack_order(state: &GameState, mut orders: Vec<AttackOrder>, rng: &mut TurnRng) -> Vec<AttackOrder> {
    if orders.len() < 2 {
        return orders;
    }
    let speed_of = |order: &AttackOrder| {
        state.players[order.player_index]
            .active_pokemon()
            .map(|pokemon| pokemon.speed())
            .unwrap_or(0)
    };
    let (first_speed, second_speed) = (speed_of(&orders[0]), speed_of(&orders[1]));

    if first_speed == second_speed {
        if rng.chance(0.5, "Speed Tie") {
            orders.swap(0, 1);
        }
    } else {
        orders.sort_by_key(|order| std::cmp::Reverse(speed_of(order)));
    }
    orders
}

fn execute_attack(
    state: &mut GameState,
    order: AttackOrder,
    flags: &TurnFlags,
    chart: &TypeChart,
    log: &mut TurnLog,
    rng: &mut TurnRng,
) {
    let attacker_index = order.player_index;
    let defender_index = 1 - attacker_index;
    let attacker_slot = state.players[attacker_index].active_index;
    let defender_slot = state.players[defender_index].active_index;

    // --- Guards ---
    let (Some(attacker), Some(defender)) = (
        state.players[attacker_index].active_pokemon(),
        state.players[defender_index].active_pokemon(),
    ) else {
        return;
    };
    if attacker.is_fainted() {
        log.log(format!("{} cannot attack (fainted)", attacker.name()));
        return;
    }
    if flags.just_switched[attacker_index] {
        log.log(format!("{} just switched in and can't attack this turn", attacker.name()));
        return;
    }
    if defender.is_fainted() {
        log.log(format!("{} has no target: {} already fainted", attacker.name(), defender.name()));
        return;
    }

    // --- Status gate ---
    let attacker = &mut state.players[attacker_index].bench[attacker_slot];
    let check = check_status_effects(attacker, rng);
    if let Some(cleared) = check.cleared {
        let line = match cleared {
            StatusCondition::Freeze => format!("{} thawed out!", attacker.name()),
            StatusCondition::Sleep => format!("{} woke up!", attacker.name()),
            other => format!("{} recovered from {}", attacker.name(), other),
        };
        log.log(line);
        log.effect(EffectKind::StatusCure, Some(attacker_index), Some(attacker_slot));
    }
    if let Some(reason) = check.prevented {
        let line = match reason {
            ActionPrevention::Frozen => format!("{} is frozen solid!", attacker.name()),
            ActionPrevention::Asleep => format!("{} is fast asleep.", attacker.name()),
            ActionPrevention::FullyParalyzed => format!("{} is fully paralyzed!", attacker.name()),
        };
        log.log(line);
        return;
    }

    // --- Move selection ---
    let is_super = order.kind == AttackKind::Super;
    let move_data = match order.kind {
        AttackKind::Super => {
            let player = &mut state.players[attacker_index];
            player.super_move_gauge = 0;
            log.log(format!("{} unleashes a Super Move!", player.name));
            log.effect(EffectKind::SuperMove, Some(attacker_index), Some(attacker_slot));
            super_move(&state.rules)
        }
        AttackKind::Move(move_index) => match attacker.get_move(move_index) {
            Some(move_data) => move_data.clone(),
            None => {
                log.log(format!("{} tried to use an invalid move", state.players[attacker_index].name));
                return;
            }
        },
    };

    let attacker = &state.players[attacker_index].bench[attacker_slot];
    let defender = &state.players[defender_index].bench[defender_slot];

    // --- Hit checks ---
    if !is_super && !accuracy_check(&move_data, rng) {
        log.log(format!("{} tried to use {} but missed!", attacker.name(), move_data.name));
        log.effect(EffectKind::Miss, Some(attacker_index), Some(attacker_slot));
        return;
    }
    if !is_super && flags.dodging[defender_index] && dodge_check(defender, attacker, rng) {
        log.log(format!(
            "{} dodged {} from {}",
            defender.name(),
            move_data.name,
            attacker.name()
        ));
        log.effect(EffectKind::Dodge, Some(defender_index), Some(defender_slot));
        return;
    }

    // --- Damage ---
    let outcome = calculate_damage(
        attacker,
        defender,
        &move_data,
        chart,
        state.weather,
        state.rules.level,
        rng,
    );
    if outcome.breakdown.is_critical() {
        log.log("A critical hit!");
        log.effect(EffectKind::Critical, Some(defender_index), Some(defender_slot));
    }
    let effectiveness = outcome.breakdown.type_effectiveness;
    if effectiveness == 0.0 {
        log.log(format!("It doesn't affect {}...", defender.name()));
        log.effect(EffectKind::NoEffect, Some(defender_index), Some(defender_slot));
    } else if effectiveness > 1.0 {
        log.log("It's super effective!");
        log.effect(EffectKind::SuperEffective, Some(defender_index), Some(defender_slot));
    } else if effectiveness < 1.0 {
        log.log("It's not very effective...");
        log.effect(EffectKind::NotVeryEffective, Some(defender_index), Some(defender_slot));
    }

    let mut damage = outcome.damage;
    if is_super {
        damage = scale_damage(damage, state.rules.super_move_multiplier);
    }
    if attacker.boosted_atk_turns > 0 {
        damage = scale_damage(damage, state.rules.boost_multiplier);
    }
    let attacker_name = attacker.name().to_string();

    let defender = &mut state.players[defender_index].bench[defender_slot];
    if defender.shielded {
        damage = halve_damage(damage);
        defender.shielded = false;
        log.log(format!("{}'s shield absorbed half the damage", defender.name()));
        log.effect(EffectKind::Shield, Some(defender_index), Some(defender_slot));
    }
    if flags.blocking[defender_index] {
        damage = halve_damage(damage);
        log.log(format!("{} braced against the blow", defender.name()));
    }

    let fainted_now = defender.take_damage(damage);
    log.log(format!(
        "{} used {} on {} dealing {} (HP left {}/{})",
        attacker_name,
        move_data.name,
        defender.name(),
        damage,
        defender.current_hp,
        defender.max_hp
    ));

    if !fainted_now && defender.status.is_none() {
        if let Some(status) = outcome.status_to_apply {
            defender.apply_status(status, state.rules.status_duration);
            log.log(format!("{} was afflicted with {}!", defender.name(), status));
            log.effect(EffectKind::StatusApply, Some(defender_index), Some(defender_slot));
        }
    }
    let defender_name = defender.name().to_string();

    // --- Gauge ---
    let (gauge_max, attacker_gain, defender_gain) = (
        state.rules.gauge_max,
        state.rules.attacker_gauge_gain,
        state.rules.defender_gauge_gain,
    );
    state.players[attacker_index].add_gauge(attacker_gain, gauge_max);
    state.players[defender_index].add_gauge(defender_gain, gauge_max);

    // --- Knockout ---
    if fainted_now {
        log.log(format!("{} fainted!", defender_name));
        log.effect(EffectKind::Faint, Some(defender_index), Some(defender_slot));

        let drawn = state.deck.draw(1, rng);
        let attacker_player = &mut state.players[attacker_index];
        attacker_player.points += 1;
        if !drawn.is_empty() {
            log.log(format!(
                "{} drew a card for knocking out {}",
                attacker_player.name, defender_name
            ));
        }
        attacker_player.hand.extend(drawn);
    }
}

fn execute_end_turn_phase(state: &mut GameState, log: &mut TurnLog, rng: &mut TurnRng) {
    // (a) Status damage and recovery on active combatants
    for player_index in 0..2 {
        let opponent_index = 1 - player_index;
        let player = &mut state.players[player_index];
        let slot = player.active_index;
        let Some(pokemon) = player.bench.get_mut(slot).filter(|p| !p.is_fainted()) else {
            continue;
        };
        let Some(status) = pokemon.status else {
            continue;
        };

        let damage = status_damage(pokemon);
        let mut fainted_now = false;
        if damage > 0 {
            fainted_now = pokemon.take_damage(damage);
            log.log(format!(
                "{} is hurt by its {}! (HP left {}/{})",
                pokemon.name(),
                status,
                pokemon.current_hp,
                pokemon.max_hp
            ));
            log.effect(EffectKind::StatusDamage, Some(player_index), Some(slot));
        }

        if fainted_now {
            log.log(format!("{} fainted!", pokemon.name()));
            log.effect(EffectKind::Faint, Some(player_index), Some(slot));
            state.players[opponent_index].points += 1;
            continue;
        }

        if let Some(cleared) = tick_status(pokemon, rng) {
            log.log(format!("{} recovered from {}", pokemon.name(), cleared));
            log.effect(EffectKind::StatusCure, Some(player_index), Some(slot));
        }
    }

    // (b) Send in replacements for fainted actives
    for player_index in 0..2 {
        let player = &mut state.players[player_index];
        if !player.active_pokemon().is_some_and(|p| p.is_fainted()) {
            continue;
        }
        if let Some(next) = player.first_available() {
            player.active_index = next;
            log.log(format!("{}'s {} is sent out!", player.name, player.bench[next].name()));
            log.effect(EffectKind::Switch, Some(player_index), Some(next));
        }
    }

    // (c) Win check
    check_win_conditions(state, log);
}

/// End the game once a side is wiped out. A double wipe goes to points,
/// then remaining HP, then a tie.
fn check_win_conditions(state: &mut GameState, log: &mut TurnLog) {
    let wiped = [state.players[0].all_fainted(), state.players[1].all_fainted()];
    let winner = match wiped {
        [false, false] => return,
        [true, false] => Some(1),
        [false, true] => Some(0),
        [true, true] => {
            let (p0, p1) = (&state.players[0], &state.players[1]);
            if p0.points != p1.points {
                Some(if p0.points > p1.points { 0 } else { 1 })
            } else {
                let (hp0, hp1) = (p0.total_remaining_hp(), p1.total_remaining_hp());
                match hp0.cmp(&hp1) {
                    std::cmp::Ordering::Greater => Some(0),
                    std::cmp::Ordering::Less => Some(1),
                    std::cmp::Ordering::Equal => None,
                }
            }
        }
    };

    state.game_over = true;
    state.winner_index = winner;
    match winner {
        Some(index) => log.log(format!("Game Over: {} wins!", state.players[index].name)),
        None => log.log("Game Over: it's a tie!"),
    }
    log.effect(EffectKind::GameOver, winner, None);
    log::info!("Game over on turn {}: winner {:?}", state.turn_number, winner);
}

fn finalize_turn(state: &mut GameState, log: &mut TurnLog) {
    // (d) Boost countdown
    for player in state.players.iter_mut() {
        for pokemon in player.bench.iter_mut() {
            pokemon.boosted_atk_turns = pokemon.boosted_atk_turns.saturating_sub(1);
        }
    }

    // (e) Weather countdown
    if state.weather != Weather::Clear {
        state.weather_turns_remaining = state.weather_turns_remaining.saturating_sub(1);
        if state.weather_turns_remaining == 0 {
            log.log(format!("The {} faded.", state.weather));
            state.weather = Weather::Clear;
        }
    }

    // (f) Advance
    state.turn_number += 1;
}
