use draft_battle::battle::ai::{Behavior, ScoringAI};
use draft_battle::config::load_type_chart;
use draft_battle::{
    build_game_state, deal_offers, resolve_turn, BattleRules, CachedProvider, CatalogProvider,
    CreatureDefinition, Draft, TurnOutcome, TurnRng, TypeChart, DRAFT_OFFER_SIZE,
};
use std::env;
use std::error::Error;
use std::path::PathBuf;

const TURN_LIMIT: u32 = 500;
const DEMO_PICKS: usize = 3;

/// The demo trainers take the first creatures they are offered.
fn draft_leading_picks(id: &str, name: &str, offer: Vec<CreatureDefinition>) -> Draft {
    let picks: Vec<String> = offer.iter().take(DEMO_PICKS).map(|d| d.name.clone()).collect();
    let picks: Vec<&str> = picks.iter().map(String::as_str).collect();
    Draft::from_offer(id, name, offer, &picks)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    // Usage: draft-battle [data dir] [seed]
    let mut args = env::args().skip(1);
    let data_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    let seed = args.next().map(|raw| raw.parse::<u64>()).transpose()?;

    let rules = BattleRules::load(&data_path.join("rules.ron"))?;
    let catalog = CatalogProvider::load(&data_path.join("roster.ron"))?;
    let chart_path = data_path.join("type_chart.ron");
    let chart = if chart_path.exists() {
        load_type_chart(&chart_path)?
    } else {
        TypeChart::standard()
    };
    println!("Loaded {} creatures from {}", catalog.len(), data_path.display());

    let mut rng = match seed {
        Some(seed) => TurnRng::seeded(seed),
        None => TurnRng::new_random(),
    };

    let [red_offer, blue_offer] = deal_offers(&catalog, DRAFT_OFFER_SIZE, &mut rng);
    let red = draft_leading_picks("npc_trainer_1", "AI Trainer Red", red_offer);
    let blue = draft_leading_picks("npc_trainer_2", "AI Trainer Blue", blue_offer);
    let mut state = build_game_state(red, blue, rules, &mut rng)?;
    let provider = CachedProvider::new(catalog);

    println!("=== NPC vs NPC Battle Demo ===");
    let trainers = [ScoringAI::new(chart.clone()), ScoringAI::new(chart.clone())];
    let mut last_outcome: Option<TurnOutcome> = None;

    while !state.game_over && state.turn_number <= TURN_LIMIT {
        let actions = [
            Some(trainers[0].decide_action(0, &state)),
            Some(trainers[1].decide_action(1, &state)),
        ];
        let outcome = resolve_turn(&state, actions, &chart, &provider, &mut rng).await?;
        for line in &outcome.logs {
            println!("  {}", line);
        }
        state = outcome.state.clone();
        last_outcome = Some(outcome);
    }

    println!("\n--- Battle Finished ---");
    match (state.game_over, state.winner_index) {
        (true, Some(winner)) => println!("Winner: {}", state.players[winner].name),
        (true, None) => println!("The battle ended in a tie."),
        (false, _) => println!("No winner after {} turns.", TURN_LIMIT),
    }
    for player in &state.players {
        println!("{}: {} points", player.name, player.points);
        for pokemon in &player.bench {
            println!("  {}", pokemon);
        }
    }

    if let Some(outcome) = last_outcome {
        println!("\nFinal turn as JSON:\n{}", outcome.to_json()?);
    }
    Ok(())
}
