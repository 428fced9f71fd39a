//! Turning two finished drafts into a playable match.
use crate::battle::state::{GameState, TurnRng};
use crate::config::BattleRules;
use crate::deck::Deck;
use crate::errors::{BattleResult, DraftError};
use crate::player::PlayerState;
use crate::pokemon::PokemonState;
use crate::provider::CatalogProvider;
use schema::CreatureDefinition;
use serde::{Deserialize, Serialize};

/// Creatures offered to each player at the start of a draft.
pub const DRAFT_OFFER_SIZE: usize = 20;

/// One player's finalized draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub name: String,
    /// Drafted creatures, in pick order. The first pick starts active.
    pub picks: Vec<CreatureDefinition>,
    /// Creatures left undrafted, available to reinforcements.
    pub pool: Vec<CreatureDefinition>,
}

impl Draft {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        picks: Vec<CreatureDefinition>,
        pool: Vec<CreatureDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            picks,
            pool,
        }
    }

    /// Draft the named creatures out of this player's own offer. Names missing
    /// from the offer are skipped. Whatever stays unpicked becomes the pool.
    pub fn from_offer(
        id: impl Into<String>,
        name: impl Into<String>,
        offer: Vec<CreatureDefinition>,
        pick_names: &[&str],
    ) -> Self {
        let name = name.into();
        let mut pool = offer;
        let mut picks = Vec::new();
        for pick in pick_names {
            match pool.iter().position(|definition| definition.name.eq_ignore_ascii_case(pick)) {
                Some(at) => picks.push(pool.remove(at)),
                None => log::warn!("Skipping draft pick '{}': not offered to {}", pick, name),
            }
        }
        Self::new(id, name, picks, pool)
    }

    fn into_player(self) -> BattleResult<PlayerState> {
        if self.picks.is_empty() {
            return Err(DraftError::EmptyBench { player: self.name }.into());
        }
        let bench = self.picks.into_iter().map(PokemonState::new).collect();
        let pool = self.pool.into_iter().map(PokemonState::new).collect();
        Ok(PlayerState::new(self.id, self.name, bench, pool))
    }
}

/// Deal each player a random offer of up to `offer_size` creatures from the
/// catalog. The two offers never share a creature. A catalog too small for two
/// full offers is split evenly.
pub fn deal_offers(
    catalog: &CatalogProvider,
    offer_size: usize,
    rng: &mut TurnRng,
) -> [Vec<CreatureDefinition>; 2] {
    let mut shuffled: Vec<CreatureDefinition> = catalog.definitions().into_iter().cloned().collect();
    rng.shuffle(&mut shuffled, "Draft Offer");

    let per_player = offer_size.min(shuffled.len() / 2);
    if per_player < offer_size {
        log::warn!(
            "Catalog of {} creatures cannot fill two offers of {}; dealing {} each",
            shuffled.len(),
            offer_size,
            per_player
        );
    }
    let mut second = shuffled.split_off(per_player);
    second.truncate(per_player);
    [shuffled, second]
}

/// Build the opening state: full-health benches, a freshly shuffled deck and
/// an opening hand for each player, dealt to player 0 first.
pub fn build_game_state(
    first: Draft,
    second: Draft,
    rules: BattleRules,
    rng: &mut TurnRng,
) -> BattleResult<GameState> {
    let mut players = [first.into_player()?, second.into_player()?];
    let mut deck = Deck::new(rng);

    for player in players.iter_mut() {
        player.hand = deck.draw(rules.initial_hand_size, rng);
    }

    log::info!(
        "Match built: {} ({} picks) vs {} ({} picks)",
        players[0].name,
        players[0].bench.len(),
        players[1].name,
        players[1].bench.len()
    );

    Ok(GameState::new(players, deck, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::CreatureBuilder;
    use crate::deck::{composition, standard_cards, DECK_SIZE};
    use crate::errors::BattleEngineError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn draft(name: &str, picks: &[&str], pool: &[&str]) -> Draft {
        Draft::new(
            name.to_lowercase(),
            name,
            picks.iter().map(|p| CreatureBuilder::new(p).hp(40).build()).collect(),
            pool.iter().map(|p| CreatureBuilder::new(p).hp(30).build()).collect(),
        )
    }

    #[test]
    fn test_build_game_state_sets_opening_position() {
        let mut rng = TurnRng::seeded(21);
        let state = build_game_state(
            draft("Ash", &["Pikachu", "Charmander"], &["Rattata"]),
            draft("Gary", &["Eevee"], &[]),
            BattleRules::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(state.turn_number, 1);
        assert!(!state.game_over);
        assert_eq!(state.winner_index, None);
        for player in &state.players {
            assert_eq!(player.active_index, 0);
            assert_eq!(player.points, 0);
            assert_eq!(player.super_move_gauge, 0);
            assert_eq!(player.hand.len(), 3);
        }
        assert_eq!(state.players[0].bench[1].name(), "Charmander");
        assert_eq!(state.players[0].bench[1].max_hp, 80);
        assert_eq!(state.players[0].pool.len(), 1);
        assert_eq!(state.deck.draw_pile_len(), DECK_SIZE - 6);
    }

    #[test]
    fn test_cards_are_conserved_after_dealing() {
        let mut rng = TurnRng::seeded(8);
        let state = build_game_state(
            draft("Ash", &["Pikachu"], &[]),
            draft("Gary", &["Eevee"], &[]),
            BattleRules::default(),
            &mut rng,
        )
        .unwrap();

        let everything = state
            .deck
            .draw_pile()
            .chain(state.players[0].hand.iter())
            .chain(state.players[1].hand.iter());
        assert_eq!(composition(everything), composition(&standard_cards()));
    }

    #[test]
    fn test_empty_bench_is_rejected() {
        let mut rng = TurnRng::seeded(1);
        let result = build_game_state(
            draft("Ash", &["Pikachu"], &[]),
            draft("Gary", &[], &["Eevee"]),
            BattleRules::default(),
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(BattleEngineError::Draft(DraftError::EmptyBench { ref player })) if player == "Gary"
        ));
    }

    fn catalog() -> CatalogProvider {
        CatalogProvider::from_definitions(
            [
                ("Bulbasaur", 1),
                ("Charmander", 4),
                ("Squirtle", 7),
                ("Pikachu", 25),
                ("Eevee", 133),
                ("Snorlax", 143),
                ("Dratini", 147),
            ]
            .into_iter()
            .map(|(name, id)| CreatureBuilder::new(name).id(id).build()),
        )
    }

    fn names(definitions: &[CreatureDefinition]) -> Vec<&str> {
        definitions.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_from_offer_splits_picks_and_pool() {
        let offer = vec![
            CreatureBuilder::new("Pikachu").id(25).build(),
            CreatureBuilder::new("Eevee").id(133).build(),
            CreatureBuilder::new("Snorlax").id(143).build(),
        ];

        let draft = Draft::from_offer("p1", "Ash", offer, &["snorlax", "Missingno", "Pikachu", "Pikachu"]);

        assert_eq!(names(&draft.picks), vec!["Snorlax", "Pikachu"]);
        assert_eq!(names(&draft.pool), vec!["Eevee"]);
    }

    #[rstest]
    #[case(3, 3)]
    #[case(20, 3)]
    #[case(1, 1)]
    fn test_offers_are_disjoint(#[case] offer_size: usize, #[case] expected: usize) {
        let mut rng = TurnRng::seeded(4);
        let [red, blue] = deal_offers(&catalog(), offer_size, &mut rng);

        assert_eq!(red.len(), expected);
        assert_eq!(blue.len(), expected);
        assert!(red.iter().all(|creature| !blue.iter().any(|other| other.id == creature.id)));
    }

    #[test]
    fn test_pools_never_hold_the_opponents_picks() {
        for seed in 0..20 {
            let mut rng = TurnRng::seeded(seed);
            let [red_offer, blue_offer] = deal_offers(&catalog(), 3, &mut rng);
            let red_picks: Vec<String> = red_offer.iter().take(2).map(|d| d.name.clone()).collect();
            let blue_picks: Vec<String> = blue_offer.iter().take(2).map(|d| d.name.clone()).collect();
            let red_refs: Vec<&str> = red_picks.iter().map(String::as_str).collect();
            let blue_refs: Vec<&str> = blue_picks.iter().map(String::as_str).collect();

            let red = Draft::from_offer("red", "Red", red_offer, &red_refs);
            let blue = Draft::from_offer("blue", "Blue", blue_offer, &blue_refs);

            assert_eq!(red.pool.len(), 1);
            assert_eq!(blue.pool.len(), 1);
            for creature in &red.pool {
                assert!(!blue.picks.iter().any(|pick| pick.id == creature.id), "seed {}", seed);
            }
            for creature in &blue.pool {
                assert!(!red.picks.iter().any(|pick| pick.id == creature.id), "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_pick_outside_the_offer_is_skipped() {
        let mut rng = TurnRng::seeded(9);
        let [red_offer, blue_offer] = deal_offers(&catalog(), 3, &mut rng);
        let stolen = blue_offer[0].name.clone();
        let own = red_offer[0].name.clone();

        let red = Draft::from_offer("red", "Red", red_offer, &[stolen.as_str(), own.as_str()]);

        assert_eq!(names(&red.picks), vec![own.as_str()]);
        assert!(!red.pool.iter().any(|d| d.name == stolen));
    }

    #[test]
    fn test_offers_follow_the_rng() {
        let first = deal_offers(&catalog(), 3, &mut TurnRng::seeded(77));
        let second = deal_offers(&catalog(), 3, &mut TurnRng::seeded(77));
        assert_eq!(first, second);
    }
}
