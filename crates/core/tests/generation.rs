use cardpress_core::{
    generate_run, generate_ticket, select_winning_module, validate, EventBus, GameKind,
    GameModule, GenerationError, PoolKind, PrintConfig, PrizeTier, Project, RngState, Symbol,
};
use std::collections::HashSet;

fn symbol(id: u32, name: &str) -> Symbol {
    Symbol {
        id,
        name: name.to_string(),
        image: None,
    }
}

fn tier(id: u32, value: i64, text_code: &str, is_online: bool, lvw: u32, hvw: u32) -> PrizeTier {
    PrizeTier {
        id,
        value,
        display: format!("${}", value / 100),
        text_code: text_code.to_string(),
        barcode: String::new(),
        is_online,
        lvw_count: lvw,
        hvw_count: hvw,
    }
}

fn module(game_number: u32, name: &str, kind: GameKind) -> GameModule {
    GameModule {
        game_number,
        name: name.to_string(),
        kind,
    }
}

/// Full fixture: six mechanics across symbol, number and prize pools, with
/// a loser tier (derived count 7), two generic LVW tiers, a STAR-linked
/// high-value tier and an online high-value tier.
fn project() -> Project {
    Project {
        name: "generation fixture".to_string(),
        ticket_price: 200,
        symbols: vec![
            symbol(1, "CHERRY"),
            symbol(2, "BELL"),
            symbol(3, "LEMON"),
            symbol(4, "ANCHOR"),
            symbol(5, "HORSESHOE"),
            symbol(6, "CLOVER"),
            symbol(7, "DIAMOND"),
            symbol(8, "CROWN"),
            symbol(9, "STAR"),
        ],
        number_symbols: vec![
            symbol(1, "1"),
            symbol(2, "2"),
            symbol(3, "3"),
            symbol(4, "4"),
            symbol(5, "5"),
            symbol(6, "6"),
        ],
        prize_tiers: vec![
            tier(1, 0, "", false, 7, 0),
            tier(2, 200, "TWO", false, 2, 0),
            tier(3, 500, "FIVE", false, 1, 0),
            tier(4, 10_000, "STAR", false, 0, 2),
            tier(5, 1_000, "NET", true, 0, 1),
        ],
        modules: vec![
            module(
                1,
                "Lucky Grid",
                GameKind::MatchGrid {
                    pool: PoolKind::Symbols,
                    rows: 3,
                    cols: 3,
                    match_count: 3,
                },
            ),
            module(
                2,
                "Triple Rows",
                GameKind::MatchRows {
                    pool: PoolKind::Symbols,
                    rows: 2,
                    row_len: 3,
                    match_count: 3,
                },
            ),
            module(
                3,
                "Your Numbers",
                GameKind::MatchGrid {
                    pool: PoolKind::Numbers,
                    rows: 2,
                    cols: 2,
                    match_count: 2,
                },
            ),
            module(
                4,
                "Prize Line",
                GameKind::MatchGrid {
                    pool: PoolKind::Prizes,
                    rows: 1,
                    cols: 3,
                    match_count: 3,
                },
            ),
            module(
                5,
                "Find the Horseshoe",
                GameKind::FindSymbol {
                    slots: 4,
                    winning_symbol_id: 5,
                },
            ),
            module(
                6,
                "Star Prize",
                GameKind::SymbolPrize {
                    slots: 4,
                    winning_symbol_id: 9,
                },
            ),
            module(
                7,
                "Bonus Code",
                GameKind::OnlineBonus {
                    url: "https://play.example/bonus".to_string(),
                },
            ),
        ],
        print: PrintConfig {
            cards_per_pack: 10,
            common_packs: 2,
            live_packs: 4,
            print_packs: 5,
        },
    }
}

#[test]
fn selector_routes_online_prizes_to_the_online_module() {
    let project = project();
    let mut rng = RngState::from_seed(1);
    assert_eq!(select_winning_module(&project, 4, &mut rng), Some(6));
}

#[test]
fn selector_routes_linked_prizes_to_their_symbol_module() {
    let project = project();
    let mut rng = RngState::from_seed(1);
    assert_eq!(select_winning_module(&project, 3, &mut rng), Some(5));
}

#[test]
fn selector_returns_none_for_the_loser_tier() {
    let project = project();
    let mut rng = RngState::from_seed(1);
    assert_eq!(select_winning_module(&project, 0, &mut rng), None);
}

#[test]
fn selector_spreads_generic_prizes_over_generic_modules() {
    let project = project();
    let mut rng = RngState::from_seed(2);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let picked = select_winning_module(&project, 1, &mut rng).unwrap();
        assert!(project.modules[picked].is_generic());
        seen.insert(picked);
    }
    // All five generic modules show up under a uniform pick.
    assert_eq!(seen.len(), 5);
}

#[test]
fn generated_tickets_always_pass_independent_validation() {
    let project = project();
    for seed in 0..20 {
        let mut rng = RngState::from_seed(seed);
        let mut fingerprints = HashSet::new();
        for tier_index in 0..project.prize_tiers.len() {
            let ticket =
                generate_ticket(&project, tier_index, &mut fingerprints, 0, &mut rng).unwrap();
            let mut errors = Vec::new();
            assert!(
                validate(&ticket, &project, 0, &mut errors),
                "seed {seed} tier {tier_index}: {errors:?}"
            );
        }
    }
}

#[test]
fn winning_symbol_prize_ticket_keeps_its_linked_tier() {
    let project = project();
    let mut rng = RngState::from_seed(9);
    let mut fingerprints = HashSet::new();
    let ticket = generate_ticket(&project, 3, &mut fingerprints, 0, &mut rng).unwrap();
    assert_eq!(ticket.win_tier_index, 3);
    assert_eq!(ticket.game_data[5].win_tier_index, Some(3));
    assert!(ticket.game_data[5].generated.contains(&9));
}

#[test]
fn online_ticket_wins_only_on_the_marker_module() {
    let project = project();
    let mut rng = RngState::from_seed(10);
    let mut fingerprints = HashSet::new();
    let ticket = generate_ticket(&project, 4, &mut fingerprints, 0, &mut rng).unwrap();
    assert_eq!(ticket.game_data[6].win_tier_index, Some(4));
    assert!(ticket.game_data[6].generated.is_empty());
    for data in &ticket.game_data[..6] {
        assert_eq!(data.win_tier_index, None);
    }
}

#[test]
fn run_generation_fills_packs_and_keeps_fingerprints_unique() {
    let project = project();
    let mut rng = RngState::from_seed(11);
    let mut events = EventBus::default();
    let run = generate_run(&project, &mut rng, &mut events).unwrap();

    assert_eq!(run.lvw.len(), 20);
    assert_eq!(run.hvw.len(), 3);
    let fingerprints: HashSet<String> = run
        .lvw
        .iter()
        .chain(&run.hvw)
        .map(|ticket| ticket.fingerprint())
        .collect();
    assert_eq!(fingerprints.len(), 23);

    // Per template: 7 losers, 2 + 1 low-value winners.
    for template in 0..2 {
        let tickets = &run.lvw[template * 10..(template + 1) * 10];
        let losers = tickets
            .iter()
            .filter(|ticket| !project.prize_tiers[ticket.win_tier_index].is_winner())
            .count();
        assert_eq!(losers, 7);
    }
}

#[test]
fn missing_generic_module_is_a_fatal_configuration_error() {
    let mut project = project();
    project.modules = vec![module(
        1,
        "Bonus Code",
        GameKind::OnlineBonus {
            url: "https://play.example/bonus".to_string(),
        },
    )];
    let mut rng = RngState::from_seed(12);
    let mut fingerprints = HashSet::new();
    assert!(matches!(
        generate_ticket(&project, 1, &mut fingerprints, 0, &mut rng),
        Err(GenerationError::NoWinnerModule { .. })
    ));
}

#[test]
fn exhausted_variety_surfaces_after_the_attempt_cap() {
    // One single-slot find game over two symbols: losing tickets have
    // exactly one possible fingerprint.
    let mut project = project();
    project.symbols.truncate(2);
    project.modules = vec![module(
        1,
        "Find",
        GameKind::FindSymbol {
            slots: 1,
            winning_symbol_id: 1,
        },
    )];
    let mut rng = RngState::from_seed(13);
    let mut fingerprints = HashSet::new();
    generate_ticket(&project, 0, &mut fingerprints, 0, &mut rng).unwrap();
    assert!(matches!(
        generate_ticket(&project, 0, &mut fingerprints, 1, &mut rng),
        Err(GenerationError::UniquenessExhausted { attempts: 1000 })
    ));
}
