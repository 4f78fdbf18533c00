use crate::schema::{ModuleSpec, ProjectFile};
use anyhow::{bail, Context};
use cardpress_core::{GameKind, GameModule, PoolKind, Project};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub fn load_project(path: &Path) -> anyhow::Result<Project> {
    let file: ProjectFile = load_json(path)?;
    build_project(file).with_context(|| format!("validate {}", path.display()))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

/// Validate the authored file and produce the engine's project: structural
/// checks the engine itself assumes, the derived loser count, and contiguous
/// game numbers.
pub fn build_project(file: ProjectFile) -> anyhow::Result<Project> {
    let print = file.print;
    if print.cards_per_pack == 0 || print.common_packs == 0 || print.live_packs == 0 {
        bail!("print geometry must be non-zero");
    }
    if print.print_packs < print.live_packs {
        bail!(
            "print run of {} packs is smaller than the live run of {}",
            print.print_packs,
            print.live_packs
        );
    }

    if file.symbols.is_empty() {
        bail!("no play symbols defined");
    }
    check_symbol_ids("symbol", &file.symbols)?;
    check_symbol_ids("number symbol", &file.number_symbols)?;

    let loser_count = file.prize_tiers.iter().filter(|tier| tier.value == 0).count();
    if loser_count != 1 {
        bail!("expected exactly one loser tier (value 0), found {loser_count}");
    }
    if file.prize_tiers.iter().any(|tier| tier.value < 0) {
        bail!("prize values must not be negative");
    }
    let loser = file
        .prize_tiers
        .iter()
        .find(|tier| tier.value == 0)
        .map(|tier| tier.id);
    let winner_lvw: u32 = file
        .prize_tiers
        .iter()
        .filter(|tier| tier.value > 0)
        .map(|tier| tier.lvw_count)
        .sum();
    if winner_lvw as usize > print.cards_per_pack {
        bail!(
            "{winner_lvw} low-value winners per pack exceed the pack size of {}",
            print.cards_per_pack
        );
    }

    let mut prize_tiers = file.prize_tiers;
    for tier in &mut prize_tiers {
        if Some(tier.id) == loser {
            if tier.hvw_count > 0 {
                bail!("the loser tier cannot have high-value winners");
            }
            // Derived, never authored.
            tier.lvw_count = print.cards_per_pack as u32 - winner_lvw;
        }
    }

    let modules = build_modules(&file.modules)?;
    let online_modules = modules.iter().filter(|module| module.is_online_bonus()).count();
    if online_modules > 1 {
        bail!("at most one online bonus module is allowed, found {online_modules}");
    }
    let online_prizes = prize_tiers
        .iter()
        .any(|tier| tier.is_online && tier.lvw_count + tier.hvw_count > 0);
    if online_prizes && online_modules == 0 {
        bail!("online prizes are configured but the layout has no online bonus module");
    }

    let mut project = Project {
        name: file.name,
        ticket_price: file.ticket_price,
        symbols: file.symbols,
        number_symbols: file.number_symbols,
        prize_tiers,
        modules,
        print,
    };
    project.renumber_modules();
    check_modules(&project)?;
    check_winner_coverage(&project)?;
    Ok(project)
}

fn check_symbol_ids(kind: &str, symbols: &[cardpress_core::Symbol]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for symbol in symbols {
        if symbol.id == 0 {
            bail!("{kind} '{}' has id 0; ids must be positive", symbol.name);
        }
        if !seen.insert(symbol.id) {
            bail!("duplicate {kind} id {}", symbol.id);
        }
    }
    Ok(())
}

fn build_modules(specs: &[ModuleSpec]) -> anyhow::Result<Vec<GameModule>> {
    if specs.is_empty() {
        bail!("no game modules defined");
    }
    Ok(specs
        .iter()
        .map(|spec| GameModule {
            // Assigned by renumbering once the layout order is final.
            game_number: 0,
            name: spec.name.clone(),
            kind: spec.kind.clone(),
        })
        .collect())
}

fn check_modules(project: &Project) -> anyhow::Result<()> {
    for module in &project.modules {
        match &module.kind {
            GameKind::MatchGrid {
                pool,
                rows,
                cols,
                match_count,
            } => {
                if *rows == 0 || *cols == 0 {
                    bail!("game {}: empty grid", module.game_number);
                }
                check_match_count(module.game_number, *match_count, module.slot_count())?;
                check_pool(project, module.game_number, *pool)?;
            }
            GameKind::MatchRows {
                pool,
                rows,
                row_len,
                match_count,
            } => {
                if *rows == 0 || *row_len == 0 {
                    bail!("game {}: empty row layout", module.game_number);
                }
                check_match_count(module.game_number, *match_count, *row_len as usize)?;
                check_pool(project, module.game_number, *pool)?;
            }
            GameKind::FindSymbol {
                slots,
                winning_symbol_id,
            }
            | GameKind::SymbolPrize {
                slots,
                winning_symbol_id,
            } => {
                if *slots == 0 {
                    bail!("game {}: no slots", module.game_number);
                }
                check_winning_symbol(project, module.game_number, *winning_symbol_id)?;
            }
            GameKind::TreeFind { winning_symbol_id } => {
                check_winning_symbol(project, module.game_number, *winning_symbol_id)?;
            }
            GameKind::OnlineBonus { url } => {
                if url.is_empty() {
                    bail!("game {}: online bonus module needs a URL", module.game_number);
                }
            }
        }
    }
    Ok(())
}

fn check_match_count(game: u32, match_count: u8, span: usize) -> anyhow::Result<()> {
    if match_count < 2 {
        bail!("game {game}: match count must be at least 2");
    }
    if match_count as usize > span {
        bail!("game {game}: match count {match_count} exceeds the {span} available slots");
    }
    Ok(())
}

fn check_pool(project: &Project, game: u32, pool: PoolKind) -> anyhow::Result<()> {
    if project.pool_ids(pool).is_empty() {
        bail!("game {game}: its draw pool is empty");
    }
    Ok(())
}

fn check_winning_symbol(project: &Project, game: u32, id: u32) -> anyhow::Result<()> {
    if project.symbol(id).is_none() {
        bail!("game {game}: winning symbol {id} is not in the catalog");
    }
    Ok(())
}

/// Every authored winner tier must have a module able to carry it.
fn check_winner_coverage(project: &Project) -> anyhow::Result<()> {
    let has_generic = !project.generic_module_indices().is_empty();
    for tier in &project.prize_tiers {
        if !tier.is_winner() || tier.lvw_count + tier.hvw_count == 0 || tier.is_online {
            continue;
        }
        let linked = project
            .modules
            .iter()
            .any(|module| match &module.kind {
                GameKind::SymbolPrize {
                    winning_symbol_id, ..
                } => project
                    .symbol(*winning_symbol_id)
                    .map(|symbol| symbol.name == tier.text_code)
                    .unwrap_or(false),
                _ => false,
            });
        if !linked && !has_generic {
            bail!(
                "prize '{}' has winners but no generic module can carry it",
                tier.display
            );
        }
    }
    Ok(())
}
