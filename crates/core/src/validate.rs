use crate::{GameKind, GameModule, Project, Ticket};

/// Outcome of independently re-deriving one module's win state from its raw
/// panel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleWin {
    /// The module wins; the prize is whatever the ticket was assigned.
    Generic,
    /// The module wins a tier intrinsic to the panel (prize-pool match,
    /// symbol-linked prize, online marker).
    Fixed(usize),
    /// A symbol-prize module shows its winning symbol but no tier carries a
    /// matching text code. Always an inconsistency.
    Unlinked,
}

/// Re-derive, for every module on the layout, whether its panel constitutes
/// a win, from `generated` data alone. Shares no state with generation.
pub fn module_wins(ticket: &Ticket, project: &Project) -> Vec<Option<ModuleWin>> {
    project
        .modules
        .iter()
        .enumerate()
        .map(|(idx, module)| {
            let data = ticket.game_data.get(idx)?;
            derive_win(module, &data.generated, data.win_tier_index, project)
        })
        .collect()
}

fn derive_win(
    module: &GameModule,
    generated: &[u32],
    recorded_win: Option<usize>,
    project: &Project,
) -> Option<ModuleWin> {
    match &module.kind {
        GameKind::MatchGrid {
            pool, match_count, ..
        } => matched_id(generated, *match_count as usize).map(|id| match pool {
            crate::PoolKind::Prizes => ModuleWin::Fixed(id as usize),
            _ => ModuleWin::Generic,
        }),
        GameKind::MatchRows {
            pool,
            row_len,
            match_count,
            ..
        } => generated
            .chunks(*row_len as usize)
            .find_map(|row| matched_id(row, *match_count as usize))
            .map(|id| match pool {
                crate::PoolKind::Prizes => ModuleWin::Fixed(id as usize),
                _ => ModuleWin::Generic,
            }),
        GameKind::FindSymbol {
            winning_symbol_id, ..
        }
        | GameKind::TreeFind { winning_symbol_id } => generated
            .contains(winning_symbol_id)
            .then_some(ModuleWin::Generic),
        GameKind::SymbolPrize {
            winning_symbol_id, ..
        } => {
            if !generated.contains(winning_symbol_id) {
                return None;
            }
            let linked = project
                .symbol(*winning_symbol_id)
                .and_then(|symbol| project.linked_tier_index(&symbol.name));
            Some(match linked {
                Some(tier) => ModuleWin::Fixed(tier),
                None => ModuleWin::Unlinked,
            })
        }
        // The marker has no symbols; its recorded prize index is the datum.
        GameKind::OnlineBonus { .. } => recorded_win.map(ModuleWin::Fixed),
    }
}

/// First id reaching the match threshold, grouping the panel by id.
fn matched_id(cells: &[u32], match_count: usize) -> Option<u32> {
    for id in cells {
        if cells.iter().filter(|other| *other == id).count() >= match_count {
            return Some(*id);
        }
    }
    None
}

/// Independent win validation for one ticket. Returns true iff the panels
/// are fully consistent with the declared prize; every discrepancy is
/// appended to `errors` in human-readable form. Never panics or aborts, so
/// the integrity checker can sweep thousands of tickets with it.
pub fn validate(
    ticket: &Ticket,
    project: &Project,
    ordinal: usize,
    errors: &mut Vec<String>,
) -> bool {
    let before = errors.len();
    if ticket.game_data.len() != project.modules.len() {
        errors.push(format!(
            "ticket {ordinal}: {} game entries for {} modules",
            ticket.game_data.len(),
            project.modules.len()
        ));
        return false;
    }
    for (module, data) in project.modules.iter().zip(&ticket.game_data) {
        if data.generated.len() != module.slot_count() {
            errors.push(format!(
                "ticket {ordinal}: game {} has {} cells, expected {}",
                module.game_number,
                data.generated.len(),
                module.slot_count()
            ));
        }
    }

    let wins = module_wins(ticket, project);
    let winners: Vec<usize> = wins
        .iter()
        .enumerate()
        .filter(|(_, win)| win.is_some())
        .map(|(idx, _)| idx)
        .collect();
    let declared = &project.prize_tiers[ticket.win_tier_index];

    if declared.is_winner() {
        match winners.as_slice() {
            [] => errors.push(format!(
                "ticket {ordinal}: declares {} but no game wins",
                declared.display
            )),
            [single] => check_win_prize(ticket, project, ordinal, *single, wins[*single], errors),
            many => {
                let games: Vec<String> = many
                    .iter()
                    .map(|idx| project.modules[*idx].game_number.to_string())
                    .collect();
                errors.push(format!(
                    "ticket {ordinal}: multiple winning games ({})",
                    games.join(", ")
                ));
            }
        }
    } else {
        for idx in &winners {
            errors.push(format!(
                "ticket {ordinal}: declared loser but game {} wins",
                project.modules[*idx].game_number
            ));
        }
    }
    errors.len() == before
}

fn check_win_prize(
    ticket: &Ticket,
    project: &Project,
    ordinal: usize,
    module_index: usize,
    win: Option<ModuleWin>,
    errors: &mut Vec<String>,
) {
    let declared = &project.prize_tiers[ticket.win_tier_index];
    let game = project.modules[module_index].game_number;
    match win {
        Some(ModuleWin::Generic) => {
            if declared.is_online {
                errors.push(format!(
                    "ticket {ordinal}: online prize {} won on non-online game {game}",
                    declared.display
                ));
            }
        }
        Some(ModuleWin::Fixed(tier_index)) => match project.prize_tiers.get(tier_index) {
            Some(tier) if tier.matches(declared) => {}
            Some(tier) => errors.push(format!(
                "ticket {ordinal}: game {game} pays {} but ticket declares {}",
                tier.display, declared.display
            )),
            None => errors.push(format!(
                "ticket {ordinal}: game {game} references unknown prize tier {tier_index}"
            )),
        },
        Some(ModuleWin::Unlinked) => errors.push(format!(
            "ticket {ordinal}: game {game} wins but no prize tier matches its symbol"
        )),
        None => {}
    }
}
