use crate::{
    GameKind, GamePlayData, GenerationError, PoolKind, Project, RngState, TREE_ROW_SIZES,
};

/// Result of generating one module's panel. `prize_override` is set only by
/// a winning symbol-prize module; the ticket generator applies it after the
/// module loop as an explicit reconciliation step.
#[derive(Debug, Clone)]
pub struct PanelOutcome {
    pub data: GamePlayData,
    pub prize_override: Option<usize>,
}

impl PanelOutcome {
    fn plain(data: GamePlayData) -> Self {
        Self {
            data,
            prize_override: None,
        }
    }
}

/// Build the panel for one module of one ticket.
///
/// `is_winning_module` is true for at most one module per ticket;
/// `ticket_is_winner` is true whenever the ticket's assigned tier is a
/// winner, regardless of which module carries it. A module that cannot
/// honestly construct its win downgrades to a losing panel instead of
/// failing; only structurally impossible fills raise an error.
pub fn generate_panel(
    project: &Project,
    module_index: usize,
    is_winning_module: bool,
    ticket_is_winner: bool,
    win_tier_index: usize,
    rng: &mut RngState,
) -> Result<PanelOutcome, GenerationError> {
    let module = &project.modules[module_index];
    match &module.kind {
        GameKind::MatchGrid {
            pool, match_count, ..
        } => {
            let generated = match_panel(
                project,
                module.game_number,
                *pool,
                module.slot_count(),
                *match_count as usize,
                is_winning_module,
                ticket_is_winner,
                win_tier_index,
                rng,
            )?;
            Ok(PanelOutcome::plain(GamePlayData {
                game_number: module.game_number,
                generated,
                win_tier_index: is_winning_module.then_some(win_tier_index),
            }))
        }
        GameKind::MatchRows {
            pool,
            rows,
            row_len,
            match_count,
        } => {
            let rows = *rows as usize;
            let row_len = *row_len as usize;
            let winning_row = is_winning_module.then(|| rng.next_below(rows));
            let mut generated = Vec::with_capacity(rows * row_len);
            for row in 0..rows {
                let row_wins = winning_row == Some(row);
                let cells = match_panel(
                    project,
                    module.game_number,
                    *pool,
                    row_len,
                    *match_count as usize,
                    row_wins,
                    ticket_is_winner,
                    win_tier_index,
                    rng,
                )?;
                generated.extend(cells);
            }
            Ok(PanelOutcome::plain(GamePlayData {
                game_number: module.game_number,
                generated,
                win_tier_index: is_winning_module.then_some(win_tier_index),
            }))
        }
        GameKind::FindSymbol {
            winning_symbol_id, ..
        } => {
            let generated = find_panel(
                project,
                module.game_number,
                module.slot_count(),
                *winning_symbol_id,
                &[],
                is_winning_module,
                rng,
            )?;
            Ok(PanelOutcome::plain(GamePlayData {
                game_number: module.game_number,
                generated,
                win_tier_index: is_winning_module.then_some(win_tier_index),
            }))
        }
        GameKind::TreeFind { winning_symbol_id } => {
            let slots: usize = TREE_ROW_SIZES.iter().sum();
            let generated = find_panel(
                project,
                module.game_number,
                slots,
                *winning_symbol_id,
                &[],
                is_winning_module,
                rng,
            )?;
            Ok(PanelOutcome::plain(GamePlayData {
                game_number: module.game_number,
                generated,
                win_tier_index: is_winning_module.then_some(win_tier_index),
            }))
        }
        GameKind::SymbolPrize {
            winning_symbol_id, ..
        } => {
            // The awarded prize is intrinsic to the configured symbol, not
            // the ticket's assigned tier. No linked tier means the win
            // cannot be honored; downgrade to a loss.
            let linked = project
                .symbol(*winning_symbol_id)
                .and_then(|symbol| project.linked_tier_index(&symbol.name));
            let wins = is_winning_module && linked.is_some();
            let foreign = project.symbol_prize_winner_ids(module_index);
            let generated = find_panel(
                project,
                module.game_number,
                module.slot_count(),
                *winning_symbol_id,
                &foreign,
                wins,
                rng,
            )?;
            let awarded = if wins { linked } else { None };
            Ok(PanelOutcome {
                data: GamePlayData {
                    game_number: module.game_number,
                    generated,
                    win_tier_index: awarded,
                },
                prize_override: awarded,
            })
        }
        GameKind::OnlineBonus { .. } => Ok(PanelOutcome::plain(GamePlayData {
            game_number: module.game_number,
            generated: Vec::new(),
            win_tier_index: is_winning_module.then_some(win_tier_index),
        })),
    }
}

/// Shared fill for the grid mechanic and for one row of the row mechanic.
#[allow(clippy::too_many_arguments)]
fn match_panel(
    project: &Project,
    game_number: u32,
    pool: PoolKind,
    slots: usize,
    match_count: usize,
    wins: bool,
    ticket_is_winner: bool,
    win_tier_index: usize,
    rng: &mut RngState,
) -> Result<Vec<u32>, GenerationError> {
    let pool_ids = project.pool_ids(pool);
    if wins {
        if let Some(win_id) = match_win_id(&pool_ids, pool, win_tier_index, rng) {
            let decoys: Vec<u32> = pool_ids.iter().copied().filter(|id| *id != win_id).collect();
            if slots == match_count || !decoys.is_empty() {
                let mut panel = vec![win_id; match_count];
                panel.extend(fill_capped(
                    &decoys,
                    slots - match_count,
                    match_count - 1,
                    &[],
                    game_number,
                    rng,
                )?);
                rng.shuffle(&mut panel);
                return Ok(panel);
            }
        }
        // No honest win is constructible; fall through to a losing fill.
    }
    let no_near_miss = ticket_is_winner || match_count <= 2;
    if no_near_miss {
        fill_distinct(&pool_ids, slots, game_number, rng)
    } else {
        let excluded = match pool {
            PoolKind::Symbols => project.jackpot_symbol_id().into_iter().collect(),
            _ => Vec::new(),
        };
        fill_capped(
            &pool_ids,
            slots,
            match_count - 1,
            &excluded,
            game_number,
            rng,
        )
    }
}

/// Winning id for a match panel: the assigned tier itself for prize pools
/// (when that tier is drawable), a uniformly random pool id otherwise.
fn match_win_id(
    pool_ids: &[u32],
    pool: PoolKind,
    win_tier_index: usize,
    rng: &mut RngState,
) -> Option<u32> {
    match pool {
        PoolKind::Prizes => {
            let id = win_tier_index as u32;
            pool_ids.contains(&id).then_some(id)
        }
        PoolKind::Symbols | PoolKind::Numbers => rng.pick(pool_ids).copied(),
    }
}

/// Panel for the find-the-symbol mechanic: presence or absence only, no
/// near-miss concept. Winning panels carry the symbol exactly once.
fn find_panel(
    project: &Project,
    game_number: u32,
    slots: usize,
    winning_symbol_id: u32,
    foreign_winners: &[u32],
    wins: bool,
    rng: &mut RngState,
) -> Result<Vec<u32>, GenerationError> {
    let decoys: Vec<u32> = project
        .symbols
        .iter()
        .map(|symbol| symbol.id)
        .filter(|id| *id != winning_symbol_id && !foreign_winners.contains(id))
        .collect();
    if decoys.is_empty() {
        return Err(GenerationError::PoolTooSmall {
            game: game_number,
            pool: 0,
            slots,
        });
    }
    let decoy_slots = if wins { slots - 1 } else { slots };
    let mut panel = Vec::with_capacity(slots);
    for _ in 0..decoy_slots {
        panel.push(decoys[rng.next_below(decoys.len())]);
    }
    if wins {
        panel.push(winning_symbol_id);
        rng.shuffle(&mut panel);
    }
    Ok(panel)
}

/// No-near-miss fill: a shuffled distinct subset of the pool. The pool must
/// cover every slot or the configuration is rejected.
pub fn fill_distinct(
    pool: &[u32],
    slots: usize,
    game_number: u32,
    rng: &mut RngState,
) -> Result<Vec<u32>, GenerationError> {
    if pool.len() < slots {
        return Err(GenerationError::PoolTooSmall {
            game: game_number,
            pool: pool.len(),
            slots,
        });
    }
    let mut shuffled = pool.to_vec();
    rng.shuffle(&mut shuffled);
    shuffled.truncate(slots);
    Ok(shuffled)
}

/// Near-miss fill: random ids, each repeated at most `max_per_id` times and
/// never one of `excluded`. Greedy; errors out when every remaining id has
/// hit its cap rather than looping.
pub fn fill_capped(
    pool: &[u32],
    slots: usize,
    max_per_id: usize,
    excluded: &[u32],
    game_number: u32,
    rng: &mut RngState,
) -> Result<Vec<u32>, GenerationError> {
    let mut counts: Vec<(u32, usize)> = pool
        .iter()
        .filter(|id| !excluded.contains(id))
        .map(|id| (*id, 0))
        .collect();
    let mut panel = Vec::with_capacity(slots);
    for _ in 0..slots {
        let eligible: Vec<usize> = counts
            .iter()
            .enumerate()
            .filter(|(_, (_, count))| *count < max_per_id)
            .map(|(idx, _)| idx)
            .collect();
        let Some(pick) = rng.pick(&eligible).copied() else {
            return Err(GenerationError::DecoysExhausted { game: game_number });
        };
        counts[pick].1 += 1;
        panel.push(counts[pick].0);
    }
    rng.shuffle(&mut panel);
    Ok(panel)
}
