use crate::{
    generate_panel, select_winning_module, validate, Event, EventBus, Project, RngState, Ticket,
};
use std::collections::HashSet;
use thiserror::Error;

/// Bound on the uniqueness retry loop. Deterministic cap, not a timeout.
pub const MAX_UNIQUENESS_ATTEMPTS: usize = 1000;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("game {game}: pool of {pool} distinct ids cannot fill {slots} slots")]
    PoolTooSmall { game: u32, pool: usize, slots: usize },
    #[error("game {game}: no eligible ids left under the repeat cap")]
    DecoysExhausted { game: u32 },
    #[error("no game module can carry prize '{display}'")]
    NoWinnerModule { display: String },
    #[error(
        "no unused ticket fingerprint after {attempts} attempts; symbol or game variety too low"
    )]
    UniquenessExhausted { attempts: usize },
    #[error("generator/validator self-test failed on ticket {ordinal}: {details}")]
    SelfTest { ordinal: usize, details: String },
}

/// All tickets of one generation run, before placement. `lvw` holds the
/// common-pack templates back to back (`common_packs * cards_per_pack`
/// tickets); `hvw` holds the discrete high-value winners.
#[derive(Debug, Clone)]
pub struct GeneratedRun {
    pub lvw: Vec<Ticket>,
    pub hvw: Vec<Ticket>,
}

/// Generate one ticket for the given prize tier.
///
/// Retries under the fingerprint-uniqueness cap, then runs the independent
/// validator as a self-test. A self-test mismatch is a logic defect and
/// aborts the run; it is never recovered from.
pub fn generate_ticket(
    project: &Project,
    win_tier_index: usize,
    fingerprints: &mut HashSet<String>,
    ordinal: usize,
    rng: &mut RngState,
) -> Result<Ticket, GenerationError> {
    let tier = &project.prize_tiers[win_tier_index];
    for _ in 0..MAX_UNIQUENESS_ATTEMPTS {
        let winner = select_winning_module(project, win_tier_index, rng);
        if tier.is_winner() && winner.is_none() {
            return Err(GenerationError::NoWinnerModule {
                display: tier.display.clone(),
            });
        }
        let mut game_data = Vec::with_capacity(project.modules.len());
        let mut prize_override = None;
        for module_index in 0..project.modules.len() {
            let outcome = generate_panel(
                project,
                module_index,
                winner == Some(module_index),
                tier.is_winner(),
                win_tier_index,
                rng,
            )?;
            if outcome.prize_override.is_some() {
                prize_override = outcome.prize_override;
            }
            game_data.push(outcome.data);
        }

        // Reconcile the declared prize after the module loop: a winning
        // symbol-prize module dictates its own tier, and a selected module
        // that downgraded to a loss turns the ticket into a loser.
        let mut final_tier = win_tier_index;
        if let Some(winner_index) = winner {
            if game_data[winner_index].win_tier_index.is_none() {
                if let Some(loser) = project.loser_tier_index() {
                    final_tier = loser;
                }
            }
        }
        if let Some(overridden) = prize_override {
            final_tier = overridden;
        }

        let ticket = Ticket {
            win_tier_index: final_tier,
            game_data,
        };
        if !fingerprints.insert(ticket.fingerprint()) {
            continue;
        }
        let mut errors = Vec::new();
        if !validate(&ticket, project, ordinal, &mut errors) {
            return Err(GenerationError::SelfTest {
                ordinal,
                details: errors.join("; "),
            });
        }
        return Ok(ticket);
    }
    Err(GenerationError::UniquenessExhausted {
        attempts: MAX_UNIQUENESS_ATTEMPTS,
    })
}

/// Generate every ticket of the run: `common_packs` LVW pack templates with
/// the configured per-pack tier distribution, then the discrete HVW
/// tickets. Progress lands on the event bus as whole percents.
pub fn generate_run(
    project: &Project,
    rng: &mut RngState,
    events: &mut EventBus,
) -> Result<GeneratedRun, GenerationError> {
    let lvw_total = project.print.common_packs * project.print.cards_per_pack;
    let hvw_total: usize = project
        .prize_tiers
        .iter()
        .map(|tier| tier.hvw_count as usize)
        .sum();
    events.push(Event::GenerationStarted {
        lvw_total,
        hvw_total,
    });

    let total = lvw_total + hvw_total;
    let mut fingerprints = HashSet::new();
    let mut done = 0usize;
    let mut last_percent = 0u8;

    let mut lvw = Vec::with_capacity(lvw_total);
    for _ in 0..project.print.common_packs {
        for tier_index in 0..project.prize_tiers.len() {
            for _ in 0..project.prize_tiers[tier_index].lvw_count {
                let ticket = generate_ticket(project, tier_index, &mut fingerprints, done, rng)?;
                lvw.push(ticket);
                done += 1;
                report_progress(events, done, total, &mut last_percent);
            }
        }
    }

    let mut hvw = Vec::with_capacity(hvw_total);
    for tier_index in 0..project.prize_tiers.len() {
        for _ in 0..project.prize_tiers[tier_index].hvw_count {
            let ticket = generate_ticket(project, tier_index, &mut fingerprints, done, rng)?;
            hvw.push(ticket);
            done += 1;
            report_progress(events, done, total, &mut last_percent);
        }
    }

    events.push(Event::GenerationFinished {
        tickets: lvw.len() + hvw.len(),
    });
    Ok(GeneratedRun { lvw, hvw })
}

fn report_progress(events: &mut EventBus, done: usize, total: usize, last_percent: &mut u8) {
    if total == 0 {
        return;
    }
    let percent = (done * 100 / total) as u8;
    if percent != *last_percent {
        *last_percent = percent;
        events.push(Event::GenerationProgress {
            done,
            total,
            percent,
        });
    }
}
