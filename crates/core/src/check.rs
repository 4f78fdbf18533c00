use crate::{
    module_wins, validate, Event, EventBus, GeneratedRun, ModuleWin, PlacedRun, Project, Ticket,
    MAX_HVW_PER_PACK,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

/// One named finding of the final integrity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

const DETAIL_CAP: usize = 5;

fn result(name: &str, findings: Vec<String>, pass_detail: &str) -> CheckResult {
    if findings.is_empty() {
        return CheckResult {
            name: name.to_string(),
            status: CheckStatus::Pass,
            detail: pass_detail.to_string(),
        };
    }
    let extra = findings.len().saturating_sub(DETAIL_CAP);
    let mut detail = findings
        .iter()
        .take(DETAIL_CAP)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if extra > 0 {
        detail.push_str(&format!("; and {extra} more"));
    }
    CheckResult {
        name: name.to_string(),
        status: CheckStatus::Fail,
        detail,
    }
}

fn skip(name: &str, detail: &str) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        status: CheckStatus::Skip,
        detail: detail.to_string(),
    }
}

/// Read-only integrity sweep over a placed print run. Independent of the
/// generator: every win is re-derived from raw panel data. Findings are
/// reported, never thrown; the sweep always runs to completion.
pub fn run_checks(
    project: &Project,
    run: &GeneratedRun,
    placed: &PlacedRun,
    events: &mut EventBus,
) -> Vec<CheckResult> {
    let checks = [
        check_validation(project, run, placed),
        check_pack_distribution(project, run, placed),
        check_hvw_caps(project, run, placed),
        check_hvw_fingerprints(run),
        check_sub_price(project),
        check_multi_win(project, run, placed),
        check_intended_winner(project, run, placed),
        check_online_modules(project, run, placed),
    ];
    let results: Vec<CheckResult> = checks.into_iter().collect();
    for check in &results {
        events.push(Event::CheckFinished {
            name: check.name.clone(),
            status: check.status,
        });
    }
    results
}

fn source_ticket<'a>(run: &'a GeneratedRun, placed: &PlacedRun, position: usize) -> &'a Ticket {
    let source = placed.order[position];
    if source < placed.lvw_len {
        &run.lvw[source]
    } else {
        &run.hvw[source - placed.lvw_len]
    }
}

/// (a) Re-run the win validator over every printed ticket.
fn check_validation(project: &Project, run: &GeneratedRun, placed: &PlacedRun) -> CheckResult {
    let mut findings = Vec::new();
    for position in 0..placed.order.len() {
        validate(source_ticket(run, placed, position), project, position, &mut findings);
    }
    result(
        "win validation",
        findings,
        "every printed ticket validates against its declared prize",
    )
}

/// (b) Per pack, the LVW tier distribution must match the authored counts;
/// high-value winners displace exactly that many losers.
fn check_pack_distribution(
    project: &Project,
    run: &GeneratedRun,
    placed: &PlacedRun,
) -> CheckResult {
    let cards = project.print.cards_per_pack;
    let mut findings = Vec::new();
    for pack in 0..project.print.print_packs {
        let mut counts = vec![0usize; project.prize_tiers.len()];
        let mut hvw_here = 0usize;
        for slot in 0..cards {
            let source = placed.order[pack * cards + slot];
            if placed.is_hvw_source(source) {
                hvw_here += 1;
                continue;
            }
            counts[run.lvw[source].win_tier_index] += 1;
        }
        for (tier_index, tier) in project.prize_tiers.iter().enumerate() {
            let mut expected = tier.lvw_count as usize;
            if tier.is_loser() {
                expected = expected.saturating_sub(hvw_here);
            }
            if counts[tier_index] != expected {
                findings.push(format!(
                    "pack {pack}: {} appears {} times, expected {expected}",
                    tier.display, counts[tier_index]
                ));
            }
        }
    }
    result(
        "pack distribution",
        findings,
        "every pack carries the configured low-value winner counts",
    )
}

/// (c) Every high-value winner is placed exactly once, inside the live
/// range, at most the cap per pack.
fn check_hvw_caps(project: &Project, run: &GeneratedRun, placed: &PlacedRun) -> CheckResult {
    let cards = project.print.cards_per_pack;
    let mut findings = Vec::new();
    let mut seen = vec![0usize; run.hvw.len()];
    let mut per_pack = vec![0usize; project.print.print_packs];
    for (position, source) in placed.order.iter().enumerate() {
        if !placed.is_hvw_source(*source) {
            continue;
        }
        seen[*source - placed.lvw_len] += 1;
        per_pack[position / cards] += 1;
        if position >= project.print.live_tickets() {
            findings.push(format!(
                "high-value winner at position {position} is outside the live run"
            ));
        }
    }
    for (hvw_index, count) in seen.iter().enumerate() {
        if *count != 1 {
            findings.push(format!(
                "high-value winner {hvw_index} placed {count} times"
            ));
        }
    }
    for (pack, count) in per_pack.iter().enumerate() {
        if *count > MAX_HVW_PER_PACK {
            findings.push(format!(
                "pack {pack} holds {count} high-value winners (cap {MAX_HVW_PER_PACK})"
            ));
        }
    }
    result(
        "high-value placement",
        findings,
        "all high-value winners placed once, within the live run and pack cap",
    )
}

/// (d) No two high-value tickets may print the same playable surface.
fn check_hvw_fingerprints(run: &GeneratedRun) -> CheckResult {
    if run.hvw.is_empty() {
        return skip("high-value uniqueness", "no high-value winners in this run");
    }
    let mut findings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (hvw_index, ticket) in run.hvw.iter().enumerate() {
        if let Some(first) = seen.insert(ticket.fingerprint(), hvw_index) {
            findings.push(format!(
                "high-value winners {first} and {hvw_index} share a fingerprint"
            ));
        }
    }
    result(
        "high-value uniqueness",
        findings,
        "all high-value winner fingerprints are distinct",
    )
}

/// (e) No winner tier may display a prize below the ticket sale price.
fn check_sub_price(project: &Project) -> CheckResult {
    if project.ticket_price <= 0 {
        return skip("sub-price prizes", "no ticket sale price configured");
    }
    let findings = project
        .prize_tiers
        .iter()
        .filter(|tier| tier.is_winner() && tier.value < project.ticket_price)
        .map(|tier| format!("prize '{}' is below the sale price", tier.display))
        .collect();
    result(
        "sub-price prizes",
        findings,
        "no prize pays below the ticket sale price",
    )
}

/// (f) No ticket may win on more than one game.
fn check_multi_win(project: &Project, run: &GeneratedRun, placed: &PlacedRun) -> CheckResult {
    let mut findings = Vec::new();
    for position in 0..placed.order.len() {
        let ticket = source_ticket(run, placed, position);
        let winners = module_wins(ticket, project)
            .iter()
            .filter(|win| win.is_some())
            .count();
        if winners > 1 {
            findings.push(format!("ticket {position} wins on {winners} games"));
        }
    }
    result(
        "accidental multi-win",
        findings,
        "no ticket wins on more than one game",
    )
}

/// (g) The module the generator marked as winning must be exactly the one
/// that independently validates as winning.
fn check_intended_winner(project: &Project, run: &GeneratedRun, placed: &PlacedRun) -> CheckResult {
    let mut findings = Vec::new();
    for position in 0..placed.order.len() {
        let ticket = source_ticket(run, placed, position);
        let derived = module_wins(ticket, project);
        for (module_index, module) in project.modules.iter().enumerate() {
            let intended = ticket
                .game_data
                .get(module_index)
                .map(|data| data.win_tier_index.is_some())
                .unwrap_or(false);
            if intended != derived[module_index].is_some() {
                let state = if intended { "marked winning but does not win" } else { "wins but was not marked winning" };
                findings.push(format!(
                    "ticket {position}: game {} {state}",
                    module.game_number
                ));
            }
        }
    }
    result(
        "intended winner agreement",
        findings,
        "generator-marked winners agree with independent validation",
    )
}

/// (h) Online prizes only ever ride on the online bonus module.
fn check_online_modules(project: &Project, run: &GeneratedRun, placed: &PlacedRun) -> CheckResult {
    if !project.prize_tiers.iter().any(|tier| tier.is_online) {
        return skip("online prizes", "no online prize tiers configured");
    }
    let mut findings = Vec::new();
    for position in 0..placed.order.len() {
        let ticket = source_ticket(run, placed, position);
        let declared_online = project.prize_tiers[ticket.win_tier_index].is_online;
        for (module_index, win) in module_wins(ticket, project).iter().enumerate() {
            let module = &project.modules[module_index];
            let online_win = match win {
                Some(ModuleWin::Fixed(tier_index)) => project
                    .prize_tiers
                    .get(*tier_index)
                    .map(|tier| tier.is_online)
                    .unwrap_or(false),
                _ => false,
            };
            let carries_online = online_win || (declared_online && win.is_some());
            if carries_online && !module.is_online_bonus() {
                findings.push(format!(
                    "ticket {position}: online prize won on game {}",
                    module.game_number
                ));
            }
            if module.is_online_bonus() && win.is_some() && !online_win {
                findings.push(format!(
                    "ticket {position}: online game {} carries a non-online prize",
                    module.game_number
                ));
            }
        }
    }
    result(
        "online prizes",
        findings,
        "online prizes appear only on the online bonus game",
    )
}
