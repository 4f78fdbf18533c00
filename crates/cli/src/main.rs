use anyhow::{bail, Context};
use cardpress_core::{
    generate_run, place_run, run_checks, CheckResult, CheckStatus, CodeWidth, Event, EventBus,
    GameKind, Project, RngState, SecurityCodes, Ticket,
};
use cardpress_data::load_project;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
struct CliOptions {
    project: PathBuf,
    seed: Option<u64>,
    out: Option<PathBuf>,
    codes: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    project: String,
    seed: u64,
    lvw_tickets: usize,
    hvw_tickets: usize,
    print_tickets: usize,
    checks: Vec<CheckResult>,
    online_urls: Vec<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut project = None;
    let mut seed = None;
    let mut out = None;
    let mut codes = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                seed = Some(value.parse().context("--seed must be an integer")?);
            }
            "--out" => out = Some(PathBuf::from(args.next().context("--out needs a path")?)),
            "--codes" => {
                codes = Some(PathBuf::from(args.next().context("--codes needs a path")?))
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if project.is_none() && !other.starts_with('-') => {
                project = Some(PathBuf::from(other));
            }
            other => bail!("unexpected argument '{other}'"),
        }
    }
    let Some(project) = project else {
        print_usage();
        bail!("missing project file");
    };
    Ok(CliOptions {
        project,
        seed,
        out,
        codes,
    })
}

fn print_usage() {
    println!("usage: cardpress <project.json> [--seed N] [--out report.json] [--codes codes.json]");
}

fn run() -> anyhow::Result<()> {
    let options = parse_args()?;
    let project = load_project(&options.project)?;
    let seed = options.seed.unwrap_or_else(entropy_seed);
    let mut rng = RngState::from_seed(seed);
    let mut events = EventBus::default();

    println!(
        "{}: {} packs of {} ({} live), seed {seed}",
        project.name,
        project.print.print_packs,
        project.print.cards_per_pack,
        project.print.live_packs
    );

    let run = generate_run(&project, &mut rng, &mut events)?;
    let placed = place_run(&project, &run, &mut rng, &mut events)?;
    render_events(&mut events);

    let checks = run_checks(&project, &run, &placed, &mut events);
    render_events(&mut events);
    for check in &checks {
        println!("{:4} {} - {}", status_text(check.status), check.name, check.detail);
    }

    let tickets = placed.materialize(&run);
    let online_urls = match &options.codes {
        Some(path) => synthesize_online_urls(&project, &tickets, path)?,
        None => Vec::new(),
    };

    if let Some(out) = &options.out {
        let report = RunReport {
            project: project.name.clone(),
            seed,
            lvw_tickets: run.lvw.len(),
            hvw_tickets: run.hvw.len(),
            print_tickets: tickets.len(),
            checks: checks.clone(),
            online_urls,
        };
        let raw = serde_json::to_string_pretty(&report)?;
        std::fs::write(out, raw).with_context(|| format!("write {}", out.display()))?;
        println!("report written to {}", out.display());
    }
    if !checks_pass(&checks) {
        bail!("integrity checks reported failures");
    }
    Ok(())
}

fn checks_pass(checks: &[CheckResult]) -> bool {
    checks.iter().all(|check| check.status != CheckStatus::Fail)
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Skip => "SKIP",
    }
}

fn render_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::GenerationStarted {
                lvw_total,
                hvw_total,
            } => println!("generating {lvw_total} pack tickets and {hvw_total} high-value winners"),
            Event::GenerationProgress { percent, .. } => {
                if percent % 20 == 0 {
                    println!("  {percent}%");
                }
            }
            Event::GenerationFinished { tickets } => println!("generated {tickets} tickets"),
            Event::PlacementFinished {
                print_tickets,
                hvw_placed,
            } => println!("placed {hvw_placed} high-value winners into {print_tickets} positions"),
            Event::CheckFinished { .. } => {}
        }
    }
}

/// Join each online-winning ticket's module URL with the next security
/// code, in print order. The codes file is a plain JSON array of integers.
fn synthesize_online_urls(
    project: &Project,
    tickets: &[Ticket],
    codes_path: &Path,
) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(codes_path)
        .with_context(|| format!("read {}", codes_path.display()))?;
    let codes: Vec<u32> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", codes_path.display()))?;
    let mut stream = SecurityCodes::new(CodeWidth::Seven, codes);
    if stream.is_empty() {
        bail!("security code file is empty");
    }
    let Some(url) = project.modules.iter().find_map(|module| match &module.kind {
        GameKind::OnlineBonus { url } => Some(url.clone()),
        _ => None,
    }) else {
        return Ok(Vec::new());
    };

    let mut urls = Vec::new();
    for ticket in tickets {
        let online_win = project.prize_tiers[ticket.win_tier_index].is_online;
        if !online_win {
            continue;
        }
        if let Some(code) = stream.next_text() {
            urls.push(format!("{url}?c={code}"));
        }
    }
    Ok(urls)
}

fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
