mod sink;
mod snapshot;

use clap::{Args, Parser, Subcommand};
use fpl_planner::config::AppConfig;
use fpl_planner::error::AppError;
use fpl_planner::planner::{
    Autopilot, CatalogBuilder, CycleOutcome, DecisionEngine, DecisionSink, DegradedPolicy,
    Position, ScoredCandidate, SignalMap, StaticSignals,
};
use fpl_planner::telemetry;
use sink::JsonDecisionWriter;
use snapshot::Snapshot;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "fpl-autopilot",
    about = "Build, maintain and line up a fantasy football squad from a data snapshot",
    version
)]
struct Cli {
    /// Override APP_LOG_LEVEL for this run
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one decision cycle and write the decision JSON to stdout
    Plan(PlanArgs),
    /// Print the scored player table, best first
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Snapshot JSON with elements, teams, events and (optionally) my_team
    #[arg(long)]
    snapshot: PathBuf,
    /// JSON object mapping player names to score adjustments
    #[arg(long)]
    signals: Option<PathBuf>,
    /// Squad budget in tenths (overrides config)
    #[arg(long)]
    budget: Option<u32>,
    /// Maximum players per club (overrides config)
    #[arg(long)]
    group_cap: Option<u8>,
    /// Free transfers left (defaults to the snapshot's limit minus made)
    #[arg(long, allow_hyphen_values = true)]
    free_transfers: Option<i32>,
    /// Abort on the first invalid element instead of dropping it
    #[arg(long)]
    strict: bool,
    /// Do not emit decisions that came up short of the squad or formation rules
    #[arg(long)]
    withhold_degraded: bool,
    /// Pretty-print the decision JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Flat CSV export of the player table
    #[arg(long)]
    players: PathBuf,
    /// JSON object mapping player names to score adjustments
    #[arg(long)]
    signals: Option<PathBuf>,
    /// Only show this position (GKP, DEF, MID or FWD)
    #[arg(long, value_parser = parse_position)]
    position: Option<Position>,
    /// Number of rows to print
    #[arg(long, default_value_t = 20)]
    top: usize,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "fpl autopilot starting");

    match cli.command {
        Command::Plan(args) => run_plan(args, config),
        Command::Score(args) => run_score(args, config),
    }
}

fn parse_position(raw: &str) -> Result<Position, String> {
    Position::ALL
        .into_iter()
        .find(|position| position.short_name().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| format!("unknown position '{raw}', expected GKP, DEF, MID or FWD"))
}

fn load_signals(path: Option<&Path>) -> Result<SignalMap, AppError> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            let signals: SignalMap = serde_json::from_reader(BufReader::new(file))?;
            info!(path = %path.display(), entries = signals.len(), "signals loaded");
            Ok(signals)
        }
        None => Ok(SignalMap::new()),
    }
}

fn run_plan(args: PlanArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(budget) = args.budget {
        config.engine.squad.budget = budget;
    }
    if let Some(cap) = args.group_cap {
        config.engine.squad.group_cap = cap;
    }
    config.engine.validate()?;

    let sink = Arc::new(JsonDecisionWriter::stdout(args.pretty));
    let outcome = plan_cycle(&args, config, sink)?;

    if !outcome.applied {
        warn!(
            kind = ?outcome.decision.kind,
            "decision withheld because it is degraded; nothing written"
        );
    }
    Ok(())
}

fn plan_cycle<D>(
    args: &PlanArgs,
    config: AppConfig,
    sink: Arc<D>,
) -> Result<CycleOutcome, AppError>
where
    D: DecisionSink + 'static,
{
    let snapshot = Snapshot::from_path(&args.snapshot)?;
    let catalog = snapshot.catalog(args.strict)?;
    let signals = load_signals(args.signals.as_deref())?;

    let policy = if args.withhold_degraded {
        DegradedPolicy::Withhold
    } else {
        DegradedPolicy::Apply
    };
    let autopilot = Autopilot::new(config.engine, Arc::new(StaticSignals(signals)), sink)
        .with_degraded_policy(policy);

    let free_transfers_left = args
        .free_transfers
        .unwrap_or_else(|| snapshot.free_transfers_left());
    let gameweek = snapshot.next_gameweek();
    if gameweek.is_none() {
        warn!("snapshot has no upcoming event; deciding without a gameweek");
    }

    Ok(autopilot.run_cycle(
        catalog,
        snapshot.current_roster(),
        free_transfers_left,
        gameweek,
    )?)
}

fn run_score(args: ScoreArgs, config: AppConfig) -> Result<(), AppError> {
    let records = CatalogBuilder::read_csv_path(&args.players)?;
    let (catalog, rejected) = CatalogBuilder::default().build_lenient(&records);
    if !rejected.is_empty() {
        warn!(dropped = rejected.len(), "player table contained invalid rows");
    }
    let signals = load_signals(args.signals.as_deref())?;

    let board = DecisionEngine::new(config.engine).score(&catalog, &signals);
    let rows: Vec<&ScoredCandidate> = board
        .ranked()
        .into_iter()
        .filter(|entry| {
            args.position
                .map_or(true, |position| entry.candidate.position == position)
        })
        .take(args.top)
        .collect();

    for line in render_ranking(&rows) {
        println!("{line}");
    }
    Ok(())
}

fn render_ranking(rows: &[&ScoredCandidate]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(rank, entry)| {
            let candidate = &entry.candidate;
            format!(
                "{:>3}. {:<20} {} {:<14} {:>5.1}m {:>8.2}  {:?}",
                rank + 1,
                candidate.name,
                candidate.position,
                candidate.group_name,
                f64::from(candidate.cost) / 10.0,
                entry.score(),
                candidate.availability
            )
        })
        .collect()
}
