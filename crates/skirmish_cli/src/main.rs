mod session;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use skirmish_core::SimulationRng;
use skirmish_kit::{BattleReport, GameConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use session::{Console, Finished};

#[derive(Parser)]
#[command(version, about = "Turn-based two-team battle simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build two armies at the console and watch them fight.
    Play(BattleArgs),
    /// Build both armies automatically from the seed and fight to the end.
    Auto(AutoArgs),
    /// Continue a battle from a save file.
    Resume(ResumeArgs),
    /// Summarise an existing battle report.
    Report(ReportArgs),
}

#[derive(Args)]
struct BattleArgs {
    /// TOML game config.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Where to write the JSON battle report.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct AutoArgs {
    #[command(flatten)]
    battle: BattleArgs,
    #[arg(long, default_value = "Red")]
    home: String,
    #[arg(long, default_value = "Blue")]
    away: String,
}

#[derive(Args)]
struct ResumeArgs {
    #[command(flatten)]
    battle: BattleArgs,
    #[arg(long)]
    save: PathBuf,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
    /// Print the whole report as JSON instead of the digest.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Play(args) => handle_play(args),
        Commands::Auto(args) => handle_auto(args),
        Commands::Resume(args) => handle_resume(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn init_tracing(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config_filter.unwrap_or("warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

/// Loads the config, starts logging and seeds the dice.
fn prepare(args: &BattleArgs) -> Result<(GameConfig, SimulationRng)> {
    let config = GameConfig::load(args.config.as_deref())?;
    init_tracing(config.trace_filter());
    let params = config.simulation_params(args.seed);
    info!(target: "skirmish_cli", seed = params.seed, "dice seeded");
    Ok((config, SimulationRng::from_params(&params)))
}

fn handle_play(args: BattleArgs) -> Result<()> {
    let (config, dice) = prepare(&args)?;
    let seed = dice.seed();
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    match session::play(&mut console, &config, dice)? {
        Some(finished) => finish(&args, &config, seed, finished),
        None => Ok(()),
    }
}

fn handle_auto(args: AutoArgs) -> Result<()> {
    let (config, dice) = prepare(&args.battle)?;
    let seed = dice.seed();
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let names = (args.home.as_str(), args.away.as_str());
    let finished = session::auto(&mut console, &config, names, dice)?;
    finish(&args.battle, &config, seed, finished)
}

fn handle_resume(args: ResumeArgs) -> Result<()> {
    let (config, dice) = prepare(&args.battle)?;
    let seed = dice.seed();
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    let finished = session::resume(&mut console, &config, &args.save, dice)
        .with_context(|| format!("failed to resume from {}", args.save.display()))?;
    finish(&args.battle, &config, seed, finished)
}

fn handle_report(args: ReportArgs) -> Result<()> {
    init_tracing(None);
    let report = BattleReport::from_path(&args.input)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

/// Writes the JSON report when a path was given on the command line or in
/// the config.
fn finish(args: &BattleArgs, config: &GameConfig, seed: u64, finished: Finished) -> Result<()> {
    info!(target: "skirmish_cli", rounds = finished.rounds, outcome = ?finished.outcome, "battle finished");
    let Some(path) = args.report.as_deref().or(config.report_path()) else {
        return Ok(());
    };
    let run_id = format!("battle-{}", Utc::now().format("%Y%m%dT%H%M%S"));
    let report = BattleReport::new(
        run_id,
        seed,
        finished.rounds,
        finished.outcome,
        [&finished.home, &finished.away],
        finished.events,
    );
    report.write_to(path)?;
    println!("Report written to {}", path.display());
    Ok(())
}
