mod draft;
mod reports;
mod runner;
mod scenarios;
mod seeds;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use civdraft_engine::DraftState;
use civdraft_engine::constants::{MAX_PLAYERS, MIN_PLAYERS};
use draft::{DraftPreview, Engine, load_template, preview};
use runner::{ScenarioResult, ScenarioRunner};
use scenarios::{expand_scenarios, find_scenario, list_scenarios};
use seeds::resolve_seed_tokens;
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Property scenarios across seeds and iterations
    Scenarios,
    /// Run one full draft per seed and print the assignment
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "civdraft-tester", version)]
#[command(about = "Seeded QA sweeps and draft previews for the civdraft engine")]
struct Args {
    /// What to run: property scenarios or a draft preview
    #[arg(long, value_enum, default_value_t = RunMode::Scenarios)]
    mode: RunMode,

    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; `now` and `start..end` are expanded)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON session template for draft mode; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player count for draft mode when no template is given
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seed_tokens(&split_csv(&args.seeds))?;
    let engine = Engine::builtin().context("loading built-in catalog")?;

    match args.mode {
        RunMode::Scenarios => {
            let results = run_scenarios(&args, &engine, &seeds);
            write_reports(&args, &results, start_time)?;
            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
        }
        RunMode::Draft => {
            let template = draft_template(&args)?;
            let previews = seeds
                .iter()
                .map(|seed| preview(&engine, &template, seed))
                .collect::<Result<Vec<_>>>()?;
            write_previews(&args, &previews)?;
        }
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎲 Civdraft Tester".bright_cyan().bold());
    println!("{}", "==================".cyan());
}

fn draft_template(args: &Args) -> Result<DraftState> {
    if let Some(path) = &args.config {
        return load_template(path);
    }
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        bail!(
            "--players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
            args.players
        );
    }
    Ok(DraftState::default().with_players(args.players))
}

fn run_scenarios(args: &Args, engine: &Engine, seeds: &[String]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Draft Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let runner = ScenarioRunner::new(engine, args.verbose);
    let mut results = Vec::new();
    for name in expand_scenarios(split_csv(&args.scenarios)) {
        if let Some(scenario) = find_scenario(&name) {
            results.extend(runner.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, results)?,
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Civdraft Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn write_previews(args: &Args, previews: &[DraftPreview]) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Console => reports::write_preview_console(&mut output_target, previews)?,
        ReportFormat::Json => reports::write_preview_json(&mut output_target, previews)?,
        ReportFormat::Markdown => reports::write_preview_markdown(&mut output_target, previews)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
