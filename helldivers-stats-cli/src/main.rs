mod inputs;
mod reports;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use helldivers_stats::{AnalysisConfig, PlayTime, StatsEngine};
use inputs::{CliSource, apply_overrides, load_analysis_config, open_source, parse_names};
use reports::Analysis;

#[derive(Debug, Parser)]
#[command(name = "helldivers-stats", version)]
#[command(about = "Derive and compare Helldivers mission statistics from raw career counters")]
struct Args {
    /// Counter assignment, e.g. `missions_played=10` (repeatable)
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// CSV or JSON file holding one subject per row or object
    #[arg(long)]
    input: Option<PathBuf>,

    /// Compare the first two subjects instead of analyzing the first
    #[arg(long)]
    compare: bool,

    /// Display names for the subjects (comma-separated; leave a slot blank to keep its name)
    #[arg(long)]
    names: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Append chart data (terminal bars in console reports)
    #[arg(long)]
    charts: bool,

    /// Reject counters that describe impossible states
    #[arg(long)]
    strict: bool,

    /// Analysis configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play time as shown in game, e.g. "4d 19h 54m 42s"
    #[arg(long)]
    playtime: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let play_time = parse_play_time(&args)?;
    if args.input.is_none() && args.fields.is_empty() {
        if let Some(play_time) = play_time {
            let mut output_target = OutputTarget::new(args.output.clone())?;
            writeln!(output_target.writer(), "Play Time: {play_time}")?;
            output_target.flush_inner()?;
            return Ok(());
        }
        bail!("no counters given: pass --field key=value or --input <file>");
    }

    if args.report == "console" {
        announce_banner();
    }

    let names = name_slots(&args);
    let config = resolve_config(&args)?;
    let source = open_source(args.input.as_deref(), &args.fields)?;
    let mut analysis = run_analysis(&args, source, &config)?;
    analysis.rename(&names);

    write_reports(&args, &config, &analysis, play_time)
}

fn announce_banner() {
    println!("{}", "🪖 Helldivers Mission Statistics".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn parse_play_time(args: &Args) -> Result<Option<PlayTime>> {
    args.playtime
        .as_deref()
        .map(|text| text.parse::<PlayTime>().context("invalid --playtime"))
        .transpose()
}

fn name_slots(args: &Args) -> Vec<Option<String>> {
    args.names.as_deref().map(parse_names).unwrap_or_default()
}

fn resolve_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = load_analysis_config(args.config.as_ref())?;
    apply_overrides(&mut config, args.strict, &name_slots(args));
    if args.verbose {
        println!(
            "⚙️  Validation: {:?}, subjects: {} / {}",
            config.validation,
            config.subjects.first.green(),
            config.subjects.second.green()
        );
    }
    Ok(config)
}

fn run_analysis(args: &Args, source: CliSource, config: &AnalysisConfig) -> Result<Analysis> {
    let mut stats = StatsEngine::new(source, config);
    if args.compare {
        let comparison = stats
            .compare_first_two()
            .context("failed to compare subjects")?;
        return Ok(Analysis::Comparison(comparison));
    }

    let subjects = stats.analyze_all().context("failed to analyze counters")?;
    let count = subjects.len();
    if count > 1 {
        log::warn!("input holds {count} subjects; analyzing the first (use --compare for two)");
    }
    if args.verbose {
        println!("📥 Derived {count} subject(s)");
    }
    let first = subjects
        .into_iter()
        .next()
        .context("input holds no subjects")?;
    Ok(Analysis::Single(first))
}

fn write_reports(
    args: &Args,
    config: &AnalysisConfig,
    analysis: &Analysis,
    play_time: Option<PlayTime>,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(
            &mut output_target,
            analysis,
            config,
            play_time,
            args.charts,
        )?,
        "markdown" => reports::generate_markdown_report(&mut output_target, analysis, play_time)?,
        "csv" => reports::generate_csv_report(&mut output_target, analysis)?,
        _ => reports::generate_console_report(
            &mut output_target,
            analysis,
            config,
            play_time,
            args.charts,
        )?,
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
