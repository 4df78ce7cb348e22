use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use salt2type_extractor::{ExtractorConfig, Pipeline, ReconciledModel};
use salt2type_model::ClassKind;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salt2type")]
#[command(about = "Recover a typed class model from Script# output", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the dump, reconcile it with the documentation and print the model as JSON
    Extract(ExtractArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Generated JavaScript dump
    #[arg(long)]
    source: PathBuf,

    /// Doxygen XML export of the original sources
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Newline-delimited ignore list (merged with the config's entries)
    #[arg(long)]
    ignore: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Extract(args) => run_extract(args),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExtractorConfig::default(),
    };

    if let Some(path) = &args.ignore {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ignore list {}", path.display()))?;
        let before = config.ignore.len();
        config.ignore.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
        log::debug!(
            "{} ignore entries from {}",
            config.ignore.len() - before,
            path.display()
        );
    }

    let model = Pipeline::new(config)
        .run_files(&args.source, args.docs.as_deref())
        .with_context(|| format!("Failed to extract {}", args.source.display()))?;
    log_kinds(&model);

    let json = model.to_json(args.pretty)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn log_kinds(model: &ReconciledModel) {
    let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
    for (_, class) in model.classes.iter() {
        let label = match class.kind() {
            ClassKind::Enum => "enums",
            ClassKind::AbstractClass => "abstract classes",
            ClassKind::Interface => "interfaces",
            ClassKind::ConcreteClass => "classes",
        };
        *kinds.entry(label).or_default() += 1;
    }

    let summary = kinds
        .iter()
        .map(|(label, count)| format!("{count} {label}"))
        .collect::<Vec<_>>()
        .join(", ");
    log::info!("Assembly '{}': {summary}", model.assembly_name);
}
