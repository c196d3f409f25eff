use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scrooge_index::{DonorProfile, EstimationEngine, EstimatorConfig, FileSource, GiftSource};

const USAGE: &str = "usage: scrooge-index <profile.json> [records.csv|records.json ...] [--config <file>] [--json]";

struct Args {
    profile: PathBuf,
    record_files: Vec<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
}

enum Command {
    Help,
    Run(Args),
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut profile = None;
    let mut record_files = Vec::new();
    let mut config = None;
    let mut json = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config needs a file\n{}", USAGE),
            },
            "-h" | "--help" => return Ok(Command::Help),
            _ if profile.is_none() => profile = Some(PathBuf::from(arg)),
            _ => record_files.push(PathBuf::from(arg)),
        }
    }

    let Some(profile) = profile else {
        bail!("missing donor profile\n{}", USAGE);
    };

    Ok(Command::Run(Args {
        profile,
        record_files,
        config,
        json,
    }))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scrooge_index=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Run(args) => args,
    };
    init_tracing();

    let config = match &args.config {
        Some(path) => EstimatorConfig::from_file(path)?,
        None => EstimatorConfig::new(),
    };

    let profile = DonorProfile::from_file(&args.profile)?;
    let sources: Vec<Box<dyn GiftSource>> = args
        .record_files
        .iter()
        .map(|path| Box::new(FileSource::new(path.clone())) as Box<dyn GiftSource>)
        .collect();

    let estimate = EstimationEngine::from_config(&config).estimate(&profile, &sources);

    if args.json {
        println!("{}", estimate.to_json()?);
        return Ok(());
    }

    println!("💰 {}", estimate.donor);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", estimate.stats.summary());
    println!("\n{}", estimate.categories.summary());
    println!("\n{}", estimate.summary());
    if !estimate.empty_sources.is_empty() {
        println!("⚠️  No records from: {}", estimate.empty_sources.join(", "));
    }

    Ok(())
}
