//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - builds the market and fits the estimator
//! - prints reports and writes optional exports

use std::io::{self, Write};

use clap::Parser;

use crate::cli::{Command, EstimateArgs, EvaluateArgs, MarketArgs, SampleArgs, ShowArgs, TrendsArgs};
use crate::data::MarketConfig;
use crate::domain::PriceQuery;
use crate::error::{AppError, EstimatorError};

pub mod pipeline;
pub mod session;

pub use pipeline::{MarketSnapshot, SessionSettings, build_market, generate_market};
pub use session::Session;

/// Entry point for the `hpe` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Clap requires a subcommand name, so `hpe` and `hpe --area ...` are
    // rewritten to `hpe session` and `hpe estimate --area ...` before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init_logging(&cli.log_level);

    match cli.command {
        Command::Estimate(args) => handle_estimate(args),
        Command::Session(args) => handle_session(args),
        Command::Sample(args) => handle_sample(args),
        Command::Trends(args) => handle_trends(args),
        Command::Evaluate(args) => handle_evaluate(args),
        Command::Cities => handle_cities(),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let query = PriceQuery::new(args.area, args.bedrooms, args.bathrooms, args.city)?;
    let settings = args.market.settings();
    let mut session = Session::new(settings);

    let outcome = session.estimate(query)?;
    println!("{}", crate::report::format_estimate(&outcome));

    if let Some(path) = &args.export_json {
        let data_seed = session.data_seed().ok_or(EstimatorError::NotFitted)?;
        let forest = session.estimator()?.config();
        crate::io::write_estimate_json(path, &outcome, data_seed, forest)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_session(args: MarketArgs) -> Result<(), AppError> {
    let mut session = Session::new(args.settings());
    session.prepare()?;
    let records = session.records()?.len();
    let data_seed = session.data_seed().ok_or(EstimatorError::NotFitted)?;
    println!("Market ready: {records} properties (seed {data_seed}).");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let answered = crate::cli::prompt::run_prompt(&mut session, stdin.lock(), &mut stdout)?;
    stdout
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush output: {e}")))?;
    tracing::debug!(answered, "session finished");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let (data_seed, records) = generate_market(&args.market.settings())?;
    println!("{}", crate::report::format_sample_summary(&records, data_seed));

    if let Some(path) = &args.export {
        crate::io::write_records_csv(path, &records)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_trends(args: TrendsArgs) -> Result<(), AppError> {
    let (data_seed, records) = generate_market(&args.market.settings())?;
    let averages = crate::report::average_price_by_city(&records);
    let histogram = crate::report::price_histogram(&records, args.bins);

    println!("{}", crate::report::format_sample_summary(&records, data_seed));
    println!("{}", crate::report::format_trends(&averages, &histogram));
    Ok(())
}

fn handle_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let settings = args.market.settings();
    let (data_seed, records) = generate_market(&settings)?;
    let report = crate::fit::evaluate_holdout(&records, args.holdout, &settings.forest, args.split_seed)?;

    println!("{}", crate::report::format_sample_summary(&records, data_seed));
    println!("{}", crate::report::format_evaluation(&report, &settings.forest));
    Ok(())
}

fn handle_cities() -> Result<(), AppError> {
    let table = crate::report::city_table(&MarketConfig::default());
    println!("{}", crate::report::format_cities(&table));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let doc = crate::io::read_estimate_json(&args.estimate)?;
    println!(
        "Exported {} by {} | data seed {} | trees {} (forest seed {})\n",
        doc.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        doc.tool,
        doc.data_seed,
        doc.forest.n_trees,
        doc.forest.seed
    );
    println!("{}", crate::report::format_estimate(&doc.outcome()));
    Ok(())
}

/// Flags that only make sense for `hpe estimate`.
const ESTIMATE_FLAGS: [&str; 4] = ["--area", "--bedrooms", "--bathrooms", "--city"];

/// Rewrite argv so `hpe` defaults to the interactive session.
///
/// Rules:
/// - `hpe`                      -> `hpe session`
/// - `hpe --area 1500 ...`      -> `hpe estimate --area 1500 ...`
/// - `hpe --log-level debug`    -> `hpe session --log-level debug`
/// - `hpe --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("session".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        let wants_estimate = argv[1..].iter().any(|a| {
            let name = a.split_once('=').map_or(a.as_str(), |(name, _)| name);
            ESTIMATE_FLAGS.contains(&name)
        });
        let command = if wants_estimate { "estimate" } else { "session" };
        argv.insert(1, command.to_string());
    }
    argv
}
