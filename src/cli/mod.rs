//! regbench CLI module
//!
//! Phase commands for loading, analysing and model selection.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::dataset::Dataset;
use crate::evaluation::RankingSignal;
use crate::preprocessing::{handle_missing, normalize_columns, ImputeStrategy, ScalerType};
use crate::report::{render_analysis_report, render_performance_report, write_json_summary, write_report};
use crate::training::{ModelFamily, SelectionConfig, SelectionEngine, SelectionOutcome};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "regbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-validated selection and comparison of regression models")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the phases that read the canonical dataset
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Dataset CSV (header row, numeric columns)
    #[arg(short, long, default_value = "data/housing.csv")]
    pub data: PathBuf,

    /// Target column name
    #[arg(short, long, default_value = "target")]
    pub target: String,
}

/// Options of the model selection phase
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// JSON selection config; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Share of rows held out for testing
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Families to run (linear, knn, tree, svr); default all
    #[arg(long, value_delimiter = ',')]
    pub families: Vec<String>,

    /// Recommendation signal (test_error, cross_validation)
    #[arg(long)]
    pub signal: Option<String>,

    /// Run families one after another
    #[arg(long)]
    pub sequential: bool,

    /// Performance report path
    #[arg(short, long, default_value = "output/model_report.txt")]
    pub output: PathBuf,

    /// Optional JSON summary path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a CSV, optionally clean it, and save the canonical dataset
    Load {
        /// Raw input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Canonical output CSV
        #[arg(short, long, default_value = "data/housing.csv")]
        output: PathBuf,

        /// Target column; moved to the last position
        #[arg(short, long, default_value = "target")]
        target: String,

        /// Missing-value strategy (mean, median, drop, zero)
        #[arg(long)]
        impute: Option<String>,

        /// Normalize feature columns (minmax, standard)
        #[arg(long)]
        normalize: Option<String>,
    },

    /// Write the exploratory analysis report
    Analyze {
        #[command(flatten)]
        source: DataArgs,

        /// Report path
        #[arg(short, long, default_value = "output/analysis_report.txt")]
        output: PathBuf,
    },

    /// Sweep, train and compare every model family
    Models {
        #[command(flatten)]
        source: DataArgs,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Run analysis then model selection
    All {
        #[command(flatten)]
        source: DataArgs,

        #[command(flatten)]
        models: ModelArgs,

        /// Analysis report path
        #[arg(long, default_value = "output/analysis_report.txt")]
        analysis_output: PathBuf,
    },
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    step_run(&format!("Loading {}", path.display()));
    let start = Instant::now();
    let dataset = Dataset::load_csv(path)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        dataset.n_rows(),
        dataset.n_columns(),
        start.elapsed()
    ));
    Ok(dataset)
}

/// Reorder columns so the target comes last
fn target_last(dataset: &Dataset, target: &str) -> anyhow::Result<Dataset> {
    let features = dataset.feature_names(target)?;
    let mut order: Vec<usize> = features
        .iter()
        .map(|f| dataset.column_index(f))
        .collect::<crate::error::Result<_>>()?;
    order.push(dataset.column_index(target)?);

    let values = dataset.values().select(ndarray::Axis(1), &order);
    let mut columns = features;
    columns.push(target.to_string());
    Ok(Dataset::new(columns, values)?)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_load(
    input: &Path,
    output: &Path,
    target: &str,
    impute: Option<&str>,
    normalize: Option<&str>,
) -> anyhow::Result<()> {
    section("Load");

    // Reject bad names before touching the file
    let strategy = impute.map(str::parse::<ImputeStrategy>).transpose()?;
    let scaler = normalize.map(str::parse::<ScalerType>).transpose()?;

    let mut dataset = target_last(&load_dataset(input)?, target)?;

    let info = dataset.info();
    let missing: usize = info.missing.iter().map(|m| m.count).sum();
    step_ok(&format!("{} missing cells", missing));

    if let Some(strategy) = strategy {
        step_run(&format!("Handling missing values ({})", strategy));
        dataset = handle_missing(&dataset, strategy)?;
        step_done(&format!("{} rows", dataset.n_rows()));
    }

    if let Some(scaler) = scaler {
        let features = dataset.feature_names(target)?;
        let names: Vec<&str> = features.iter().map(String::as_str).collect();
        step_run(&format!("Normalizing {} features ({})", names.len(), scaler));
        dataset = normalize_columns(&dataset, &names, scaler)?;
        step_done("");
    }

    step_run(&format!("Saving → {}", output.display()));
    dataset.save_csv(output)?;
    step_done(&format!("{} rows × {} cols", dataset.n_rows(), dataset.n_columns()));
    println!();
    Ok(())
}

pub fn cmd_analyze(data: &DataArgs, output: &Path) -> anyhow::Result<()> {
    section("Analyze");
    let dataset = load_dataset(&data.data)?;

    step_run("Computing statistics");
    let report = render_analysis_report(&dataset, &data.target, now())?;
    step_done("");

    write_report(output, &report)?;
    step_ok(&format!("Report written to {}", output.display()));
    println!();
    Ok(())
}

/// Merge the optional JSON config with command-line overrides
pub fn build_config(data: &DataArgs, args: &ModelArgs) -> anyhow::Result<SelectionConfig> {
    let mut config = match &args.config {
        Some(path) => SelectionConfig::from_json_file(path)?,
        None => SelectionConfig::default(),
    };
    config.target_column = data.target.clone();

    if let Some(fraction) = args.test_fraction {
        config = config.with_test_fraction(fraction);
    }
    if let Some(seed) = args.seed {
        config = config.with_random_state(seed);
    }
    if !args.families.is_empty() {
        let families = args
            .families
            .iter()
            .map(|f| f.parse::<ModelFamily>())
            .collect::<crate::error::Result<Vec<_>>>()?;
        config = config.with_families(families);
    }
    if let Some(signal) = &args.signal {
        config = config.with_ranking_signal(signal.parse::<RankingSignal>()?);
    }
    if args.sequential {
        config = config.with_parallel(false);
    }

    config.validate()?;
    Ok(config)
}

fn print_outcome(outcome: &SelectionOutcome) {
    let comparison = &outcome.comparison;

    println!();
    println!(
        "  {:<20} {:<20} {:>10} {:>10}",
        muted("Model"),
        muted("Best"),
        muted("CV MSE"),
        muted("Test MSE")
    );
    println!("  {}", dim(&"─".repeat(64)));
    for result in &comparison.results {
        println!(
            "  {:<20} {:<20} {:>10.4} {:>10.4}",
            result.family().as_str(),
            result.model.hyperparameter.to_string(),
            result.sweep.best_cv.mean_mse,
            result.metrics.mse
        );
    }
    for failure in &outcome.failures {
        println!(
            "  {:<20} {}",
            failure.family.as_str(),
            format!("err: {}", failure.error).red()
        );
    }
    println!("  {}", dim(&"─".repeat(64)));

    println!();
    println!(
        "  {} {} {}",
        ok("best"),
        comparison.recommended.as_str().to_uppercase().white().bold(),
        muted(&format!("(by {})", comparison.signal))
    );
    if let Some(other) = comparison.alternative() {
        if other != comparison.recommended {
            println!("  {} {}", "note".yellow(), muted(&format!("the other signal prefers {}", other)));
        }
    }
}

pub fn cmd_models(data: &DataArgs, args: &ModelArgs) -> anyhow::Result<()> {
    section("Models");
    let config = build_config(data, args)?;
    let dataset = load_dataset(&data.data)?;

    step_run(&format!("Selecting among {} families", config.families.len()));
    let start = Instant::now();
    let outcome = SelectionEngine::new(config).run(&dataset)?;
    step_done(&format!("{:?}", start.elapsed()));

    print_outcome(&outcome);

    write_report(&args.output, &render_performance_report(&outcome, now()))?;
    println!();
    step_ok(&format!("Report written to {}", args.output.display()));
    if let Some(path) = &args.json {
        write_json_summary(path, &outcome)?;
        step_ok(&format!("Summary written to {}", path.display()));
    }
    println!();
    Ok(())
}

pub fn cmd_all(data: &DataArgs, args: &ModelArgs, analysis_output: &Path) -> anyhow::Result<()> {
    cmd_analyze(data, analysis_output)?;
    cmd_models(data, args)
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Load {
            input,
            output,
            target,
            impute,
            normalize,
        } => cmd_load(&input, &output, &target, impute.as_deref(), normalize.as_deref()),
        Commands::Analyze { source, output } => cmd_analyze(&source, &output),
        Commands::Models { source, models } => cmd_models(&source, &models),
        Commands::All {
            source,
            models,
            analysis_output,
        } => cmd_all(&source, &models, &analysis_output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_models_command() {
        let cli = Cli::try_parse_from([
            "regbench",
            "models",
            "--target",
            "MedHouseVal",
            "--families",
            "knn,tree",
            "--signal",
            "cv",
            "--sequential",
        ])
        .unwrap();

        match cli.command {
            Commands::Models { source: data, models } => {
                let config = build_config(&data, &models).unwrap();
                assert_eq!(config.target_column, "MedHouseVal");
                assert_eq!(config.families, vec![ModelFamily::Knn, ModelFamily::DecisionTree]);
                assert_eq!(config.ranking_signal, RankingSignal::CrossValidation);
                assert!(!config.parallel);
                assert_eq!(data.data, PathBuf::from("data/housing.csv"));
            }
            _ => panic!("expected models command"),
        }
    }

    #[test]
    fn test_bad_fraction_rejected_before_loading() {
        let cli = Cli::try_parse_from(["regbench", "models", "--test-fraction", "1.5"]).unwrap();
        match cli.command {
            Commands::Models { source: data, models } => assert!(build_config(&data, &models).is_err()),
            _ => panic!("expected models command"),
        }
    }

    #[test]
    fn test_target_last() {
        let ds = Dataset::new(
            vec!["y".into(), "a".into()],
            ndarray::array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap();
        let out = target_last(&ds, "y").unwrap();
        assert_eq!(out.columns(), &["a".to_string(), "y".to_string()]);
        assert_eq!(out.values()[[1, 1]], 3.0);
    }
}
