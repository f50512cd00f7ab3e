//! skills-ml - command line entry point
//!
//! Computes cached job posting properties from JSON lines files, prints
//! stored partitions and evaluates occupation classifier results.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use skills_ml::{
    computed_properties::computers::{
        PostingIdPresent, TitleCleanPhaseOne, TitleCleanPhaseTwo, TitleDictionary, YearlyPay,
    },
    config::SkillsMlConfig,
    error::{Result, SkillsMlError},
    evaluation::{OccupationClassificationEvaluator, SocTarget, VecResultGenerator},
    ComputedProperty, JobPosting, ObjectStore,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Properties that can be computed without injected algorithms
const PROPERTY_NAMES: &[&str] = &[
    "posting_id_present",
    "title_clean_phase_one",
    "title_clean_phase_two",
    "yearly_pay",
];

#[derive(Parser)]
#[command(name = "skills-ml")]
#[command(about = "Job posting computed properties and occupation classifier evaluation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to skills-ml.toml when present)
    #[arg(long, global = true, env = "SKILLS_ML_CONFIG")]
    config: Option<PathBuf>,

    /// Set log level (overrides the configured level)
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a property over a JSON lines file of job postings
    Compute {
        /// Property name
        #[arg(short, long)]
        property: String,

        /// Job postings, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// JSON file with places, states and occupations for title_clean_phase_two
        #[arg(long)]
        title_dictionary: Option<PathBuf>,
    },

    /// Print the cached values of a property for one date partition
    Show {
        /// Property name
        #[arg(short, long)]
        property: String,

        /// Date partition (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Evaluate classifier results given as {"predicted", "truth"} JSON lines
    Evaluate {
        /// Results file
        #[arg(short, long)]
        input: PathBuf,

        /// Target variable name (full_soc, major_group, ...)
        #[arg(short, long, default_value = "full_soc")]
        target: String,
    },
}

/// One line of an evaluation results file
#[derive(Debug, Deserialize)]
struct LabelledResult {
    predicted: String,
    truth: String,
}

fn build_property(
    name: &str,
    title_dictionary: Option<&Path>,
    store: Arc<dyn ObjectStore>,
) -> Result<ComputedProperty> {
    let property = match name {
        "posting_id_present" => ComputedProperty::new(PostingIdPresent, store),
        "title_clean_phase_one" => ComputedProperty::new(TitleCleanPhaseOne, store),
        "title_clean_phase_two" => {
            let dictionary = match title_dictionary {
                Some(path) => TitleDictionary::load(path)?,
                None => TitleDictionary::default(),
            };
            ComputedProperty::new(TitleCleanPhaseTwo::new(dictionary), store)
        }
        "yearly_pay" => ComputedProperty::new(YearlyPay, store),
        other => {
            return Err(SkillsMlError::Configuration(format!(
                "unknown property '{}', expected one of: {}",
                other,
                PROPERTY_NAMES.join(", ")
            )))
        }
    };
    Ok(property)
}

async fn read_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect())
}

async fn compute(
    config: &SkillsMlConfig,
    property: &str,
    input: &Path,
    title_dictionary: Option<&Path>,
) -> Result<()> {
    let property = build_property(property, title_dictionary, config.build_store()?)?;

    let mut postings = Vec::new();
    for (line_number, line) in read_lines(input).await? {
        let posting = JobPosting::from_slice(line.as_bytes())
            .with_context(|| format!("{}:{}: invalid job posting", input.display(), line_number))?;
        postings.push(posting);
    }
    debug!("Read {} postings from {}", postings.len(), input.display());

    let summary = property.compute_on_collection(&postings).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn show(config: &SkillsMlConfig, property: &str, date: &str) -> Result<()> {
    let property = build_property(property, None, config.build_store()?)?;
    let date_key = skills_ml::DateKey::parse(date)?;
    let cache = property.cache_for_key(date_key.as_str()).await?;
    println!("{}", serde_json::to_string_pretty(&cache)?);
    Ok(())
}

async fn evaluate(input: &Path, target: &str) -> Result<()> {
    let mut pairs = Vec::new();
    for (line_number, line) in read_lines(input).await? {
        let result: LabelledResult = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid result", input.display(), line_number))?;
        pairs.push((result.predicted, result.truth));
    }

    let choices: BTreeSet<&str> = pairs
        .iter()
        .flat_map(|(p, t)| [p.as_str(), t.as_str()])
        .collect();
    let generator = VecResultGenerator::from_labels(SocTarget::new(target, choices), &pairs)?;
    let evaluator = OccupationClassificationEvaluator::new(&generator)?;
    info!(
        "Evaluated {} results for target {}",
        pairs.len(),
        target
    );

    let report = serde_json::json!({
        "classification": evaluator.base().report(),
        "major_group": evaluator.major_group_report(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SkillsMlConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let level = match cli.log_level.as_deref().unwrap_or(&config.log_level) {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!("skills_ml={}", level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("skills-ml v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Compute {
            property,
            input,
            title_dictionary,
        } => compute(&config, &property, &input, title_dictionary.as_deref()).await,
        Commands::Show { property, date } => show(&config, &property, &date).await,
        Commands::Evaluate { input, target } => evaluate(&input, &target).await,
    }
}
