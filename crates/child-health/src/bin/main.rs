//! Child health command-line interface

use anyhow::Result;
use chrono::NaiveDate;
use child_health::cli::session::{Session, SessionConfig, parse_date};
use child_health::cli::{assess, due_date, nutrition, output, reference, zscore};
use child_health_types::{GrowthMetric, Sex};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Child health analytics tool
#[derive(Parser)]
#[command(name = "child-health")]
#[command(author, version, about = "Child health growth, nutrition, vaccination and risk analytics", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Evaluation date (default: today)
    #[arg(long, global = true, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with reference documents overriding the embedded ones
    #[arg(short = 'R', long, global = true)]
    reference_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full profile summary with risk and prediction decision
    Assess {
        /// Profile file (JSON)
        profile: PathBuf,
    },

    /// Z-score of a single measurement
    Zscore {
        /// Sex (male, female, other)
        #[arg(long, value_parser = zscore::parse_sex)]
        sex: Sex,

        /// Age in months
        #[arg(long)]
        age_months: f64,

        /// Weight in kg or height in cm
        #[arg(long)]
        value: f64,

        /// Metric (weight, height)
        #[arg(long, default_value = "weight", value_parser = zscore::parse_metric)]
        metric: GrowthMetric,
    },

    /// Due date from a recommended-age text
    DueDate {
        /// Recommended age, e.g. "6, 10, 14 weeks"
        #[arg(long)]
        text: String,

        /// Dose number (1-based)
        #[arg(long, default_value_t = 1)]
        dose: u32,

        /// Date of birth
        #[arg(long, value_parser = parse_date)]
        dob: NaiveDate,
    },

    /// Weekly nutrition summary and recommendations
    Nutrition {
        /// Profile file (JSON)
        profile: PathBuf,

        /// First day of the 7-day window
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
    },

    /// Reference data commands
    Reference {
        #[command(subcommand)]
        command: ReferenceCommands,
    },
}

#[derive(Subcommand)]
enum ReferenceCommands {
    /// Load reference documents and report counts and warnings
    Validate {
        /// Directory to validate (default: the active reference data)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let session = Session::load(SessionConfig {
        reference_dir: cli.reference_dir,
        config_file: cli.config,
        as_of: cli.as_of,
        format: cli.format,
        output_file: cli.output,
    })?;

    match cli.command {
        Commands::Assess { profile } => assess::assess(&session, assess::AssessConfig { profile }),

        Commands::Zscore {
            sex,
            age_months,
            value,
            metric,
        } => zscore::zscore(
            &session,
            zscore::ZScoreConfig {
                sex,
                age_months,
                value,
                metric,
            },
        ),

        Commands::DueDate { text, dose, dob } => due_date::run(
            &session,
            due_date::DueDateConfig {
                text,
                dose,
                date_of_birth: dob,
            },
        ),

        Commands::Nutrition { profile, start } => {
            nutrition::nutrition(&session, nutrition::NutritionConfig { profile, start })
        }

        Commands::Reference {
            command: ReferenceCommands::Validate { dir },
        } => reference::validate(
            &session,
            reference::ValidateConfig {
                dir,
                verbose: cli.verbose,
            },
        ),
    }
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
