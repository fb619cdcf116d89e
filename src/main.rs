use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use perfscore::config::{AppConfig, ConfigError};
use perfscore::input::{self, FeatureRecord, InputError};
use perfscore::logging::init_logging;
use perfscore::model::error::{LoadError, PredictionError};
use perfscore::model::schema::employee_performance_v1;
use perfscore::pipeline::assess::Predictor;
use perfscore::pipeline::registry::ModelRegistry;
use perfscore::report::ReportFormat;
use perfscore::report::json::{render_assessment_json, render_schema_json};
use perfscore::report::text::{render_assessment_text, render_schema_text};

/// Score an employee record against a trained performance model.
#[derive(Debug, Parser)]
#[command(name = "perfscore", version, propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file (model path, load timeout, band thresholds, advice)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict a rating, band and recommendation for one record
    Predict(PredictArgs),
    /// Print the feature schema a model artifact expects
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
struct ModelArgs {
    /// Model artifact (.json or .json.gz)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Give up on loading the artifact after this many seconds
    #[arg(long)]
    load_timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Debug, Args)]
struct PredictArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// JSON object mapping feature names to values
    #[arg(long)]
    record: Option<PathBuf>,

    /// Feature assignment NAME=VALUE; repeatable, overrides --record
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Start from the default values of the six-field employee form
    #[arg(long)]
    defaults: bool,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("could not render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("empty record: pass --record, --set NAME=VALUE or --defaults")]
    EmptyRecord,
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Load(_) | CliError::Prediction(PredictionError::ModelUnavailable(_)) => 2,
            CliError::Prediction(PredictionError::Schema(_)) => 3,
            CliError::Prediction(PredictionError::Estimator { .. }) => 4,
            _ => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let base = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Predict(args) => {
            let config = apply_model_args(base, &args.model)?;
            let record = build_record(&args)?;
            let registry = Arc::new(ModelRegistry::new(config.load_timeout()));
            let predictor = Predictor::new(registry.handle(&config.model_path), config.scorer());
            let assessment = predictor.assess(&record)?;
            let rendered = match args.model.format {
                ReportFormat::Text => render_assessment_text(&assessment),
                ReportFormat::Json => render_assessment_json(&assessment)?,
            };
            println!("{rendered}");
        }
        Command::Schema(args) => {
            let config = apply_model_args(base, &args.model)?;
            let registry = Arc::new(ModelRegistry::new(config.load_timeout()));
            let model = registry.handle(&config.model_path).model()?;
            let rendered = match args.model.format {
                ReportFormat::Text => render_schema_text(&model.schema),
                ReportFormat::Json => render_schema_json(&model.schema)?,
            };
            println!("{rendered}");
        }
    }
    Ok(())
}

fn apply_model_args(mut config: AppConfig, args: &ModelArgs) -> Result<AppConfig, CliError> {
    if let Some(path) = &args.model {
        config.model_path = path.clone();
    }
    if let Some(secs) = args.load_timeout_secs {
        config.load_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn build_record(args: &PredictArgs) -> Result<FeatureRecord, CliError> {
    let mut record = if args.defaults {
        employee_performance_v1().defaults()
    } else {
        FeatureRecord::new()
    };
    if let Some(path) = &args.record {
        record.merge(input::load_record(path)?);
    }
    record.merge(input::record_from_assignments(&args.assignments)?);
    if record.is_empty() {
        return Err(CliError::EmptyRecord);
    }
    Ok(record)
}
