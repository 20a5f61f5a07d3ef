//! flow-ids entrypoint: score an uploaded flow table, or consolidate raw capture CSVs.
//! Artifacts load once at startup; a batch that fails validation or inference is logged
//! and reported without partial output.

use clap::{Parser, Subcommand};
use flow_ids::{
    config::{ClassificationMode, IdsConfig},
    consolidate::{discover_inputs, Consolidator, StreamingConsolidator},
    inference::{run_inference, InferenceContext},
    logging::StructuredLogger,
    report::{AnnotatedReport, SummaryDocument},
    risk::{filter_by_confidence, Summary},
    table::RawTable,
};
use std::path::PathBuf;
use tracing::{error, info};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "flow-ids")]
#[command(about = "Batch intrusion detection over network-flow feature tables", long_about = None)]
struct Cli {
    /// JSON config file (default: $FLOW_IDS_CONFIG or config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every row of a feature table
    Predict {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Annotated CSV output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Summary JSON output
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Drop predictions below this confidence (percent, 0-100)
        #[arg(long)]
        min_confidence: Option<f64>,

        /// ONNX classifier
        #[arg(long)]
        model: Option<PathBuf>,

        /// Scaler JSON
        #[arg(long)]
        scaler: Option<PathBuf>,

        /// Label encoder JSON (implies multi-class)
        #[arg(long)]
        encoder: Option<PathBuf>,
    },

    /// Merge raw capture CSVs into one labeled dataset
    Consolidate {
        /// Input files or directories (directories expand to their *.csv files)
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Output CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Keep class names instead of 0/1 labels
        #[arg(long)]
        multi_class: bool,

        /// Keep non-numeric columns
        #[arg(long)]
        all_columns: bool,

        /// Append file by file without union alignment or deduplication
        #[arg(long)]
        streaming: bool,

        /// Clean files one at a time
        #[arg(long)]
        sequential: bool,

        /// Consolidation report JSON output
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| {
        std::env::var("FLOW_IDS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    })
}

fn predict(
    mut config: IdsConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    summary_path: Option<PathBuf>,
    min_confidence: Option<f64>,
) -> Result<(), BoxError> {
    if let Some(min) = min_confidence {
        config.report.min_confidence = min;
    }

    let ctx = match InferenceContext::load(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "cannot serve inference without artifacts");
            return Err(e.into());
        }
    };

    let table = RawTable::from_path(&input)?;
    info!(file = %input.display(), rows = table.len(), columns = table.columns().len(), "table loaded");

    let results = run_inference(&ctx, &table)?;
    let kept = filter_by_confidence(&results, config.report.min_confidence);
    let summary = Summary::from_results(kept.iter().copied(), ctx.baseline_classes());
    info!(
        scored = results.len(),
        kept = kept.len(),
        attacks = summary.attacks,
        critical = summary.critical,
        status = summary.status.label(),
        "batch scored"
    );

    if let Some(path) = output {
        let written = AnnotatedReport {
            table: &table,
            mode: ctx.mode(),
            label_column: &config.inference.label_column,
        }
        .write_path(&path, &kept)?;
        info!(file = %path.display(), rows = written, "report written");
    }

    let doc = SummaryDocument::new(summary, results.len(), config.report.min_confidence);
    if let Some(path) = summary_path {
        doc.write_path(&path)?;
    }
    StructuredLogger::emit_json(&doc, &mut std::io::stdout().lock())?;
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let mut config = IdsConfig::load(&config_path(&cli));

    StructuredLogger::init(config.log.json, &config.log.level);

    match cli.command {
        Commands::Predict {
            input,
            output,
            summary,
            min_confidence,
            model,
            scaler,
            encoder,
        } => {
            if let Some(p) = model {
                config.artifacts.model_path = p;
            }
            if let Some(p) = scaler {
                config.artifacts.scaler_path = p;
            }
            if let Some(p) = encoder {
                config.artifacts.encoder_path = Some(p);
                config.artifacts.mode = ClassificationMode::MultiClass;
            }
            predict(config, input, output, summary, min_confidence)
        }
        Commands::Consolidate {
            input,
            output,
            multi_class,
            all_columns,
            streaming,
            sequential,
            report,
        } => {
            let mut cc = config.consolidation;
            if multi_class {
                cc.binary = false;
            }
            if all_columns {
                cc.numeric_only = false;
            }
            if sequential {
                cc.parallel = false;
            }

            let paths = discover_inputs(&input)?;
            info!(files = paths.len(), streaming, "consolidating");

            let report_json = if streaming {
                let r = StreamingConsolidator::new(cc).run(&paths, &output)?;
                serde_json::to_value(&r)?
            } else {
                let (table, r) = Consolidator::new(cc).consolidate(&paths)?;
                table.write_csv(&output)?;
                info!(file = %output.display(), rows = table.len(), "dataset written");
                serde_json::to_value(&r)?
            };

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&report_json)?)?;
            }
            StructuredLogger::emit_json(&report_json, &mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}
