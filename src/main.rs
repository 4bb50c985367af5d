use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use notam_curator::app::filter_use_case::{FilterSummary, FilterUseCase};
use notam_curator::app::fix_labels_use_case::{FixLabelsSummary, FixLabelsUseCase};
use notam_curator::config::Config;
use notam_curator::infra::{FilterFileOutput, JsonLinesDataset, NotamFileSource};
use notam_curator::logging;
use notam_curator::pipeline::normalize::{parse_bearing_str, parse_coordinate, LabelAudit};
use notam_curator::pipeline::relevance::{classify, is_cancellation};

#[derive(Parser)]
#[command(name = "notam_curator")]
#[command(about = "Curates NOTAM data for runway-performance extraction")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split downloaded NOTAMs into relevant and excluded sets
    Filter {
        /// JSON array of NOTAM records (defaults to the configured data dir)
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        relevant_out: Option<PathBuf>,
        #[arg(long)]
        excluded_out: Option<PathBuf>,
    },
    /// Audit and repair labeling artifacts in the silver dataset
    FixLabels {
        /// JSONL silver dataset (defaults to the configured data dir)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Rewrite without writing a .bak copy first
        #[arg(long)]
        no_backup: bool,
    },
    /// Classify a single NOTAM text
    Classify {
        text: String,
    },
    /// Normalize a single coordinate or bearing value
    #[command(group(ArgGroup::new("value").required(true).args(["coordinate", "bearing"])))]
    Normalize {
        #[arg(long)]
        coordinate: Option<String>,
        #[arg(long)]
        bearing: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    let _guard = logging::init_logging(&config.logging.dir);

    match cli.command {
        Commands::Filter {
            input,
            relevant_out,
            excluded_out,
        } => {
            let input = input.unwrap_or_else(|| config.paths.all_notams_path());
            let relevant_out = relevant_out.unwrap_or_else(|| config.paths.filtered_notams_path());
            let excluded_out = excluded_out.unwrap_or_else(|| config.paths.excluded_notams_path());
            info!(input = %input.display(), "Starting relevance filter");

            let use_case = FilterUseCase::with_keyword_classifier(
                Box::new(NotamFileSource::new(&input)),
                Box::new(FilterFileOutput::new(&relevant_out, &excluded_out)),
            );
            let summary = use_case.run().await?;
            print_filter_summary(&summary);
            println!("\n💾 Relevant NOTAMs: {}", relevant_out.display());
            println!("💾 Excluded NOTAMs: {}", excluded_out.display());
        }
        Commands::FixLabels { dataset, no_backup } => {
            let dataset = dataset.unwrap_or_else(|| config.paths.silver_dataset_path());
            info!(dataset = %dataset.display(), "Starting label fix");

            let use_case = FixLabelsUseCase::new(
                Box::new(JsonLinesDataset::new(&dataset)),
                config.labels.backup && !no_backup,
                config.labels.low_confidence_threshold,
            );
            let summary = use_case.run().await?;
            print_fix_labels_summary(&summary, config.labels.low_confidence_threshold);
        }
        Commands::Classify { text } => {
            let result = classify(&text);
            println!("relevant: {}", result.is_relevant);
            println!("reason:   {}", result.reason);
            if is_cancellation(&text) {
                println!("note:     cancellation");
            }
        }
        Commands::Normalize { coordinate, bearing } => {
            if let Some(raw) = coordinate {
                match parse_coordinate(&raw) {
                    Some(parsed) => println!("{}", parsed),
                    None => println!("null"),
                }
            }
            if let Some(raw) = bearing {
                match parse_bearing_str(&raw) {
                    Some(degrees) => println!("{}", degrees),
                    None => println!("null"),
                }
            }
        }
    }

    Ok(())
}

fn print_filter_summary(summary: &FilterSummary) {
    println!("\n📊 Filter Results:");
    println!("   Total NOTAMs: {}", summary.total);
    println!("   Relevant: {} ({:.1}%)", summary.relevant, summary.relevant_pct());
    println!("   Excluded: {} ({:.1}%)", summary.excluded, summary.excluded_pct());
    println!("   Cancellations among relevant: {}", summary.canceled_relevant);

    if !summary.reasons.is_empty() {
        println!("\n   Exclusion reasons:");
        for (reason, count) in &summary.reasons {
            println!("     {}: {}", reason, count);
        }
    }

    if !summary.top_locations.is_empty() {
        println!("\n   Top locations:");
        for (location, count) in &summary.top_locations {
            println!("     {}: {}", location, count);
        }
    }

    let elapsed = summary.finished_at - summary.started_at;
    println!("\n   Finished in {} ms", elapsed.num_milliseconds());
}

fn print_audit(title: &str, audit: &LabelAudit) {
    println!("\n🔎 {}:", title);
    println!("   Records: {} ({} runway entries)", audit.records, audit.entries);
    println!("   'ALL' runways: {}", audit.all_runways);
    println!("   Coordinates to convert: {}", audit.coordinates_to_convert);
    println!("   Bearings to convert: {}", audit.bearings_to_convert);
    println!("   Non-text bearings: {}", audit.odd_bearings);
    println!("   Coordinates in decimal format: {}", audit.coordinates_in_decimal);
    println!("   Numeric bearings: {}", audit.numeric_bearings);
}

fn print_fix_labels_summary(summary: &FixLabelsSummary, threshold: f64) {
    print_audit("Before fixing", &summary.before);
    println!(
        "   Records below confidence {:.2}: {}",
        threshold, summary.low_confidence_records
    );

    let Some(after) = &summary.after else {
        println!("\n✅ No issues to fix");
        return;
    };

    if let Some(path) = &summary.backup_path {
        println!("\n💾 Backup written to {}", path.display());
    }
    println!("\n🛠️  Applied {} fixes", summary.fixes.changes());
    print_audit("After fixing", after);
}
