//! Batch command - extract fields from many statement text files.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::warn;

use cardiq_core::{ExtractionResult, FieldKey, StatementExtractor};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input text files, e.g. "statements/*.txt"
    #[arg(required = true)]
    pattern: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: BatchFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BatchFormat {
    /// One CSV row per file
    Csv,
    /// JSON array of per-file results
    Json,
}

#[derive(Serialize)]
struct BatchRow {
    file: String,
    bank: String,
    card_variant: String,
    card_last4: String,
    billing_cycle: String,
    payment_due_date: String,
    total_balance_due: String,
}

pub fn run(args: BatchArgs, banks_path: Option<&str>) -> anyhow::Result<()> {
    let parser = super::build_parser(banks_path)?;

    let files: Vec<PathBuf> = glob::glob(&args.pattern)?
        .filter_map(|entry| entry.ok())
        .collect();
    if files.is_empty() {
        anyhow::bail!("No files matched pattern: {}", args.pattern);
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut rows = Vec::with_capacity(files.len());
    let mut failed = 0usize;
    for file in &files {
        progress.set_message(file.display().to_string());
        match fs::read_to_string(file).map_err(anyhow::Error::from).and_then(|text| {
            parser
                .extract_from_text(&text)
                .map_err(anyhow::Error::from)
        }) {
            Ok(result) => rows.push(to_row(file, &result)),
            Err(err) => {
                warn!(file = %file.display(), %err, "skipping file");
                failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let rendered = match args.format {
        BatchFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in &rows {
                writer.serialize(row)?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|err| anyhow::anyhow!("flushing csv output: {err}"))?;
            String::from_utf8(bytes)?
        }
        BatchFormat::Json => serde_json::to_string_pretty(&rows)?,
    };

    match args.output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    eprintln!(
        "{} {} processed, {} failed",
        style("done:").green().bold(),
        rows.len(),
        failed
    );
    Ok(())
}

fn to_row(file: &PathBuf, result: &ExtractionResult) -> BatchRow {
    let value = |key: FieldKey| {
        result
            .fields
            .get(key)
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    BatchRow {
        file: file.display().to_string(),
        bank: result.bank_name.clone(),
        card_variant: value(FieldKey::CardVariant),
        card_last4: value(FieldKey::CardLast4),
        billing_cycle: value(FieldKey::BillingCycle),
        payment_due_date: value(FieldKey::PaymentDueDate),
        total_balance_due: value(FieldKey::TotalBalanceDue),
    }
}
