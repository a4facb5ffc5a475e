//! Extract command - pull fields from a single statement text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use cardiq_core::{ExtractionResult, FieldKey, StatementExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores in text output
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, banks_path: Option<&str>) -> anyhow::Result<()> {
    let parser = super::build_parser(banks_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        fs::read_to_string(&args.input)?
    };

    let result = match parser.extract_from_text(&text) {
        Ok(result) => result,
        Err(err) => {
            // The output contract: a hard failure is still a structured answer.
            let body = serde_json::json!({
                "status": "error",
                "message": err.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
    };

    info!(bank = %result.bank_id, "extraction complete");

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Csv => to_csv(&result)?,
        OutputFormat::Text => to_text(&result, args.show_confidence),
    };

    match args.output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn to_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["field", "value", "confidence", "snippet"])?;
    for key in FieldKey::ALL {
        let field = result.fields.get(key);
        writer.write_record([
            key.as_str(),
            &field
                .value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            &format!("{:.2}", field.confidence),
            &field.snippet,
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing csv output: {err}"))?;
    Ok(String::from_utf8(bytes)?)
}

fn to_text(result: &ExtractionResult, show_confidence: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n\n",
        style("Bank:").bold(),
        result.bank_name
    ));
    for key in FieldKey::ALL {
        let field = result.fields.get(key);
        let value = field
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| style("(not found)").dim().to_string());
        if show_confidence {
            out.push_str(&format!(
                "{:<18} {}  ({:.0}%)\n",
                format!("{key}:"),
                value,
                field.confidence * 100.0
            ));
        } else {
            out.push_str(&format!("{:<18} {}\n", format!("{key}:"), value));
        }
    }
    if !result.warnings.is_empty() {
        out.push('\n');
        for warning in &result.warnings {
            out.push_str(&format!("{} {}\n", style("warning:").yellow(), warning));
        }
    }
    out
}
