//! triage-plan — one-shot execution-plan preview for a CSV dataset.
//!
//! Loads a tabular file, canonicalizes its schema, runs the fast-signal
//! battery, and prints the resulting rule execution plan and its summary as
//! JSON. Nothing is executed or persisted: rule execution belongs to the
//! external executor.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use triage_core::Frame;
use triage_rules::canonicalize::{self, FileMetadata};
use triage_rules::registry::RuleRegistry;
use triage_rules::router::RuleRouter;
use triage_rules::signals::SignalEngine;

// ── CLI ─────────────────────────────────────────────────────────────

/// Preview which detection rules would run against a dataset.
#[derive(Parser, Debug)]
#[command(name = "triage-plan", version, about)]
struct Cli {
    /// Path to the input CSV file.
    #[arg(long, env = "TRIAGE_INPUT")]
    input: String,

    /// Plan against the raw columns without schema canonicalization.
    #[arg(long, default_value_t = false)]
    no_canonicalize: bool,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let frame = Frame::from_csv_path(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input))?;
    info!(
        rows = frame.row_count(),
        columns = frame.column_count(),
        "loaded dataset"
    );

    let (frame, mut metadata) = if cli.no_canonicalize {
        let metadata = FileMetadata::for_frame(&frame);
        (frame, metadata)
    } else {
        canonicalize::canonicalize(&frame)
    };

    let router = RuleRouter::new(
        RuleRegistry::with_builtin_rules(),
        SignalEngine::with_builtin_signals(),
    );
    let plan = router.create_execution_plan(&frame, &mut metadata);
    let summary = router.plan_summary(&plan);

    info!(
        scheduled = plan.rules_to_execute.len(),
        estimated_cost_ms = plan.estimated_cost,
        risk = metadata.risk_score,
        "plan ready"
    );

    let output = serde_json::json!({
        "file_type": metadata.file_type,
        "confidence": metadata.confidence,
        "risk_score": metadata.risk_score,
        "detected_schema": metadata.detected_schema,
        "plan": plan,
        "summary": summary,
    });

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
