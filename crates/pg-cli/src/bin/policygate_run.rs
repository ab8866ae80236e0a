//! `policygate-run` — streams a sequence of intents through the engine and
//! a broker, evolving portfolio and execution state, and writes the audit
//! log, the execution event log, and a final `RunSummary`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pg_audit::AuditWriter;
use pg_engine::PolicyEngine;
use pg_model::{ExecutionState, MarketSnapshot, PortfolioState};
use pg_runner::ExecEventWriter;

#[derive(Parser)]
#[command(name = "policygate-run", about = "Stream a sequence of intents through the policy engine")]
struct Cli {
    /// Path to the YAML capital policy.
    #[arg(long)]
    policy: PathBuf,

    /// Path to a JSONL file of order intents, one per line, in order.
    #[arg(long)]
    intents: PathBuf,

    /// Path to the initial portfolio state JSON.
    #[arg(long)]
    portfolio: PathBuf,

    /// Path to the market snapshot JSON, held constant for the whole run.
    #[arg(long)]
    market: PathBuf,

    /// Path to the initial execution/rate-limit state JSON.
    #[arg(long)]
    execution: PathBuf,

    /// Path to append audit events to.
    #[arg(long = "audit-log")]
    audit_log: PathBuf,

    /// Path to append execution (broker lifecycle) events to.
    #[arg(long = "exec-log")]
    exec_log: PathBuf,

    /// Broker implementation: sim is the only one wired in-tree.
    #[arg(long, default_value = "sim")]
    broker: String,

    /// Path to write the final RunSummary JSON to.
    #[arg(long)]
    summary: PathBuf,
}

fn run(cli: Cli) -> Result<()> {
    let engine = PolicyEngine::from_path(&cli.policy).context("loading policy")?;
    let intents = pg_cli::load_intents_jsonl(&cli.intents)?;
    let mut portfolio: PortfolioState = pg_cli::load_json(&cli.portfolio)?;
    let market: MarketSnapshot = pg_cli::load_json(&cli.market)?;
    let mut execution: ExecutionState = pg_cli::load_json(&cli.execution)?;

    let mut broker = pg_cli::build_broker(&cli.broker, &market)?;
    let audit_writer = AuditWriter::new(&cli.audit_log).context("opening audit log")?;
    let exec_writer = ExecEventWriter::new(&cli.exec_log).context("opening exec log")?;

    tracing::info!(
        policy_hash = engine.policy_hash(),
        intent_count = intents.len(),
        "starting stream run"
    );

    let summary = pg_runner::run_stream(
        &engine,
        broker.as_mut(),
        &audit_writer,
        &exec_writer,
        intents,
        &market,
        &mut portfolio,
        &mut execution,
    )
    .context("stream run halted")?;

    tracing::info!(
        run_id = %summary.run_id,
        total_intents = summary.total_intents,
        orders_submitted = summary.orders_submitted,
        orders_filled = summary.orders_filled,
        kill_switch_active = summary.kill_switch_active,
        "stream run complete"
    );

    let summary_json = serde_json::to_string_pretty(&summary)?;
    fs::write(&cli.summary, summary_json).context("writing run summary")?;

    Ok(())
}

fn main() -> ExitCode {
    pg_cli::init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("policygate-run: error: {err:#}");
            ExitCode::from(2)
        }
    }
}
