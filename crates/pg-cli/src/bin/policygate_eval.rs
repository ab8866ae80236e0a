//! `policygate-eval` — single-shot evaluation of one intent against one
//! policy and state snapshot. Exit codes: 0 ALLOW/MODIFY, 1 DENY, 2 error.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pg_audit::{AuditEvent, AuditWriter};
use pg_engine::PolicyEngine;
use pg_model::{DecisionKind, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState};

#[derive(Parser)]
#[command(name = "policygate-eval", about = "Evaluate one order intent against a capital policy")]
struct Cli {
    /// Path to the YAML capital policy.
    #[arg(long)]
    policy: PathBuf,

    /// The order intent, as a JSON object.
    #[arg(long)]
    intent: String,

    /// The portfolio state, as a JSON object.
    #[arg(long)]
    portfolio: String,

    /// The market snapshot, as a JSON object.
    #[arg(long)]
    market: String,

    /// The execution/rate-limit state, as a JSON object.
    #[arg(long)]
    execution: String,

    /// Optional path to append the resulting audit event to.
    #[arg(long = "audit-log")]
    audit_log: Option<PathBuf>,

    /// Pretty-print the decision JSON instead of compact single-line output.
    #[arg(long)]
    pretty: bool,
}

fn run(cli: Cli) -> Result<DecisionKind> {
    let engine = PolicyEngine::from_path(&cli.policy).context("loading policy")?;

    let intent: OrderIntent = serde_json::from_str(&cli.intent).context("parsing --intent")?;
    intent.validate().context("validating --intent")?;

    let portfolio: PortfolioState =
        serde_json::from_str(&cli.portfolio).context("parsing --portfolio")?;
    portfolio.validate().context("validating --portfolio")?;

    let market: MarketSnapshot = serde_json::from_str(&cli.market).context("parsing --market")?;
    let execution: ExecutionState =
        serde_json::from_str(&cli.execution).context("parsing --execution")?;

    let result = engine.evaluate(&intent, &portfolio, &market, &execution);
    tracing::info!(
        intent_id = %result.decision.intent_id,
        decision = ?result.decision.decision,
        eval_ms = result.eval_ms,
        "evaluated intent"
    );

    if let Some(audit_log) = &cli.audit_log {
        let writer = AuditWriter::new(audit_log).context("opening audit log")?;
        let event = AuditEvent::new(
            pg_runner::ENGINE_VERSION,
            engine.policy_hash(),
            None,
            intent,
            portfolio,
            market,
            execution,
            result.decision.clone(),
        );
        writer.append(&event).context("writing audit event")?;
    }

    let out = if cli.pretty {
        serde_json::to_string_pretty(&result.decision)?
    } else {
        serde_json::to_string(&result.decision)?
    };
    println!("{out}");

    Ok(result.decision.decision)
}

fn main() -> ExitCode {
    pg_cli::init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(DecisionKind::Allow) | Ok(DecisionKind::Modify) => ExitCode::from(0),
        Ok(DecisionKind::Deny) => ExitCode::from(1),
        Err(err) => {
            eprintln!("policygate-eval: error: {err:#}");
            ExitCode::from(2)
        }
    }
}
