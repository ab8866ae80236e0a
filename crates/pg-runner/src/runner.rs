use pg_audit::{AuditEvent, AuditWriter};
use pg_broker::Broker;
use pg_engine::PolicyEngine;
use pg_model::{DecisionKind, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState, Side};
use uuid::Uuid;

use crate::error::RunnerError;
use crate::exec_event::{ExecEvent, ExecEventWriter};
use crate::summary::RunSummary;

/// Version string stamped into every audit event this crate writes.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

struct OpenOrder {
    order_id: String,
    intent_id: String,
    symbol: String,
    side: Side,
}

fn signed_qty(side: Side, qty: f64) -> f64 {
    match side {
        Side::Buy => qty,
        Side::Sell => -qty,
    }
}

fn map_broker_err(e: Box<dyn std::error::Error + Send + Sync>) -> RunnerError {
    RunnerError::Broker(e)
}

/// Drives `intents` through `engine` and `broker` in strict sequence,
/// mutating `portfolio` and `execution` as fills and rate-limit windows
/// evolve. `market` is the live price snapshot held constant for the
/// whole run — the v0.1 contract has no per-tick market feed.
///
/// Per intent: evaluate, write the audit event (always, before any broker
/// I/O), fold fired violations into the rolling kill-switch window, and —
/// only for an ALLOW/MODIFY verdict — submit to the broker, poll fills,
/// and apply them to portfolio and rate-limit state. A broker exception
/// emits `ORDER_REJECTED` and halts the run; the audit log up to that
/// point is left intact on disk.
pub fn run_stream(
    engine: &PolicyEngine,
    broker: &mut dyn Broker,
    audit_writer: &AuditWriter,
    exec_writer: &ExecEventWriter,
    intents: impl IntoIterator<Item = OrderIntent>,
    market: &MarketSnapshot,
    portfolio: &mut PortfolioState,
    execution: &mut ExecutionState,
) -> Result<RunSummary, RunnerError> {
    let run_id = Uuid::new_v4();
    let policy_hash = engine.policy_hash().to_string();
    let kill_switch_cfg = &engine.policy().limits.kill_switch;
    let window_seconds = kill_switch_cfg.violation_window_seconds as i64;
    let trip_after_n = kill_switch_cfg.trip_after_n_violations as usize;

    let mut summary = RunSummary::new(run_id);
    let mut open_orders: Vec<OpenOrder> = Vec::new();

    for intent in intents {
        summary.total_intents += 1;
        let now_epoch = intent.timestamp.timestamp();

        let eval = engine.evaluate(&intent, portfolio, market, execution);
        let decision = eval.decision;
        tracing::debug!(
            intent_id = %decision.intent_id,
            decision = ?decision.decision,
            eval_ms = eval.eval_ms,
            "evaluated intent"
        );

        let audit_event = AuditEvent::new(
            ENGINE_VERSION,
            policy_hash.clone(),
            Some(run_id),
            intent.clone(),
            portfolio.clone(),
            market.clone(),
            execution.clone(),
            decision.clone(),
        );
        audit_writer.append(&audit_event)?;

        for violation in &decision.violations {
            summary.record_rule(&violation.rule_id);
            execution.record_violation(&violation.rule_id, now_epoch, window_seconds);
        }

        if decision.kill_switch_triggered {
            if !execution.kill_switch_active {
                tracing::warn!(intent_id = %intent.intent_id, "kill switch hard trip");
            }
            execution.kill_switch_active = true;
        }
        if execution.violations_in_window.len() >= trip_after_n {
            if !execution.kill_switch_active {
                tracing::warn!(intent_id = %intent.intent_id, "kill switch soft trip: violation window full");
            }
            execution.kill_switch_active = true;
        }

        match decision.decision {
            DecisionKind::Allow => summary.decisions.allow += 1,
            DecisionKind::Modify => summary.decisions.modify += 1,
            DecisionKind::Deny => summary.decisions.deny += 1,
        }

        if decision.decision == DecisionKind::Deny {
            tracing::warn!(intent_id = %intent.intent_id, "intent denied");
            continue;
        }

        let order_intent = decision.modified_intent.clone().unwrap_or_else(|| intent.clone());

        let ack = match broker.submit(&order_intent) {
            Ok(ack) => ack,
            Err(e) => {
                exec_writer.append(&ExecEvent::rejected(
                    intent.intent_id.clone(),
                    "",
                    run_id,
                    policy_hash.clone(),
                ))?;
                return Err(map_broker_err(e));
            }
        };

        exec_writer.append(&ExecEvent::submitted(
            order_intent.intent_id.clone(),
            ack.order_id.clone(),
            run_id,
            policy_hash.clone(),
            order_intent.instrument.symbol.clone(),
            order_intent.side,
            order_intent.qty,
            order_intent.order_type,
        ))?;
        summary.orders_submitted += 1;

        execution.orders_last_minute_global += 1;
        *execution
            .orders_last_minute_by_strategy
            .entry(order_intent.strategy_id.clone())
            .or_insert(0) += 1;

        open_orders.push(OpenOrder {
            order_id: ack.order_id.clone(),
            intent_id: order_intent.intent_id.clone(),
            symbol: order_intent.instrument.symbol.clone(),
            side: order_intent.side,
        });

        let open_ids: Vec<String> = open_orders.iter().map(|o| o.order_id.clone()).collect();
        let fills = broker.poll_fills(&open_ids).map_err(map_broker_err)?;

        let mut filled_ids = std::collections::HashSet::new();
        for fill in &fills {
            exec_writer.append(&ExecEvent::filled(
                fill.intent_id.clone(),
                fill.order_id.clone(),
                run_id,
                policy_hash.clone(),
                fill.symbol.clone(),
                fill.side,
                fill.qty,
                fill.price,
            ))?;
            let delta = signed_qty(fill.side, fill.qty);
            portfolio.adjust_position(&fill.symbol, delta);
            portfolio.equity += -delta * fill.price;
            summary.orders_filled += 1;
            filled_ids.insert(fill.order_id.clone());
        }

        let mut still_open = Vec::new();
        for order in open_orders.drain(..) {
            if filled_ids.contains(&order.order_id) {
                continue;
            }
            let state = broker.get_order(&order.order_id).map_err(map_broker_err)?;
            if state.status == pg_broker::OrderStatus::Rejected {
                exec_writer.append(&ExecEvent::rejected(
                    order.intent_id.clone(),
                    order.order_id.clone(),
                    run_id,
                    policy_hash.clone(),
                ))?;
            } else {
                still_open.push(order);
            }
        }
        open_orders = still_open;

        portfolio.update_peak();
    }

    summary.final_equity = portfolio.equity;
    summary.final_positions = portfolio.positions.clone();
    summary.kill_switch_active = execution.kill_switch_active;

    Ok(summary)
}
