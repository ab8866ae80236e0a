use std::collections::BTreeMap;

use pg_model::{Evidence, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState, Severity, Side, Violation};
use pg_policy::EffectiveLimits;
use serde_json::json;

use crate::ids::RuleId;

fn inputs(pairs: Vec<(&str, serde_json::Value)>) -> BTreeMap<String, serde_json::Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// SYS-001 (CRIT): the intent's symbol has no usable quote.
///
/// Returns the valid price on success so callers never need to re-derive
/// (or assume) it downstream. No evidence is emitted on failure — there is
/// no metric to report when the price itself is the thing missing.
pub fn sys_001(intent: &OrderIntent, market: &MarketSnapshot) -> Result<f64, Violation> {
    let symbol = &intent.instrument.symbol;
    if let Some(price) = market.valid_price(symbol) {
        return Ok(price);
    }
    let raw = market.prices.get(symbol).copied();
    Err(Violation {
        rule_id: RuleId::Sys001.as_str().to_string(),
        severity: Severity::Crit,
        message: format!("no valid price for symbol {symbol}"),
        inputs: inputs(vec![("symbol", json!(symbol))]),
        computed: inputs(vec![("raw_price", json!(raw))]),
    })
}

/// KILL-001 (CRIT): the kill switch is already tripped.
pub fn kill_001(execution: &ExecutionState) -> Option<Violation> {
    if !execution.kill_switch_active {
        return None;
    }
    Some(Violation {
        rule_id: RuleId::Kill001.as_str().to_string(),
        severity: Severity::Crit,
        message: "kill switch is active".to_string(),
        inputs: BTreeMap::new(),
        computed: BTreeMap::new(),
    })
}

/// LOSS-001 (HIGH): daily loss limit.
pub fn loss_001(
    portfolio: &PortfolioState,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Evidence) {
    let daily_return = (portfolio.equity - portfolio.start_of_day_equity) / portfolio.start_of_day_equity;
    let limit = -limits.loss.daily_loss_limit_pct;

    let violation = (daily_return <= limit).then(|| Violation {
        rule_id: RuleId::Loss001.as_str().to_string(),
        severity: Severity::High,
        message: format!(
            "daily_return {daily_return} breached limit {limit} (daily_loss_limit_pct={})",
            limits.loss.daily_loss_limit_pct
        ),
        inputs: inputs(vec![
            ("equity", json!(portfolio.equity)),
            ("start_of_day_equity", json!(portfolio.start_of_day_equity)),
        ]),
        computed: inputs(vec![("daily_return", json!(daily_return)), ("limit", json!(limit))]),
    });

    (
        violation,
        Evidence {
            metric: "daily_return".to_string(),
            value: daily_return,
            limit: Some(limit),
        },
    )
}

/// LOSS-002 (CRIT): max drawdown from peak equity.
pub fn loss_002(
    portfolio: &PortfolioState,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Evidence) {
    let drawdown = (portfolio.peak_equity - portfolio.equity) / portfolio.peak_equity;
    let limit = limits.loss.max_drawdown_pct;

    let violation = (drawdown >= limit).then(|| Violation {
        rule_id: RuleId::Loss002.as_str().to_string(),
        severity: Severity::Crit,
        message: format!("drawdown {drawdown} breached limit {limit}"),
        inputs: inputs(vec![
            ("equity", json!(portfolio.equity)),
            ("peak_equity", json!(portfolio.peak_equity)),
        ]),
        computed: inputs(vec![("drawdown", json!(drawdown)), ("limit", json!(limit))]),
    });

    (
        violation,
        Evidence {
            metric: "drawdown".to_string(),
            value: drawdown,
            limit: Some(limit),
        },
    )
}

/// EXEC-001 (HIGH): global order-rate throttle.
pub fn exec_001(
    execution: &ExecutionState,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Evidence) {
    let count = execution.orders_last_minute_global;
    let limit = limits.execution.max_orders_per_minute_global;

    let violation = (count >= limit).then(|| Violation {
        rule_id: RuleId::Exec001.as_str().to_string(),
        severity: Severity::High,
        message: format!("orders_last_minute_global {count} >= limit {limit}"),
        inputs: BTreeMap::new(),
        computed: inputs(vec![("orders_last_minute_global", json!(count)), ("limit", json!(limit))]),
    });

    (
        violation,
        Evidence {
            metric: "orders_last_minute_global".to_string(),
            value: count as f64,
            limit: Some(limit as f64),
        },
    )
}

/// EXEC-002 (HIGH): per-strategy order-rate throttle.
pub fn exec_002(
    intent: &OrderIntent,
    execution: &ExecutionState,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Evidence) {
    let count = execution.orders_last_minute_for(&intent.strategy_id);
    let limit = limits.execution.max_orders_per_minute_by_strategy;

    let violation = (count >= limit).then(|| Violation {
        rule_id: RuleId::Exec002.as_str().to_string(),
        severity: Severity::High,
        message: format!(
            "orders_last_minute_by_strategy[{}] {count} >= limit {limit}",
            intent.strategy_id
        ),
        inputs: inputs(vec![("strategy_id", json!(intent.strategy_id))]),
        computed: inputs(vec![
            ("orders_last_minute_by_strategy", json!(count)),
            ("limit", json!(limit)),
        ]),
    });

    (
        violation,
        Evidence {
            metric: "orders_last_minute_by_strategy".to_string(),
            value: count as f64,
            limit: Some(limit as f64),
        },
    )
}

/// Signed quantity change this intent would apply to its symbol's position.
fn signed_qty(intent: &OrderIntent) -> f64 {
    match intent.side {
        Side::Buy => intent.qty,
        Side::Sell => -intent.qty,
    }
}

fn floor4(x: f64) -> f64 {
    (x * 10_000.0).floor() / 10_000.0
}

/// EXP-001 outcome: in addition to the usual (violation, evidence) pair,
/// carries `allowed_qty` — the evaluator needs this to build `modified_intent`
/// for a MODIFY verdict.
pub struct Exp001Outcome {
    pub violation: Option<Violation>,
    pub evidence: Evidence,
    pub allowed_qty: f64,
}

/// EXP-001 (HIGH, MODIFY-capable): single-symbol position-size limit.
pub fn exp_001(
    intent: &OrderIntent,
    portfolio: &PortfolioState,
    price: f64,
    limits: &EffectiveLimits,
) -> Exp001Outcome {
    let symbol = &intent.instrument.symbol;
    let current_position_qty = portfolio.position_qty(symbol);
    let current_position_value = current_position_qty * price;
    let signed_delta = signed_qty(intent) * price;
    let new_position_value = current_position_value + signed_delta;
    let new_position_pct = new_position_value.abs() / portfolio.equity;
    let limit = limits.exposure.max_position_pct;

    let allowed_qty = floor4(
        ((limit * portfolio.equity - current_position_value.abs()) / price).max(0.0),
    );

    let fires = new_position_pct > limit;
    let violation = fires.then(|| Violation {
        rule_id: RuleId::Exp001.as_str().to_string(),
        severity: Severity::High,
        message: format!("new_position_pct {new_position_pct} exceeds limit {limit}"),
        inputs: inputs(vec![
            ("symbol", json!(symbol)),
            ("price", json!(price)),
            ("current_position_qty", json!(current_position_qty)),
            ("equity", json!(portfolio.equity)),
        ]),
        computed: inputs(vec![
            ("new_position_pct", json!(new_position_pct)),
            ("limit", json!(limit)),
            ("allowed_qty", json!(allowed_qty)),
        ]),
    });

    Exp001Outcome {
        violation,
        evidence: Evidence {
            metric: "new_position_pct".to_string(),
            value: new_position_pct,
            limit: Some(limit),
        },
        allowed_qty,
    }
}

/// EXP-002 (HIGH): gross exposure across the book, including the
/// hypothetical post-fill state of the intent's own symbol.
pub fn exp_002(
    intent: &OrderIntent,
    portfolio: &PortfolioState,
    market: &MarketSnapshot,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Evidence) {
    let gross = gross_exposure_value(intent, portfolio, market);
    let limit = limits.exposure.max_gross_exposure_x;

    let violation = (gross > limit).then(|| Violation {
        rule_id: RuleId::Exp002.as_str().to_string(),
        severity: Severity::High,
        message: format!("gross exposure {gross} exceeds limit {limit}"),
        inputs: BTreeMap::new(),
        computed: inputs(vec![("gross", json!(gross)), ("limit", json!(limit))]),
    });

    (
        violation,
        Evidence {
            metric: "gross_exposure".to_string(),
            value: gross,
            limit: Some(limit),
        },
    )
}

/// EXP-003 (HIGH): net exposure across the book. Skipped entirely
/// (returns `None` for both violation and evidence) when the policy has
/// no configured net-exposure limit.
pub fn exp_003(
    intent: &OrderIntent,
    portfolio: &PortfolioState,
    market: &MarketSnapshot,
    limits: &EffectiveLimits,
) -> (Option<Violation>, Option<Evidence>) {
    let Some(limit) = limits.exposure.max_net_exposure_x else {
        return (None, None);
    };

    let net = net_exposure_value(intent, portfolio, market);

    let violation = (net > limit).then(|| Violation {
        rule_id: RuleId::Exp003.as_str().to_string(),
        severity: Severity::High,
        message: format!("net exposure {net} exceeds limit {limit}"),
        inputs: BTreeMap::new(),
        computed: inputs(vec![("net", json!(net)), ("limit", json!(limit))]),
    });

    (
        violation,
        Some(Evidence {
            metric: "net_exposure".to_string(),
            value: net,
            limit: Some(limit),
        }),
    )
}

/// Per-symbol signed position value after hypothetically applying `intent`,
/// shared by EXP-002/EXP-003. Symbols with no valid quote in `market`
/// contribute zero — a stale/missing quote cannot inflate or mask exposure.
fn hypothetical_position_values(
    intent: &OrderIntent,
    portfolio: &PortfolioState,
    market: &MarketSnapshot,
) -> Vec<f64> {
    let intent_symbol = &intent.instrument.symbol;
    let intent_price = market.valid_price(intent_symbol).unwrap_or(0.0);
    let new_intent_qty = portfolio.position_qty(intent_symbol) + signed_qty(intent);

    let mut values = Vec::with_capacity(portfolio.positions.len() + 1);
    let mut saw_intent_symbol = false;

    for (symbol, qty) in &portfolio.positions {
        if symbol == intent_symbol {
            saw_intent_symbol = true;
            values.push(new_intent_qty * intent_price);
        } else {
            let price = market.valid_price(symbol).unwrap_or(0.0);
            values.push(qty * price);
        }
    }

    if !saw_intent_symbol {
        values.push(new_intent_qty * intent_price);
    }

    values
}

fn gross_exposure_value(intent: &OrderIntent, portfolio: &PortfolioState, market: &MarketSnapshot) -> f64 {
    let sum: f64 = hypothetical_position_values(intent, portfolio, market)
        .into_iter()
        .map(f64::abs)
        .sum();
    sum / portfolio.equity
}

fn net_exposure_value(intent: &OrderIntent, portfolio: &PortfolioState, market: &MarketSnapshot) -> f64 {
    let sum: f64 = hypothetical_position_values(intent, portfolio, market).into_iter().sum();
    sum.abs() / portfolio.equity
}
