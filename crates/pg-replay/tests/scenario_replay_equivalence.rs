use std::collections::BTreeMap;

use chrono::Utc;
use pg_audit::AuditEvent;
use pg_engine::PolicyEngine;
use pg_model::{AssetClass, DecisionKind, ExecutionState, Instrument, MarketSnapshot, OrderIntent, OrderType, PortfolioState, Side};

const POLICY: &str = r#"
version: "0.1"
timezone: "UTC"
defaults:
  mode: enforce
  decision: deny
limits:
  exposure:
    max_position_pct: 0.10
    max_gross_exposure_x: 2.0
  loss:
    daily_loss_limit_pct: 0.05
    max_drawdown_pct: 0.05
  execution:
    max_orders_per_minute_global: 20
    max_orders_per_minute_by_strategy: 10
  kill_switch:
    trip_on_rules: ["LOSS-002"]
    trip_after_n_violations: 5
    violation_window_seconds: 3600
"#;

fn intent(qty: f64) -> OrderIntent {
    OrderIntent::new(
        "intent-1",
        Utc::now(),
        "strat-a",
        "acct-1",
        Instrument {
            symbol: "AAPL".to_string(),
            asset_class: AssetClass::Equity,
        },
        Side::Buy,
        OrderType::Market,
        qty,
        None,
    )
    .unwrap()
}

fn market(price: f64) -> MarketSnapshot {
    let mut prices = BTreeMap::new();
    prices.insert("AAPL".to_string(), price);
    MarketSnapshot::new(Utc::now(), prices)
}

fn portfolio(equity: f64, sod: f64, peak: f64) -> PortfolioState {
    PortfolioState::new(equity, sod, peak, BTreeMap::new()).unwrap()
}

#[test]
fn replay_reproduces_allow_decision() {
    let engine = PolicyEngine::from_str(POLICY).unwrap();
    let i = intent(10.0);
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let m = market(200.0);
    let exec = ExecutionState::new();

    let result = engine.evaluate(&i, &pf, &m, &exec);
    let event = AuditEvent::new("0.1.0", engine.policy_hash(), None, i, pf, m, exec, result.decision);

    let outcome = pg_replay::replay_event(&event, &engine).unwrap();
    assert!(outcome.matches());
    assert_eq!(outcome.replayed_decision.decision, DecisionKind::Allow);
}

#[test]
fn replay_reproduces_modify_decision() {
    let engine = PolicyEngine::from_str(POLICY).unwrap();
    let i = intent(100.0);
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let m = market(200.0);
    let exec = ExecutionState::new();

    let result = engine.evaluate(&i, &pf, &m, &exec);
    let event = AuditEvent::new("0.1.0", engine.policy_hash(), None, i, pf, m, exec, result.decision);

    let outcome = pg_replay::replay_event(&event, &engine).unwrap();
    assert!(outcome.matches());
    assert_eq!(outcome.replayed_decision.decision, DecisionKind::Modify);
    assert_eq!(outcome.replayed_decision.modified_intent.unwrap().qty, 50.0);
}

#[test]
fn replay_detects_policy_hash_mismatch() {
    let engine = PolicyEngine::from_str(POLICY).unwrap();
    let i = intent(10.0);
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let m = market(200.0);
    let exec = ExecutionState::new();

    let result = engine.evaluate(&i, &pf, &m, &exec);
    let event = AuditEvent::new("0.1.0", "deadbeef", None, i, pf, m, exec, result.decision);

    let outcome = pg_replay::replay_event(&event, &engine).unwrap();
    assert!(!outcome.policy_hash_matches);
    // Policy content is unchanged, so the decision still matches even
    // though the recorded policy_hash does not — that divergence is what
    // flags policy drift for a human to investigate.
    assert!(outcome.matches());
}

#[test]
fn decisions_match_is_order_sensitive_on_violations() {
    let engine = PolicyEngine::from_str(POLICY).unwrap();
    // Both LOSS-001 and LOSS-002 fire here; order must be preserved.
    let pf = portfolio(94_000.0, 99_000.0, 100_000.0);
    let i = intent(10.0);
    let m = market(200.0);
    let exec = ExecutionState::new();

    let a = engine.evaluate(&i, &pf, &m, &exec).decision;
    let b = engine.evaluate(&i, &pf, &m, &exec).decision;
    assert!(pg_replay::decisions_match(&a, &b));

    let mut reordered = b.clone();
    reordered.violations.reverse();
    assert!(!pg_replay::decisions_match(&a, &reordered));
}

#[test]
fn determinism_many_replays_agree() {
    let engine = PolicyEngine::from_str(POLICY).unwrap();
    let i = intent(10.0);
    let pf = portfolio(94_000.0, 100_000.0, 100_000.0);
    let m = market(200.0);
    let exec = ExecutionState::new();

    let result = engine.evaluate(&i, &pf, &m, &exec);
    let event = AuditEvent::new("0.1.0", engine.policy_hash(), None, i, pf, m, exec, result.decision);

    for _ in 0..10 {
        let outcome = pg_replay::replay_event(&event, &engine).unwrap();
        assert!(outcome.matches());
    }
}
