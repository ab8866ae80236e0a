use std::collections::BTreeMap;

use chrono::Utc;
use pg_model::{AssetClass, ExecutionState, Instrument, MarketSnapshot, OrderIntent, OrderType, PortfolioState, Side};
use pg_policy::{EffectiveLimits, ExecutionLimits, ExposureLimits, LossLimits};

fn limits(max_position_pct: f64, max_gross: f64, daily_loss: f64, drawdown: f64) -> EffectiveLimits {
    EffectiveLimits {
        exposure: ExposureLimits {
            max_position_pct,
            max_gross_exposure_x: max_gross,
            max_net_exposure_x: None,
        },
        loss: LossLimits {
            daily_loss_limit_pct: daily_loss,
            max_drawdown_pct: drawdown,
        },
        execution: ExecutionLimits {
            max_orders_per_minute_global: 20,
            max_orders_per_minute_by_strategy: 10,
        },
    }
}

fn portfolio(equity: f64, sod: f64, peak: f64) -> PortfolioState {
    PortfolioState::new(equity, sod, peak, BTreeMap::new()).unwrap()
}

fn intent(symbol: &str, side: Side, qty: f64) -> OrderIntent {
    OrderIntent::new(
        "i1",
        Utc::now(),
        "strat",
        "acct",
        Instrument {
            symbol: symbol.to_string(),
            asset_class: AssetClass::Equity,
        },
        side,
        OrderType::Market,
        qty,
        None,
    )
    .unwrap()
}

fn market(symbol: &str, price: f64) -> MarketSnapshot {
    let mut prices = BTreeMap::new();
    prices.insert(symbol.to_string(), price);
    MarketSnapshot::new(Utc::now(), prices)
}

#[test]
fn sys_001_fires_on_missing_symbol() {
    let i = intent("AAPL", Side::Buy, 10.0);
    let m = market("MSFT", 100.0);
    assert!(pg_rules::sys_001(&i, &m).is_err());
}

#[test]
fn sys_001_fires_on_zero_or_negative_price() {
    let i = intent("AAPL", Side::Buy, 10.0);
    let m = market("AAPL", 0.0);
    assert!(pg_rules::sys_001(&i, &m).is_err());

    let m_neg = market("AAPL", -5.0);
    assert!(pg_rules::sys_001(&i, &m_neg).is_err());
}

#[test]
fn sys_001_passes_on_valid_price() {
    let i = intent("AAPL", Side::Buy, 10.0);
    let m = market("AAPL", 200.0);
    assert_eq!(pg_rules::sys_001(&i, &m), Ok(200.0));
}

#[test]
fn kill_001_fires_iff_active() {
    let mut exec = ExecutionState::new();
    assert!(pg_rules::kill_001(&exec).is_none());
    exec.kill_switch_active = true;
    assert!(pg_rules::kill_001(&exec).is_some());
}

#[test]
fn loss_001_fires_at_exact_boundary() {
    // daily_return == -limit must fire (direct comparison, no epsilon).
    let pf = portfolio(95_000.0, 100_000.0, 100_000.0);
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, evidence) = pg_rules::loss_001(&pf, &lim);
    assert!(violation.is_some());
    assert_eq!(evidence.value, -0.05);
}

#[test]
fn loss_001_does_not_fire_just_inside_boundary() {
    let pf = portfolio(95_001.0, 100_000.0, 100_000.0);
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, _) = pg_rules::loss_001(&pf, &lim);
    assert!(violation.is_none());
}

#[test]
fn loss_002_fires_at_exact_boundary() {
    // drawdown == limit must fire.
    let pf = portfolio(90_000.0, 100_000.0, 100_000.0);
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, evidence) = pg_rules::loss_002(&pf, &lim);
    assert!(violation.is_some());
    assert_eq!(evidence.value, 0.1);
}

#[test]
fn loss_002_does_not_fire_just_inside_boundary() {
    let pf = portfolio(90_001.0, 100_000.0, 100_000.0);
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, _) = pg_rules::loss_002(&pf, &lim);
    assert!(violation.is_none());
}

#[test]
fn exec_001_fires_at_exact_throttle_boundary() {
    let mut exec = ExecutionState::new();
    exec.orders_last_minute_global = 20;
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, _) = pg_rules::exec_001(&exec, &lim);
    assert!(violation.is_some());
}

#[test]
fn exec_002_uses_per_strategy_counter() {
    let mut exec = ExecutionState::new();
    exec.orders_last_minute_by_strategy.insert("strat".to_string(), 10);
    let i = intent("AAPL", Side::Buy, 1.0);
    let lim = limits(0.1, 2.0, 0.05, 0.1);
    let (violation, _) = pg_rules::exec_002(&i, &exec, &lim);
    assert!(violation.is_some());
}

#[test]
fn exp_001_modify_hint_computes_allowed_qty() {
    // equity=100,000 max_position_pct=0.10, AAPL=200.0, buy 100 => MODIFY qty=50.
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let i = intent("AAPL", Side::Buy, 100.0);
    let lim = limits(0.10, 2.0, 0.05, 0.1);
    let outcome = pg_rules::exp_001(&i, &pf, 200.0, &lim);
    assert!(outcome.violation.is_some());
    assert_eq!(outcome.allowed_qty, 50.0);
}

#[test]
fn exp_001_allows_small_trade() {
    // equity=100,000, AAPL=200.0, no positions, buy 10 -> no violation.
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let i = intent("AAPL", Side::Buy, 10.0);
    let lim = limits(0.25, 2.0, 0.05, 0.1);
    let outcome = pg_rules::exp_001(&i, &pf, 200.0, &lim);
    assert!(outcome.violation.is_none());
}

#[test]
fn exp_003_skipped_when_no_net_limit_configured() {
    let pf = portfolio(100_000.0, 100_000.0, 100_000.0);
    let i = intent("AAPL", Side::Buy, 10.0);
    let m = market("AAPL", 200.0);
    let lim = limits(0.25, 2.0, 0.05, 0.1); // max_net_exposure_x is None
    let (violation, evidence) = pg_rules::exp_003(&i, &pf, &m, &lim);
    assert!(violation.is_none());
    assert!(evidence.is_none());
}
