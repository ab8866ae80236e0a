use assert_cmd::Command;
use predicates::prelude::*;

fn policy_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/policy.yaml").to_string()
}

const PORTFOLIO: &str = r#"{"equity":100000.0,"start_of_day_equity":100000.0,"peak_equity":100000.0,"positions":{}}"#;
const MARKET: &str = r#"{"timestamp":"2026-01-01T00:00:00Z","prices":{"AAPL":200.0}}"#;
const EXECUTION: &str = r#"{"orders_last_minute_global":0,"orders_last_minute_by_strategy":{},"violations_in_window":[],"kill_switch_active":false}"#;

fn intent_json(qty: f64) -> String {
    format!(
        r#"{{"intent_id":"i1","timestamp":"2026-01-01T00:00:00Z","strategy_id":"strat-a","account_id":"acct-1","instrument":{{"symbol":"AAPL","asset_class":"equity"}},"side":"buy","order_type":"market","qty":{qty},"limit_price":null}}"#
    )
}

#[test]
fn small_trade_allows_exit_code_zero() {
    Command::cargo_bin("policygate-eval")
        .unwrap()
        .args([
            "--policy", &policy_path(),
            "--intent", &intent_json(10.0),
            "--portfolio", PORTFOLIO,
            "--market", MARKET,
            "--execution", EXECUTION,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ALLOW\""));
}

#[test]
fn oversized_trade_denies_exit_code_one() {
    // No positions, equity=100k, max_position_pct=0.10 -> any single-symbol
    // buy above 50 shares at $200 breaches 0.10 and MODIFYs down to 50, so
    // use a sell with no position to force an outright DENY via EXP-001's
    // MODIFY-incompatible case is not reachable here; instead force a
    // missing-price DENY which is always deterministic.
    Command::cargo_bin("policygate-eval")
        .unwrap()
        .args([
            "--policy", &policy_path(),
            "--intent", &intent_json(10.0),
            "--portfolio", PORTFOLIO,
            "--market", r#"{"timestamp":"2026-01-01T00:00:00Z","prices":{}}"#,
            "--execution", EXECUTION,
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("SYS-001"));
}

#[test]
fn position_modify_exit_code_zero() {
    Command::cargo_bin("policygate-eval")
        .unwrap()
        .args([
            "--policy", &policy_path(),
            "--intent", &intent_json(100.0),
            "--portfolio", PORTFOLIO,
            "--market", MARKET,
            "--execution", EXECUTION,
            "--pretty",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MODIFY\""))
        .stdout(predicate::str::contains("50.0"));
}

#[test]
fn malformed_intent_exits_two() {
    Command::cargo_bin("policygate-eval")
        .unwrap()
        .args([
            "--policy", &policy_path(),
            "--intent", "{not json}",
            "--portfolio", PORTFOLIO,
            "--market", MARKET,
            "--execution", EXECUTION,
        ])
        .assert()
        .failure()
        .code(2);
}
