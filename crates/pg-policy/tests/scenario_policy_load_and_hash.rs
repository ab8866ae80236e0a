const BASE_POLICY: &str = r#"
version: "0.1"
timezone: "UTC"
defaults:
  mode: enforce
  decision: allow
limits:
  exposure:
    max_position_pct: 0.2
    max_gross_exposure_x: 2.0
    max_net_exposure_x: null
  loss:
    daily_loss_limit_pct: 0.05
    max_drawdown_pct: 0.1
  execution:
    max_orders_per_minute_global: 60
    max_orders_per_minute_by_strategy: 20
  kill_switch:
    trip_on_rules: ["LOSS-002"]
    trip_after_n_violations: 3
    violation_window_seconds: 300
overrides:
  symbols:
    AAPL:
      exposure:
        max_position_pct: 0.1
        max_gross_exposure_x: 2.0
        max_net_exposure_x: null
  strategies:
    momentum:
      loss:
        daily_loss_limit_pct: 0.02
        max_drawdown_pct: 0.05
"#;

#[test]
fn loads_a_well_formed_policy() {
    let loaded = pg_policy::load_from_str(BASE_POLICY).expect("policy should load");
    assert_eq!(loaded.policy.version, "0.1");
    assert_eq!(loaded.policy.timezone, "UTC");
    assert_eq!(loaded.policy.limits.kill_switch.trip_on_rules, vec!["LOSS-002"]);
}

#[test]
fn hash_is_stable_across_loads_of_identical_bytes() {
    let a = pg_policy::load_from_str(BASE_POLICY).unwrap();
    let b = pg_policy::load_from_str(BASE_POLICY).unwrap();
    assert_eq!(a.policy_hash, b.policy_hash);
}

#[test]
fn hash_differs_for_different_source_bytes() {
    let a = pg_policy::load_from_str(BASE_POLICY).unwrap();
    let mutated = BASE_POLICY.replace("max_position_pct: 0.2", "max_position_pct: 0.25");
    let b = pg_policy::load_from_str(&mutated).unwrap();
    assert_ne!(a.policy_hash, b.policy_hash);
}

#[test]
fn rejects_unknown_top_level_field() {
    let bad = BASE_POLICY.replace("timezone: \"UTC\"", "timezone: \"UTC\"\nunknown_field: 1");
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(err, pg_policy::PolicyError::Yaml(_)));
}

#[test]
fn rejects_unknown_nested_field() {
    let bad = BASE_POLICY.replace(
        "max_position_pct: 0.2",
        "max_position_pct: 0.2\n    bogus: true",
    );
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(err, pg_policy::PolicyError::Yaml(_)));
}

#[test]
fn rejects_wrong_version() {
    let bad = BASE_POLICY.replace("version: \"0.1\"", "version: \"0.2\"");
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(err, pg_policy::PolicyError::BadVersion(v) if v == "0.2"));
}

#[test]
fn rejects_wrong_timezone() {
    let bad = BASE_POLICY.replace("timezone: \"UTC\"", "timezone: \"EST\"");
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(err, pg_policy::PolicyError::BadTimezone(v) if v == "EST"));
}

#[test]
fn rejects_out_of_range_max_position_pct() {
    let bad = BASE_POLICY.replace("max_position_pct: 0.2", "max_position_pct: 1.5");
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(
        err,
        pg_policy::PolicyError::OutOfRange { field, .. } if field == "limits.exposure.max_position_pct"
    ));
}

#[test]
fn rejects_out_of_range_max_orders_per_minute() {
    let bad = BASE_POLICY.replace(
        "max_orders_per_minute_global: 60",
        "max_orders_per_minute_global: 0",
    );
    let err = pg_policy::load_from_str(&bad).unwrap_err();
    assert!(matches!(err, pg_policy::PolicyError::OutOfRange { .. }));
}

#[test]
fn override_precedence_symbol_wins_over_strategy_wins_over_defaults() {
    let loaded = pg_policy::load_from_str(BASE_POLICY).unwrap();

    // AAPL has a symbol-level exposure override -> symbol wins.
    let eff = pg_policy::resolve(&loaded.policy, "AAPL", "momentum");
    assert_eq!(eff.exposure.max_position_pct, 0.1);
    // AAPL has no loss override, but momentum strategy does -> strategy wins.
    assert_eq!(eff.loss.daily_loss_limit_pct, 0.02);
    // Neither has an execution override -> defaults.
    assert_eq!(eff.execution.max_orders_per_minute_global, 60);
}

#[test]
fn override_falls_back_to_defaults_when_no_override_present() {
    let loaded = pg_policy::load_from_str(BASE_POLICY).unwrap();
    let eff = pg_policy::resolve(&loaded.policy, "MSFT", "mean_reversion");
    assert_eq!(eff.exposure.max_position_pct, 0.2);
    assert_eq!(eff.loss.daily_loss_limit_pct, 0.05);
    assert_eq!(eff.execution.max_orders_per_minute_by_strategy, 20);
}
