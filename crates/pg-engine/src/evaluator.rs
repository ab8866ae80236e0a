use pg_model::{Decision, ExecutionState, MarketSnapshot, OrderIntent, PortfolioState};
use pg_policy::{CapitalPolicy, Mode};
use pg_rules::RuleId;

/// Runs the fixed rule pipeline and composes the verdict. Pure: reads its
/// five inputs, mutates none of them, and always returns the same `Decision`
/// for the same inputs.
pub fn evaluate(
    intent: &OrderIntent,
    portfolio: &PortfolioState,
    market: &MarketSnapshot,
    execution: &ExecutionState,
    policy: &CapitalPolicy,
) -> Decision {
    let limits = pg_policy::resolve(policy, &intent.instrument.symbol, &intent.strategy_id);

    let price = match pg_rules::sys_001(intent, market) {
        Ok(price) => price,
        Err(sys_violation) => {
            return Decision::deny(intent.intent_id.clone(), vec![sys_violation], Vec::new(), false);
        }
    };

    let mut violations = Vec::new();
    let mut evidence = Vec::new();

    if let Some(v) = pg_rules::kill_001(execution) {
        violations.push(v);
    }

    let (v, e) = pg_rules::loss_001(portfolio, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    evidence.push(e);

    let (v, e) = pg_rules::loss_002(portfolio, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    evidence.push(e);

    let (v, e) = pg_rules::exec_001(execution, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    evidence.push(e);

    let (v, e) = pg_rules::exec_002(intent, execution, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    evidence.push(e);

    let exp1 = pg_rules::exp_001(intent, portfolio, price, &limits);
    let allowed_qty = exp1.allowed_qty;
    if let Some(v) = exp1.violation {
        violations.push(v);
    }
    evidence.push(exp1.evidence);

    let (v, e) = pg_rules::exp_002(intent, portfolio, market, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    evidence.push(e);

    let (v, e) = pg_rules::exp_003(intent, portfolio, market, &limits);
    if let Some(v) = v {
        violations.push(v);
    }
    if let Some(e) = e {
        evidence.push(e);
    }

    let kill_switch_triggered = violations
        .iter()
        .any(|v| policy.limits.kill_switch.trip_on_rules.iter().any(|r| r == &v.rule_id));

    let mut decision = if violations.is_empty() {
        Decision::allow(intent.intent_id.clone(), violations, evidence, kill_switch_triggered)
    } else if violations.len() == 1 && violations[0].rule_id == RuleId::Exp001.as_str() && allowed_qty > 0.0 {
        let modified_intent = intent.with_qty(allowed_qty);
        Decision::modify(intent.intent_id.clone(), modified_intent, violations, evidence, kill_switch_triggered)
    } else {
        Decision::deny(intent.intent_id.clone(), violations, evidence, kill_switch_triggered)
    };

    if policy.defaults.mode == Mode::Monitor {
        decision = Decision::allow(
            decision.intent_id,
            decision.violations,
            decision.evidence,
            decision.kill_switch_triggered,
        );
    }

    decision
}
