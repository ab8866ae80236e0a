use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::PolicyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Enforce,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultDecision {
    Deny,
    Allow,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub mode: Mode,
    pub decision: DefaultDecision,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExposureLimits {
    pub max_position_pct: f64,
    pub max_gross_exposure_x: f64,
    #[serde(default)]
    pub max_net_exposure_x: Option<f64>,
}

impl ExposureLimits {
    fn validate(&self, field_prefix: &str) -> Result<(), PolicyError> {
        if !(self.max_position_pct > 0.0 && self.max_position_pct <= 1.0) {
            return Err(PolicyError::OutOfRange {
                field: format!("{field_prefix}.max_position_pct"),
                detail: format!("must be in (0,1], got {}", self.max_position_pct),
            });
        }
        if !(self.max_gross_exposure_x > 0.0) {
            return Err(PolicyError::OutOfRange {
                field: format!("{field_prefix}.max_gross_exposure_x"),
                detail: format!("must be > 0, got {}", self.max_gross_exposure_x),
            });
        }
        if let Some(net) = self.max_net_exposure_x {
            if !(net > 0.0) {
                return Err(PolicyError::OutOfRange {
                    field: format!("{field_prefix}.max_net_exposure_x"),
                    detail: format!("must be > 0 or null, got {net}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossLimits {
    pub daily_loss_limit_pct: f64,
    pub max_drawdown_pct: f64,
}

impl LossLimits {
    fn validate(&self, field_prefix: &str) -> Result<(), PolicyError> {
        if !(self.daily_loss_limit_pct > 0.0 && self.daily_loss_limit_pct <= 1.0) {
            return Err(PolicyError::OutOfRange {
                field: format!("{field_prefix}.daily_loss_limit_pct"),
                detail: format!("must be in (0,1], got {}", self.daily_loss_limit_pct),
            });
        }
        if !(self.max_drawdown_pct > 0.0 && self.max_drawdown_pct <= 1.0) {
            return Err(PolicyError::OutOfRange {
                field: format!("{field_prefix}.max_drawdown_pct"),
                detail: format!("must be in (0,1], got {}", self.max_drawdown_pct),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionLimits {
    pub max_orders_per_minute_global: u32,
    pub max_orders_per_minute_by_strategy: u32,
}

impl ExecutionLimits {
    fn validate(&self, field_prefix: &str) -> Result<(), PolicyError> {
        for (name, v) in [
            (
                "max_orders_per_minute_global",
                self.max_orders_per_minute_global,
            ),
            (
                "max_orders_per_minute_by_strategy",
                self.max_orders_per_minute_by_strategy,
            ),
        ] {
            if !(1..=10_000).contains(&v) {
                return Err(PolicyError::OutOfRange {
                    field: format!("{field_prefix}.{name}"),
                    detail: format!("must be in [1,10000], got {v}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KillSwitchLimits {
    pub trip_on_rules: Vec<String>,
    pub trip_after_n_violations: u32,
    pub violation_window_seconds: u32,
}

impl KillSwitchLimits {
    fn validate(&self) -> Result<(), PolicyError> {
        if !(1..=10_000).contains(&self.trip_after_n_violations) {
            return Err(PolicyError::OutOfRange {
                field: "limits.kill_switch.trip_after_n_violations".to_string(),
                detail: format!("must be in [1,10000], got {}", self.trip_after_n_violations),
            });
        }
        if !(1..=31_536_000).contains(&self.violation_window_seconds) {
            return Err(PolicyError::OutOfRange {
                field: "limits.kill_switch.violation_window_seconds".to_string(),
                detail: format!(
                    "must be in [1,31536000], got {}",
                    self.violation_window_seconds
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    pub exposure: ExposureLimits,
    pub loss: LossLimits,
    pub execution: ExecutionLimits,
    pub kill_switch: KillSwitchLimits,
}

impl Limits {
    fn validate(&self) -> Result<(), PolicyError> {
        self.exposure.validate("limits.exposure")?;
        self.loss.validate("limits.loss")?;
        self.execution.validate("limits.execution")?;
        self.kill_switch.validate()?;
        Ok(())
    }
}

/// A sub-block granularity override: a symbol or strategy may redefine
/// any of the three overridable sub-blocks while leaving the rest to
/// fall back to `defaults`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialLimits {
    #[serde(default)]
    pub exposure: Option<ExposureLimits>,
    #[serde(default)]
    pub loss: Option<LossLimits>,
    #[serde(default)]
    pub execution: Option<ExecutionLimits>,
}

impl PartialLimits {
    fn validate(&self, scope: &str) -> Result<(), PolicyError> {
        if let Some(e) = &self.exposure {
            e.validate(&format!("overrides.{scope}.exposure"))?;
        }
        if let Some(l) = &self.loss {
            l.validate(&format!("overrides.{scope}.loss"))?;
        }
        if let Some(x) = &self.execution {
            x.validate(&format!("overrides.{scope}.execution"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    #[serde(default)]
    pub symbols: BTreeMap<String, PartialLimits>,
    #[serde(default)]
    pub strategies: BTreeMap<String, PartialLimits>,
}

impl Overrides {
    fn validate(&self) -> Result<(), PolicyError> {
        for (symbol, p) in &self.symbols {
            p.validate(&format!("symbols.{symbol}"))?;
        }
        for (strategy, p) in &self.strategies {
            p.validate(&format!("strategies.{strategy}"))?;
        }
        Ok(())
    }
}

/// Immutable, validated capital policy. Once loaded, never mutated — the
/// evaluator and the stream runner both take `&CapitalPolicy`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapitalPolicy {
    pub version: String,
    pub timezone: String,
    pub defaults: Defaults,
    pub limits: Limits,
    #[serde(default)]
    pub overrides: Overrides,
}

impl CapitalPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version != "0.1" {
            return Err(PolicyError::BadVersion(self.version.clone()));
        }
        if self.timezone != "UTC" {
            return Err(PolicyError::BadTimezone(self.timezone.clone()));
        }
        self.limits.validate()?;
        self.overrides.validate()?;
        Ok(())
    }
}

/// Resolved, override-applied limits for one `(symbol, strategy_id)` pair.
///
/// Resolution order per sub-block: `overrides.symbols`, then
/// `overrides.strategies`, then `defaults` — picking the first that
/// *defines that sub-block*, independent of the other two sub-blocks.
#[derive(Debug, Clone)]
pub struct EffectiveLimits {
    pub exposure: ExposureLimits,
    pub loss: LossLimits,
    pub execution: ExecutionLimits,
}

pub fn resolve(policy: &CapitalPolicy, symbol: &str, strategy_id: &str) -> EffectiveLimits {
    let symbol_override = policy.overrides.symbols.get(symbol);
    let strategy_override = policy.overrides.strategies.get(strategy_id);

    let exposure = symbol_override
        .and_then(|p| p.exposure.clone())
        .or_else(|| strategy_override.and_then(|p| p.exposure.clone()))
        .unwrap_or_else(|| policy.limits.exposure.clone());

    let loss = symbol_override
        .and_then(|p| p.loss.clone())
        .or_else(|| strategy_override.and_then(|p| p.loss.clone()))
        .unwrap_or_else(|| policy.limits.loss.clone());

    let execution = symbol_override
        .and_then(|p| p.execution.clone())
        .or_else(|| strategy_override.and_then(|p| p.execution.clone()))
        .unwrap_or_else(|| policy.limits.execution.clone());

    EffectiveLimits {
        exposure,
        loss,
        execution,
    }
}
