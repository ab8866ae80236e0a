use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Live portfolio snapshot the evaluator reads and the stream runner mutates.
///
/// `positions` uses a `BTreeMap` (not `HashMap`) so iteration order — and
/// therefore the order terms are summed in gross/net exposure rules — is
/// deterministic across runs and platforms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub equity: f64,
    pub start_of_day_equity: f64,
    pub peak_equity: f64,
    pub positions: BTreeMap<String, f64>,
}

impl PortfolioState {
    pub fn new(
        equity: f64,
        start_of_day_equity: f64,
        peak_equity: f64,
        positions: BTreeMap<String, f64>,
    ) -> Result<Self, InputError> {
        let st = Self {
            equity,
            start_of_day_equity,
            peak_equity,
            positions,
        };
        st.validate()?;
        Ok(st)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.start_of_day_equity > 0.0) {
            return Err(InputError::InvalidPortfolio(format!(
                "start_of_day_equity must be > 0, got {}",
                self.start_of_day_equity
            )));
        }
        if !(self.peak_equity > 0.0) {
            return Err(InputError::InvalidPortfolio(format!(
                "peak_equity must be > 0, got {}",
                self.peak_equity
            )));
        }
        Ok(())
    }

    pub fn position_qty(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Apply a signed quantity change to a position, dropping the entry
    /// if it nets to exactly flat (keeps the map minimal/deterministic).
    pub fn adjust_position(&mut self, symbol: &str, signed_qty_delta: f64) {
        let entry = self.positions.entry(symbol.to_string()).or_insert(0.0);
        *entry += signed_qty_delta;
        if *entry == 0.0 {
            self.positions.remove(symbol);
        }
    }

    /// Runner contract: peak is monotonic upward.
    pub fn update_peak(&mut self) {
        if self.equity > self.peak_equity {
            self.peak_equity = self.equity;
        }
    }
}
