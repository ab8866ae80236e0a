use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Option,
    Future,
    Crypto,
    Forex,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub asset_class: AssetClass,
}

/// A proposed order awaiting governance approval.
///
/// Invariant: `order_type == Limit` implies `limit_price` is `Some`.
/// Enforced in [`OrderIntent::new`] and re-checked in [`OrderIntent::validate`]
/// for values reconstructed from JSON (audit replay, CLI input).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub intent_id: String,
    pub timestamp: DateTime<Utc>,
    pub strategy_id: String,
    pub account_id: String,
    pub instrument: Instrument,
    pub side: Side,
    pub order_type: OrderType,
    pub qty: f64,
    pub limit_price: Option<f64>,
}

impl OrderIntent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        intent_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        strategy_id: impl Into<String>,
        account_id: impl Into<String>,
        instrument: Instrument,
        side: Side,
        order_type: OrderType,
        qty: f64,
        limit_price: Option<f64>,
    ) -> Result<Self, InputError> {
        let intent = Self {
            intent_id: intent_id.into(),
            timestamp,
            strategy_id: strategy_id.into(),
            account_id: account_id.into(),
            instrument,
            side,
            order_type,
            qty,
            limit_price,
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Re-validates an intent reconstructed from an external source
    /// (audit event replay, CLI `--intent` JSON). Rule functions assume
    /// this has already been called.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.qty > 0.0) {
            return Err(InputError::InvalidIntent(format!(
                "qty must be > 0, got {}",
                self.qty
            )));
        }
        if self.order_type == OrderType::Limit && self.limit_price.is_none() {
            return Err(InputError::InvalidIntent(
                "order_type == limit requires limit_price".to_string(),
            ));
        }
        if let Some(lp) = self.limit_price {
            if lp < 0.0 {
                return Err(InputError::InvalidIntent(format!(
                    "limit_price must be >= 0, got {lp}"
                )));
            }
        }
        Ok(())
    }

    /// A copy of this intent with a reduced quantity, as produced by a
    /// MODIFY verdict (EXP-001).
    pub fn with_qty(&self, qty: f64) -> Self {
        Self {
            qty,
            ..self.clone()
        }
    }
}
