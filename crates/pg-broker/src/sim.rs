use std::collections::BTreeMap;

use chrono::Utc;
use pg_model::OrderIntent;
use thiserror::Error;

use crate::broker::{Broker, BrokerResult};
use crate::types::{Fill, OrderState, OrderStatus, SubmitAck};

#[derive(Debug, Error)]
pub enum SimBrokerError {
    #[error("no reference price for symbol {0}; cannot simulate a fill")]
    NoPrice(String),

    #[error("unknown order id {0}")]
    UnknownOrder(String),
}

struct PendingOrder {
    intent: OrderIntent,
    fill_price: f64,
    status: OrderStatus,
}

/// Deterministic, in-memory broker for tests and replay-stable runs. Every
/// submitted order fills immediately and in full at the reference price
/// supplied at construction — there is no partial fill, no latency, and no
/// randomness, so two runs over the same intents and prices produce the
/// same execution events.
pub struct SimBroker {
    prices: BTreeMap<String, f64>,
    orders: BTreeMap<String, PendingOrder>,
}

impl SimBroker {
    pub fn new(prices: BTreeMap<String, f64>) -> Self {
        Self {
            prices,
            orders: BTreeMap::new(),
        }
    }

    pub fn set_price(&mut self, symbol: impl Into<String>, price: f64) {
        self.prices.insert(symbol.into(), price);
    }
}

impl Broker for SimBroker {
    fn submit(&mut self, intent: &OrderIntent) -> BrokerResult<SubmitAck> {
        let order_id = intent.intent_id.clone();

        if let Some(existing) = self.orders.get(&order_id) {
            return Ok(SubmitAck {
                order_id,
                status: existing.status,
            });
        }

        let price = self
            .prices
            .get(&intent.instrument.symbol)
            .copied()
            .ok_or_else(|| Box::new(SimBrokerError::NoPrice(intent.instrument.symbol.clone())) as _)?;

        self.orders.insert(
            order_id.clone(),
            PendingOrder {
                intent: intent.clone(),
                fill_price: price,
                status: OrderStatus::Accepted,
            },
        );

        Ok(SubmitAck {
            order_id,
            status: OrderStatus::Accepted,
        })
    }

    fn cancel(&mut self, order_id: &str) -> BrokerResult<OrderStatus> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| Box::new(SimBrokerError::UnknownOrder(order_id.to_string())) as _)?;
        order.status = OrderStatus::Canceled;
        Ok(order.status)
    }

    fn poll_fills(&mut self, open_order_ids: &[String]) -> BrokerResult<Vec<Fill>> {
        let mut fills = Vec::new();
        for order_id in open_order_ids {
            let Some(order) = self.orders.get_mut(order_id) else {
                continue;
            };
            if order.status != OrderStatus::Accepted {
                continue;
            }
            fills.push(Fill {
                intent_id: order.intent.intent_id.clone(),
                order_id: order_id.clone(),
                symbol: order.intent.instrument.symbol.clone(),
                side: order.intent.side,
                qty: order.intent.qty,
                price: order.fill_price,
                timestamp: Utc::now(),
            });
            order.status = OrderStatus::Filled;
        }
        Ok(fills)
    }

    fn get_order(&self, order_id: &str) -> BrokerResult<OrderState> {
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| Box::new(SimBrokerError::UnknownOrder(order_id.to_string())) as _)?;
        Ok(OrderState {
            order_id: order_id.to_string(),
            status: order.status,
        })
    }
}
