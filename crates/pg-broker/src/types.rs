use chrono::{DateTime, Utc};
use pg_model::Side;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Accepted,
    Filled,
    PartiallyFilled,
    Rejected,
    Canceled,
}

/// Broker acknowledgment of a submitted order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub order_id: String,
    pub status: OrderStatus,
}

/// A single fill against a previously submitted order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub intent_id: String,
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub qty: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Current state of a previously submitted order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
    pub order_id: String,
    pub status: OrderStatus,
}
