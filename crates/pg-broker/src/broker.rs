use pg_model::OrderIntent;

use crate::types::{Fill, OrderState, OrderStatus, SubmitAck};

/// All broker errors cross this boundary boxed — the runner doesn't care
/// whether the underlying failure was an HTTP error, a timeout, or a
/// protocol violation, only that the submission did not succeed.
pub type BrokerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Abstract execution venue consumed by the stream runner. Implementations
/// (a real Alpaca/Tradier adapter, or a deterministic simulator for tests)
/// are injected behind this trait; the runner never talks to a venue
/// directly.
pub trait Broker {
    /// Submit a new order. May fail; on failure the runner emits
    /// `ORDER_REJECTED` and re-raises (fail-loud, no retry).
    fn submit(&mut self, intent: &OrderIntent) -> BrokerResult<SubmitAck>;

    /// Cancel a previously submitted order.
    fn cancel(&mut self, order_id: &str) -> BrokerResult<OrderStatus>;

    /// Poll for fills against a set of still-open orders. May return an
    /// empty list; implementations may use an account-wide call or fall
    /// back to per-order polling.
    fn poll_fills(&mut self, open_order_ids: &[String]) -> BrokerResult<Vec<Fill>>;

    /// Fetch an order's current state, used when polling shows no fill.
    /// A terminal `Rejected` status produces an `ORDER_REJECTED` event.
    fn get_order(&self, order_id: &str) -> BrokerResult<OrderState>;
}
