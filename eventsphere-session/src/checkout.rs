use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use eventsphere_core::Result;

use crate::collections::OrderSummary;

/// Outcome of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub confirmation: Uuid,
    pub total: f64,
    pub item_count: u32,
    pub completed_at: DateTime<Utc>,
}

/// Seam for order processing. Today the only implementation is simulated;
/// a real payment backend slots in behind this trait.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn process(&self, order: &OrderSummary) -> Result<CheckoutReceipt>;
}

/// Stand-in gateway: waits a fixed delay, then succeeds. No partial failure,
/// no retries. Cancellation is dropping the returned future.
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedGateway {
    async fn process(&self, order: &OrderSummary) -> Result<CheckoutReceipt> {
        info!(
            total = order.total,
            items = order.item_count,
            "processing simulated checkout"
        );
        sleep(self.delay).await;
        Ok(CheckoutReceipt {
            confirmation: Uuid::new_v4(),
            total: order.total,
            item_count: order.item_count,
            completed_at: Utc::now(),
        })
    }
}
