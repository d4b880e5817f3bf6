//! Payment gateway seam.

mod razorpay;
pub mod webhook;

pub use razorpay::RazorpayGateway;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError>;

    /// Public key id handed to the browser checkout widget.
    fn key_id(&self) -> &str;
}
