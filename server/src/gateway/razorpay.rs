use async_trait::async_trait;
use reqwest::Client;

use super::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};
use crate::config::RazorpayConfig;

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

pub struct RazorpayGateway {
    http_client: Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(http_client: Client, config: &RazorpayConfig) -> Self {
        Self {
            http_client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http_client
            .post(ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Razorpay order creation failed");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        tracing::info!(order_id = %order.id, amount = order.amount, "Razorpay order created");
        Ok(order)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}
