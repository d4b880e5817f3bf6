//! Shapes of the gateway's webhook envelope. Only the fields acted upon are
//! modelled; everything else in the payload is ignored.

use serde::Deserialize;

pub const ORDER_PAID: &str = "order.paid";

#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<EntityWrapper<PaymentEntity>>,
}

#[derive(Debug, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub order_id: Option<String>,
    pub email: Option<String>,
}

impl WebhookEnvelope {
    /// The payment entity carried by an `order.paid` event, if complete.
    pub fn paid_payment(&self) -> Option<&PaymentEntity> {
        if self.event != ORDER_PAID {
            return None;
        }
        self.payload
            .as_ref()?
            .payment
            .as_ref()
            .map(|wrapper| &wrapper.entity)
            .filter(|payment| payment.order_id.is_some())
    }
}
