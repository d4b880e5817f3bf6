use std::sync::Arc;

use crate::auth_admin::AuthAdmin;
use crate::config::Config;
use crate::email::templates::Templates;
use crate::email::EmailSender;
use crate::gateway::PaymentGateway;
use crate::store::Store;

/// Shared by every handler. Each external system sits behind a trait object
/// so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub auth: Arc<dyn AuthAdmin>,
    pub mailer: Arc<dyn EmailSender>,
    pub templates: Templates,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        gateway: Arc<dyn PaymentGateway>,
        auth: Arc<dyn AuthAdmin>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        let templates = Templates::from_config(&config);
        Self {
            config: Arc::new(config),
            store,
            gateway,
            auth,
            mailer,
            templates,
        }
    }
}
