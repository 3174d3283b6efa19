use async_trait::async_trait;
use lazy_static::lazy_static;

use shared::CheckoutCreated;

use crate::pay_services::viabill::{
    CallbackStatus, RawStatusCallback, StatusUpdate, ViabillConfig, ViabillGateway,
};
use crate::pay_services::SignatureError;
use crate::CONFIG;

lazy_static! {
    pub static ref PAYMENT_HANDLER: PaymentHandler = PaymentHandler::new(ViabillConfig {
        secret_key: CONFIG.secret_key.clone(),
        api_key: CONFIG.api_key.clone(),
        app_url: CONFIG.app_url.clone(),
        addon_name: CONFIG.addon_name.clone(),
        test_mode: CONFIG.test_mode,
    });
}

/// Downstream actions triggered once a status notification has been
/// authenticated. The integrating system plugs order persistence, customer
/// mail and audit logging in here.
#[async_trait]
pub trait StatusActions {
    async fn payment_approved(&self, update: &StatusUpdate);
    async fn payment_rejected(&self, update: &StatusUpdate);
    async fn payment_cancelled(&self, update: &StatusUpdate);
    async fn unknown_status(&self, update: &StatusUpdate, raw_status: &str);
}

pub struct ConsoleStatusActions {}

#[async_trait]
impl StatusActions for ConsoleStatusActions {
    async fn payment_approved(&self, update: &StatusUpdate) {
        println!("Payment approved for order {}", update.order_number);
        // TODO: store the order status
        // TODO: send the confirmation mail
        // TODO: record the transaction in the audit log
    }

    async fn payment_rejected(&self, update: &StatusUpdate) {
        println!("Payment rejected for order {}", update.order_number);
    }

    async fn payment_cancelled(&self, update: &StatusUpdate) {
        println!("Payment cancelled for order {}", update.order_number);
    }

    async fn unknown_status(&self, update: &StatusUpdate, raw_status: &str) {
        println!(
            "Unknown status {raw_status:?} for order {}",
            update.order_number
        );
    }
}

pub struct PaymentHandler {
    gateway: ViabillGateway,
    actions: ConsoleStatusActions,
}

impl PaymentHandler {
    pub fn new(config: ViabillConfig) -> Self {
        Self {
            gateway: ViabillGateway::new(config),
            actions: ConsoleStatusActions {},
        }
    }

    pub fn create_checkout(
        &self,
        amount: &str,
        currency: &str,
        order_number: &str,
    ) -> Result<CheckoutCreated, SignatureError> {
        let checkout = self.gateway.build_checkout(amount, currency, order_number)?;

        println!(
            "Created checkout {} for order {order_number}",
            checkout.form_data.transaction
        );

        Ok(checkout)
    }

    pub async fn handle_status_update(
        &self,
        raw: RawStatusCallback,
    ) -> Result<(), SignatureError> {
        self.gateway.verify_callback(&raw)?;

        let update = raw.into_status_update();

        match &update.status {
            CallbackStatus::Approved => self.actions.payment_approved(&update).await,
            CallbackStatus::Rejected => self.actions.payment_rejected(&update).await,
            CallbackStatus::Cancelled => self.actions.payment_cancelled(&update).await,
            CallbackStatus::Unknown(raw_status) => {
                self.actions.unknown_status(&update, raw_status).await
            }
        }

        Ok(())
    }
}
