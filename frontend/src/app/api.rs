use anyhow::Result;

use gloo_net::http::Request;
use serde_json::Value;
use shared::{CheckoutCreated, CreateCheckout, PaymentCurrency};

const BACKEND_API_URL: &str = "http://127.0.0.1:14090/api/v1";

pub struct BackendApi {}

impl BackendApi {
    pub async fn create_checkout(
        order_number: String,
        amount: String,
        currency: PaymentCurrency,
    ) -> Result<CheckoutCreated> {
        let params = CreateCheckout {
            amount,
            currency,
            order_number,
        };

        let resp = Request::post(&format!("{BACKEND_API_URL}/checkout/create"))
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&params).unwrap())?
            .send()
            .await?;

        if !resp.ok() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Checkout failed")
                .to_string();

            anyhow::bail!("{message}");
        }

        Ok(resp.json::<CheckoutCreated>().await?)
    }
}
