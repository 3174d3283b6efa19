#![allow(dead_code)]

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use shared::{string_or_number, CheckoutCreated, CheckoutForm};

use crate::pay_services::{chained_sha256, SignatureError};

/**
https://viabill.stoplight.io/docs/merchant-api
 */
pub(crate) static TEST_BASE_URL: &str = "https://secure-test.viabill.com";
pub(crate) static PROD_BASE_URL: &str = "https://secure.viabill.com";

/**
Protocol version expected by the hosted-checkout form.
 */
static CHECKOUT_PROTOCOL: &str = "3.1";

/**
Everything the gateway integration needs, loaded once at startup and
injected into the constructors. The secret key never leaves this struct.
 */
#[derive(Debug, Clone)]
pub struct ViabillConfig {
    pub secret_key: String,
    pub api_key: String,
    pub app_url: String,
    pub addon_name: String,
    pub test_mode: bool,
}

impl ViabillConfig {
    pub fn base_url(&self) -> &'static str {
        if self.test_mode {
            TEST_BASE_URL
        } else {
            PROD_BASE_URL
        }
    }

    pub fn checkout_url(&self) -> String {
        format!(
            "{}/api/checkout-authorize/addon/{}",
            self.base_url(),
            self.addon_name
        )
    }

    fn success_url(&self, order_number: &str) -> String {
        format!("{}/checkout/success?orderId={order_number}", self.app_url)
    }

    fn cancel_url(&self, order_number: &str) -> String {
        format!("{}/checkout/cancel?orderId={order_number}", self.app_url)
    }

    fn callback_url(&self) -> String {
        format!("{}/webhook/viabill/status", self.app_url)
    }
}

/**
Raw status notification as posted by the gateway. All values are kept as
the raw strings received; the signature is computed over them verbatim, so
no case, whitespace or numeric normalization may be applied.
 */
#[derive(Deserialize, Debug)]
pub struct RawStatusCallback {
    /**
    Transaction id issued by us when the checkout was signed
     */
    pub transaction: String,

    /**
    Order number the customer checked out with
     */
    #[serde(rename = "orderNumber")]
    pub order_number: String,

    /**
    Amount exactly as the gateway formatted it
     */
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,

    /**
    Currency code of the amount
     */
    pub currency: String,

    /**
    APPROVED / REJECTED / CANCELLED, or anything newer the gateway may add
     */
    pub status: String,

    /**
    Unix timestamp of the status change
     */
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,

    /**
    sha256(transaction # orderNumber # amount # currency # status # time # secret)
     */
    pub signature: String,
}

impl RawStatusCallback {
    pub fn from_data(body: Value) -> Result<Self> {
        Ok(serde_json::from_value(body)?)
    }

    fn require_fields(&self) -> Result<(), SignatureError> {
        let fields = [
            ("transaction", &self.transaction),
            ("orderNumber", &self.order_number),
            ("amount", &self.amount),
            ("currency", &self.currency),
            ("status", &self.status),
            ("time", &self.time),
            ("signature", &self.signature),
        ];

        for (field, value) in fields {
            if value.is_empty() {
                return Err(SignatureError::FieldMissing {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn into_status_update(self) -> StatusUpdate {
        StatusUpdate {
            status: CallbackStatus::from(self.status.as_str()),
            transaction: self.transaction,
            order_number: self.order_number,
            amount: self.amount,
            currency: self.currency,
            time: self.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackStatus {
    Approved,
    Rejected,
    Cancelled,
    Unknown(String),
}

impl From<&str> for CallbackStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "APPROVED" => CallbackStatus::Approved,
            "REJECTED" => CallbackStatus::Rejected,
            "CANCELLED" => CallbackStatus::Cancelled,
            v => CallbackStatus::Unknown(v.to_string()),
        }
    }
}

/**
An authenticated status notification, ready for dispatch.
 */
#[derive(Debug)]
pub struct StatusUpdate {
    pub transaction: String,
    pub order_number: String,
    pub amount: String,
    pub currency: String,
    pub status: CallbackStatus,
    pub time: String,
}

pub struct ViabillGateway {
    config: ViabillConfig,
}

impl ViabillGateway {
    pub fn new(config: ViabillConfig) -> Self {
        Self { config }
    }

    /// Signs a full hosted-checkout field set for one checkout attempt.
    /// Refuses to produce anything when the secret or API key is not
    /// configured; an unsigned request must never reach the gateway.
    pub fn build_checkout(
        &self,
        amount: &str,
        currency: &str,
        order_number: &str,
    ) -> Result<CheckoutCreated, SignatureError> {
        if self.config.secret_key.is_empty() {
            return Err(SignatureError::MissingConfig("secret_key"));
        }
        if self.config.api_key.is_empty() {
            return Err(SignatureError::MissingConfig("api_key"));
        }

        let transaction = generate_transaction_id();
        let success_url = self.config.success_url(order_number);
        let cancel_url = self.config.cancel_url(order_number);

        let sha256check = self.sign_checkout(
            amount,
            currency,
            &transaction,
            order_number,
            &success_url,
            &cancel_url,
        );

        Ok(CheckoutCreated {
            checkout_url: self.config.checkout_url(),
            form_data: CheckoutForm {
                protocol: CHECKOUT_PROTOCOL.to_string(),
                apikey: self.config.api_key.clone(),
                transaction,
                order_number: order_number.to_string(),
                amount: amount.to_string(),
                currency: currency.to_string(),
                sha256check,
                success_url,
                cancel_url,
                callback_url: self.config.callback_url(),
                test: self.config.test_mode,
                custom_params: None,
            },
        })
    }

    /// Checkout signature:
    /// sha256(apikey # amount # currency # transaction # order_number # success_url # cancel_url # secret),
    /// with "#true" appended in test mode and nothing at all otherwise.
    fn sign_checkout(
        &self,
        amount: &str,
        currency: &str,
        transaction: &str,
        order_number: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> String {
        let mut fields = vec![
            self.config.api_key.as_str(),
            amount,
            currency,
            transaction,
            order_number,
            success_url,
            cancel_url,
            self.config.secret_key.as_str(),
        ];

        if self.config.test_mode {
            fields.push("true");
        }

        chained_sha256(&fields)
    }

    /// Callback signature:
    /// sha256(transaction # orderNumber # amount # currency # status # time # secret).
    /// The field order differs from the checkout signature; that asymmetry is
    /// part of the gateway protocol.
    pub fn verify_callback(&self, raw: &RawStatusCallback) -> Result<(), SignatureError> {
        if self.config.secret_key.is_empty() {
            return Err(SignatureError::MissingConfig("secret_key"));
        }

        raw.require_fields()?;

        let expected = chained_sha256(&[
            &raw.transaction,
            &raw.order_number,
            &raw.amount,
            &raw.currency,
            &raw.status,
            &raw.time,
            &self.config.secret_key,
        ]);

        if expected != raw.signature {
            return Err(SignatureError::InvalidSignature {
                expected,
                received: raw.signature.clone(),
            });
        }

        Ok(())
    }
}

pub(crate) fn generate_transaction_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();

    format!(
        "TXN-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        &suffix[..9]
    )
}

pub(crate) mod handler {
    use reqwest::header::HeaderMap;
    use reqwest::{Method, RequestBuilder};
    use serde_json::Value;
    use std::time::Duration;

    use crate::pay_services::viabill::ViabillConfig;
    use crate::pay_services::{sign_body_256, SignatureError};

    /**
    Gateway response timeout. No automatic retry; callers bring their own
    retry policy.
     */
    static REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /**
    Uniform result of a gateway API call. Transport failures and non-2xx
    responses both land in `error`, with the best status code available
    (500 when no response was received), so callers never need to branch
    on an exception type.
     */
    #[derive(Debug)]
    pub struct RequestOutcome {
        pub status: u16,
        pub data: Option<Value>,
        pub error: Option<String>,
    }

    pub struct ViabillApiHandler {
        config: ViabillConfig,
    }

    impl ViabillApiHandler {
        pub fn new(config: ViabillConfig) -> Self {
            Self { config }
        }

        /// Signs `data` with HMAC-SHA256 over its JSON serialization and
        /// attaches the digest as the `X-ViaBill-Signature` header. GET
        /// sends the fields as query parameters, everything else as the
        /// JSON body; the signature covers the JSON form in both cases.
        pub fn build_request(
            &self,
            endpoint: &str,
            method: Method,
            data: &Value,
        ) -> Result<RequestBuilder, SignatureError> {
            if self.config.secret_key.is_empty() {
                return Err(SignatureError::MissingConfig("secret_key"));
            }
            if self.config.api_key.is_empty() {
                return Err(SignatureError::MissingConfig("api_key"));
            }

            let request_url = format!("{}{}", self.config.base_url(), endpoint);

            let body = data.to_string();
            let signature = sign_body_256(&self.config.secret_key, &body);

            println!(
                "Signing {method} request to {request_url} (signature {}...)",
                &signature[..20]
            );

            let client = reqwest::Client::new();

            let mut headers = HeaderMap::new();
            headers.insert("Accept", "*/*".parse().unwrap());
            headers.insert("Content-Type", "application/json".parse().unwrap());
            headers.insert("X-ViaBill-Signature", signature.parse().unwrap());

            let builder = if method == Method::GET {
                client.get(&request_url).query(data)
            } else {
                client.post(&request_url).body(body)
            };

            Ok(builder.headers(headers).timeout(REQUEST_TIMEOUT))
        }

        pub async fn request(&self, endpoint: &str, method: Method, data: &Value) -> RequestOutcome {
            let builder = match self.build_request(endpoint, method, data) {
                Ok(builder) => builder,

                Err(err) => {
                    return RequestOutcome {
                        status: 500,
                        data: None,
                        error: Some(err.to_string()),
                    }
                }
            };

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    let data = response.json::<Value>().await.ok();

                    if status.is_success() {
                        RequestOutcome {
                            status: status.as_u16(),
                            data,
                            error: None,
                        }
                    } else {
                        RequestOutcome {
                            status: status.as_u16(),
                            data,
                            error: Some(format!("Gateway responded with status {status}")),
                        }
                    }
                }

                Err(err) => RequestOutcome {
                    status: err.status().map(|s| s.as_u16()).unwrap_or(500),
                    data: None,
                    error: Some(err.to_string()),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::pay_services::viabill::handler::ViabillApiHandler;
    use crate::pay_services::viabill::{
        CallbackStatus, RawStatusCallback, ViabillConfig, ViabillGateway, PROD_BASE_URL,
        TEST_BASE_URL,
    };
    use crate::pay_services::SignatureError;

    fn test_config() -> ViabillConfig {
        ViabillConfig {
            secret_key: "s3cr3t".to_string(),
            api_key: "AK1".to_string(),
            app_url: "https://a".to_string(),
            addon_name: "CUSTOM".to_string(),
            test_mode: true,
        }
    }

    fn approved_callback() -> RawStatusCallback {
        RawStatusCallback {
            transaction: "TXN-1".to_string(),
            order_number: "ORD-1".to_string(),
            amount: "100.00".to_string(),
            currency: "DKK".to_string(),
            status: "APPROVED".to_string(),
            time: "1700000000".to_string(),
            signature: "61dc8fa64529bb1943fd58171f36176314be3c216ab967a6242d9a7721daaea2"
                .to_string(),
        }
    }

    #[test]
    fn test_callback_sign_validation() {
        let gateway = ViabillGateway::new(test_config());

        assert!(gateway.verify_callback(&approved_callback()).is_ok());
    }

    #[test]
    fn test_callback_sign_rejects_changed_field() {
        let gateway = ViabillGateway::new(test_config());

        let mut callback = approved_callback();
        callback.amount = "100.01".to_string();

        assert!(matches!(
            gateway.verify_callback(&callback),
            Err(SignatureError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_callback_missing_field_is_rejected_before_signature_check() {
        let gateway = ViabillGateway::new(test_config());

        let mut callback = approved_callback();
        callback.status = "".to_string();

        assert!(matches!(
            gateway.verify_callback(&callback),
            Err(SignatureError::FieldMissing { field }) if field == "status"
        ));
    }

    #[test]
    fn test_callback_accepts_numeric_wire_fields() {
        let raw: RawStatusCallback = serde_json::from_value(json!({
            "transaction": "TXN-1",
            "orderNumber": "ORD-1",
            "amount": "100.00",
            "currency": "DKK",
            "status": "APPROVED",
            "time": 1700000000i64,
            "signature": "61dc8fa64529bb1943fd58171f36176314be3c216ab967a6242d9a7721daaea2",
        }))
        .unwrap();

        assert_eq!(raw.time, "1700000000");
        assert!(ViabillGateway::new(test_config())
            .verify_callback(&raw)
            .is_ok());
    }

    #[test]
    fn test_callback_round_trip() {
        let gateway = ViabillGateway::new(test_config());

        let mut callback = approved_callback();
        callback.time = "1700000123".to_string();
        callback.signature = crate::pay_services::chained_sha256(&[
            &callback.transaction,
            &callback.order_number,
            &callback.amount,
            &callback.currency,
            &callback.status,
            &callback.time,
            "s3cr3t",
        ]);

        assert!(gateway.verify_callback(&callback).is_ok());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let mut callback = approved_callback();
        callback.status = "ON_HOLD".to_string();

        assert_eq!(
            callback.into_status_update().status,
            CallbackStatus::Unknown("ON_HOLD".to_string())
        );
    }

    #[test]
    fn test_checkout_signature_with_test_mode() {
        let gateway = ViabillGateway::new(test_config());

        let sign = gateway.sign_checkout("50", "DKK", "TX2", "OR2", "https://a/s", "https://a/c");

        assert_eq!(
            sign,
            "c0529a70f428d64921a345e5712c613ea58e8ec7a242e040baf0fcfc6c632602"
        );
    }

    #[test]
    fn test_checkout_signature_without_test_mode() {
        let mut config = test_config();
        config.test_mode = false;
        let gateway = ViabillGateway::new(config);

        let sign = gateway.sign_checkout("50", "DKK", "TX2", "OR2", "https://a/s", "https://a/c");

        assert_eq!(
            sign,
            "88741d8c5614fcc3d711bbff52048f03f41fb213d9157748a9aba90a0a5f68b1"
        );
    }

    #[test]
    fn test_test_mode_switches_checkout_host() {
        let test_checkout = ViabillGateway::new(test_config())
            .build_checkout("100.00", "DKK", "ORD-1")
            .unwrap();
        assert!(test_checkout.checkout_url.starts_with(TEST_BASE_URL));
        assert!(test_checkout.form_data.test);

        let mut config = test_config();
        config.test_mode = false;
        let prod_checkout = ViabillGateway::new(config)
            .build_checkout("100.00", "DKK", "ORD-1")
            .unwrap();
        assert!(prod_checkout.checkout_url.starts_with(PROD_BASE_URL));
        assert!(!prod_checkout.form_data.test);
    }

    #[test]
    fn test_checkout_round_trips_field_values() {
        let checkout = ViabillGateway::new(test_config())
            .build_checkout("100.00", "DKK", "ORD-1")
            .unwrap();
        let form = &checkout.form_data;

        assert_eq!(form.protocol, "3.1");
        assert_eq!(form.amount, "100.00");
        assert_eq!(form.order_number, "ORD-1");
        assert_eq!(form.success_url, "https://a/checkout/success?orderId=ORD-1");
        assert_eq!(form.cancel_url, "https://a/checkout/cancel?orderId=ORD-1");
        assert_eq!(form.callback_url, "https://a/webhook/viabill/status");
        assert!(form.transaction.starts_with("TXN-"));
    }

    #[test]
    fn test_checkout_refused_without_secret() {
        let mut config = test_config();
        config.secret_key = "".to_string();
        let gateway = ViabillGateway::new(config);

        assert!(matches!(
            gateway.build_checkout("100.00", "DKK", "ORD-1"),
            Err(SignatureError::MissingConfig("secret_key"))
        ));
    }

    #[test]
    fn test_api_request_is_signed() {
        let handler = ViabillApiHandler::new(test_config());
        let data = json!({"transaction": "TX2", "amount": "50.00"});

        let request = handler
            .build_request("/api/transaction/capture", Method::POST, &data)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://secure-test.viabill.com/api/transaction/capture"
        );
        assert_eq!(
            request.headers().get("X-ViaBill-Signature").unwrap(),
            "157c243a0aa422e50fab71be8dfd75d0f8198f8979a4d5e9647eef76390e3e65"
        );
        assert_eq!(request.timeout(), Some(&std::time::Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_api_request_short_circuits_without_config() {
        let mut config = test_config();
        config.api_key = "".to_string();
        let handler = ViabillApiHandler::new(config);

        let outcome = handler
            .request("/api/transaction/capture", Method::POST, &json!({}))
            .await;

        assert_eq!(outcome.status, 500);
        assert!(outcome.error.is_some());
        assert!(outcome.data.is_none());
    }
}
