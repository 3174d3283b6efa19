#![allow(clippy::upper_case_acronyms)]

use std::fmt::{Display, Formatter};

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Default)]
#[allow(non_camel_case_types)]
pub enum PaymentCurrency {
    #[default]
    DKK,
    EUR,
    USD,
}

impl Display for PaymentCurrency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PaymentCurrency::DKK => "DKK",
            PaymentCurrency::EUR => "EUR",
            PaymentCurrency::USD => "USD",
        })
    }
}

/// Accepts a JSON string or number and keeps its textual form as-is.
/// Gateway signatures are computed over the raw text, so no numeric
/// parsing or rounding is allowed to happen on the way in.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Deserialize::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(num) => num.to_string(),
        _ => return Err(de::Error::custom("Wrong type, expected string or number")),
    })
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCheckout {
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,

    #[serde(default)]
    pub currency: PaymentCurrency,

    #[serde(rename = "orderNumber")]
    pub order_number: String,
}

/// Free-form parameters a merchant may attach to a checkout. Not part of
/// the signature.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CustomParams {}

/// The field set posted to the gateway's hosted-checkout page. `sha256check`
/// covers every other field except `protocol`, `callback_url` and
/// `custom_params`, in the order fixed by the gateway protocol.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutForm {
    pub protocol: String,
    pub apikey: String,
    pub transaction: String,
    pub order_number: String,
    pub amount: String,
    pub currency: String,
    pub sha256check: String,
    pub success_url: String,
    pub cancel_url: String,
    pub callback_url: String,
    pub test: bool,
    pub custom_params: Option<CustomParams>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutCreated {
    #[serde(rename = "viabillCheckoutUrl")]
    pub checkout_url: String,

    #[serde(rename = "formData")]
    pub form_data: CheckoutForm,
}

#[cfg(test)]
mod tests {
    use crate::CreateCheckout;

    #[test]
    fn amount_accepts_string_and_number() {
        let from_string: CreateCheckout =
            serde_json::from_str(r#"{"amount":"100.00","orderNumber":"ORD-1"}"#).unwrap();
        assert_eq!(from_string.amount, "100.00");

        let from_number: CreateCheckout =
            serde_json::from_str(r#"{"amount":50,"orderNumber":"ORD-1"}"#).unwrap();
        assert_eq!(from_number.amount, "50");
    }

    #[test]
    fn currency_defaults_to_dkk() {
        let payload: CreateCheckout =
            serde_json::from_str(r#"{"amount":"10","orderNumber":"ORD-1"}"#).unwrap();
        assert_eq!(payload.currency.to_string(), "DKK");
    }
}
