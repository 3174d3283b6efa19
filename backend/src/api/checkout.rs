use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use shared::CreateCheckout;

use crate::api::ErrorResponse;
use crate::payment_handler::PAYMENT_HANDLER;

pub async fn create_checkout(Json(body): Json<Value>) -> Response {
    let Ok(payload) = serde_json::from_value::<CreateCheckout>(body) else {
        return missing_fields();
    };

    if payload.amount.is_empty() || payload.order_number.is_empty() {
        return missing_fields();
    }

    match PAYMENT_HANDLER.create_checkout(
        &payload.amount,
        &payload.currency.to_string(),
        &payload.order_number,
    ) {
        Ok(checkout) => (StatusCode::OK, Json(checkout)).into_response(),

        Err(err) => {
            println!("Checkout signing error: {err}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn missing_fields() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Missing required fields: amount, orderNumber".to_string(),
        }),
    )
        .into_response()
}
