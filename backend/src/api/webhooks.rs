use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_client_ip::SecureClientIp;
use serde::Serialize;
use serde_json::Value;

use crate::api::ErrorResponse;
use crate::payment_handler::PAYMENT_HANDLER;
use crate::pay_services::viabill::RawStatusCallback;
use crate::pay_services::SignatureError;

#[derive(Serialize)]
struct WebhookAccepted {
    status: &'static str,
    message: &'static str,
}

pub async fn viabill_status_webhook(
    client_ip: SecureClientIp,
    Json(body): Json<Value>,
) -> Response {
    println!("Status callback from {:?}: {body}", client_ip.0);

    let Ok(raw) = RawStatusCallback::from_data(body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing required fields".to_string(),
            }),
        )
            .into_response();
    };

    match PAYMENT_HANDLER.handle_status_update(raw).await {
        Ok(()) => (
            StatusCode::OK,
            Json(WebhookAccepted {
                status: "success",
                message: "Webhook processed",
            }),
        )
            .into_response(),

        Err(err @ SignatureError::FieldMissing { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),

        Err(err @ SignatureError::InvalidSignature { .. }) => {
            // Both digests go to the console for audit.
            println!("Signature validation failed: {err}");

            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid signature".to_string(),
                }),
            )
                .into_response()
        }

        Err(err) => {
            println!("Callback processing error: {err}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
