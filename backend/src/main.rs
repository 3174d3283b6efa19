mod api;
mod pay_services;
mod payment_handler;

use axum::routing::{get_service, post};
use axum::Router;
use axum_client_ip::SecureClientIpSource;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::checkout::create_checkout;
use crate::api::webhooks::viabill_status_webhook;

lazy_static! {
    static ref CONFIG: MainConfig = envy::from_env::<MainConfig>().unwrap();
}

#[derive(Deserialize, Debug)]
struct MainConfig {
    #[serde(rename = "vb_demo_secret_key")]
    secret_key: String,
    #[serde(rename = "vb_demo_api_key")]
    api_key: String,
    #[serde(rename = "vb_demo_app_url", default = "default_app_url")]
    app_url: String,
    #[serde(rename = "vb_demo_addon_name", default = "default_addon_name")]
    addon_name: String,
    #[serde(rename = "vb_demo_test_mode", default)]
    test_mode: bool,
    #[serde(rename = "vb_demo_static_dir", default = "default_static_dir")]
    static_dir: String,
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_addon_name() -> String {
    "CUSTOM".to_string()
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

#[tokio::main]
async fn main() {
    // The SPA handles /checkout/success and /checkout/cancel, so unknown
    // paths fall back to index.html.
    let frontend = get_service(
        ServeDir::new(&CONFIG.static_dir)
            .fallback(ServeFile::new(format!("{}/index.html", CONFIG.static_dir))),
    );

    let app = Router::new()
        .route("/webhook/viabill/status", post(viabill_status_webhook))
        .route("/api/v1/checkout/create", post(create_checkout))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(SecureClientIpSource::ConnectInfo.into_extension()),
        );

    axum::Server::bind(&"127.0.0.1:14090".parse().unwrap())
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .unwrap();
}
