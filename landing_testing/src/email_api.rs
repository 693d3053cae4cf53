use std::{collections::BTreeMap, net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{debug, info};

pub const SEND_ROUTE: &str = "/api/v1.0/email/send";
pub const MESSAGES_ROUTE: &str = "/_testing/messages";

pub async fn start_server(host: IpAddr, port: u16, public_key: String) -> anyhow::Result<()> {
    info!("Starting email api testing server on {host}:{port}");
    info!("Send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("Received messages: http://{host}:{port}{MESSAGES_ROUTE}");
    info!("Public key: {public_key:?}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    serve(listener, public_key).await
}

/// Serves the fake email api on an already bound listener.
pub async fn serve(listener: TcpListener, public_key: String) -> anyhow::Result<()> {
    axum::serve(listener, router(public_key))
        .await
        .context("Failed to start HTTP server")
}

pub fn router(public_key: String) -> Router<()> {
    Router::new()
        .route(SEND_ROUTE, routing::post(send))
        .route(MESSAGES_ROUTE, routing::get(messages))
        .with_state(Arc::new(StateInner {
            public_key,
            received: Default::default(),
        }))
}

/// A message accepted by the fake api.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedEmail {
    pub service_id: String,
    pub template_id: String,
    pub template_params: BTreeMap<String, String>,
}

type AppState = State<Arc<StateInner>>;
struct StateInner {
    public_key: String,
    received: Mutex<Vec<ReceivedEmail>>,
}

#[derive(Deserialize)]
struct SendRequest {
    service_id: String,
    template_id: String,
    user_id: String,
    #[serde(default)]
    template_params: BTreeMap<String, String>,
}

async fn send(state: AppState, Json(request): Json<SendRequest>) -> Response {
    if request.user_id != state.public_key {
        return (StatusCode::FORBIDDEN, "The Public Key is invalid").into_response();
    }
    if request.service_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "The service ID is required").into_response();
    }
    if request.template_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "The template ID is required").into_response();
    }

    debug!(
        service_id = %request.service_id,
        template_id = %request.template_id,
        "received message"
    );
    state.received.lock().await.push(ReceivedEmail {
        service_id: request.service_id,
        template_id: request.template_id,
        template_params: request.template_params,
    });

    (StatusCode::OK, "OK").into_response()
}

async fn messages(state: AppState) -> Json<Vec<ReceivedEmail>> {
    Json(state.received.lock().await.clone())
}
