use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use landing_models::contact::ContactFormError;
use serde::Serialize;

use crate::models::{ApiError, ApiInvalidForm};

pub mod assets;
pub mod contact;
pub mod health;
pub mod page;

/// Logs the full error chain; the client only learns that something broke.
pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn invalid_form(err: ContactFormError) -> Response {
    let body = ApiInvalidForm {
        detail: "Invalid contact form",
        field: err.field(),
        message: err.to_string(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn error(code: StatusCode, detail: impl Serialize) -> Response {
    (code, Json(ApiError { detail })).into_response()
}
