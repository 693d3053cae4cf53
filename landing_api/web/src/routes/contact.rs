use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use axum_extra::extract::CookieJar;
use landing_core_contact_contracts::{ContactFormSubmitError, ContactService};
use landing_templates_contracts::TemplateService;

use super::{error, invalid_form};
use crate::{models::ApiFieldUpdate, AppState};

pub fn router<Contact, Templates>(state: Arc<AppState<Contact, Templates>>) -> Router<()>
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    Router::new()
        .route(
            "/api/contact",
            routing::get(get_form::<Contact, Templates>).patch(update_field::<Contact, Templates>),
        )
        .route(
            "/api/contact/submit",
            routing::post(submit::<Contact, Templates>),
        )
        .with_state(state)
}

async fn get_form<Contact, Templates>(
    state: State<Arc<AppState<Contact, Templates>>>,
    jar: CookieJar,
) -> Response
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    let snapshot = state
        .sessions
        .find(&jar)
        .map(|form| form.snapshot())
        .unwrap_or_default();
    Json(snapshot).into_response()
}

async fn update_field<Contact, Templates>(
    state: State<Arc<AppState<Contact, Templates>>>,
    jar: CookieJar,
    Json(ApiFieldUpdate { field, value }): Json<ApiFieldUpdate>,
) -> Response
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    let (jar, form) = state.sessions.from_cookies(jar);
    (jar, Json(form.update_field(field, value))).into_response()
}

async fn submit<Contact, Templates>(
    state: State<Arc<AppState<Contact, Templates>>>,
    jar: CookieJar,
) -> Response
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    let (jar, form) = state.sessions.from_cookies(jar);

    let response = match form.submit().await {
        Ok(_) => Json(form.snapshot()).into_response(),
        Err(ContactFormSubmitError::Invalid(err)) => invalid_form(err),
        Err(ContactFormSubmitError::AlreadySubmitting) => {
            error(StatusCode::CONFLICT, "Already submitting")
        }
    };

    (jar, response).into_response()
}
