use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing, Form, Router,
};
use axum_extra::extract::CookieJar;
use chrono::Datelike;
use landing_core_contact_contracts::{ContactFormSubmitError, ContactService};
use landing_models::{
    contact::ContactForm,
    submission::{ContactFormSnapshot, SubmissionStatus},
};
use landing_templates_contracts::{timeline, IndexTemplate, TemplateService};

use super::internal_server_error;
use crate::AppState;

pub fn router<Contact, Templates>(state: Arc<AppState<Contact, Templates>>) -> Router<()>
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    Router::new()
        .route(
            "/",
            routing::get(index::<Contact, Templates>).post(submit::<Contact, Templates>),
        )
        .with_state(state)
}

async fn index<Contact, Templates>(
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
    match render(&state, snapshot, None) {
        Ok(page) => page.into_response(),
        Err(response) => response,
    }
}

async fn submit<Contact, Templates>(
    state: State<Arc<AppState<Contact, Templates>>>,
    jar: CookieJar,
    Form(fields): Form<ContactForm>,
) -> Response
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    let (jar, form) = state.sessions.from_cookies(jar);
    form.update_fields(fields);

    let (status, err) = match form.submit().await {
        Ok(_) => return (jar, Redirect::to("/")).into_response(),
        Err(err @ ContactFormSubmitError::Invalid(_)) => (StatusCode::UNPROCESSABLE_ENTITY, err),
        Err(err @ ContactFormSubmitError::AlreadySubmitting) => (StatusCode::CONFLICT, err),
    };

    match render(&state, form.snapshot(), Some(err.to_string())) {
        Ok(page) => (status, jar, page).into_response(),
        Err(response) => response,
    }
}

fn render<Contact, Templates>(
    state: &AppState<Contact, Templates>,
    snapshot: ContactFormSnapshot,
    form_error: Option<String>,
) -> Result<Html<String>, Response>
where
    Templates: TemplateService,
{
    let ContactFormSnapshot { fields, status } = snapshot;
    let template = IndexTemplate {
        site: state.site.clone(),
        fields,
        is_submitting: status.is_submitting(),
        submit_success: status.submit_success(),
        submit_error: status.submit_error(),
        form_error,
        refresh_after: refresh_after(status, state.banner_duration),
        timeline: timeline::entrance().into_steps(),
        year: chrono::Utc::now().year(),
    };

    state
        .templates
        .render(&template)
        .map(Html)
        .map_err(internal_server_error)
}

/// Reload once the banner is gone, or shortly while a message is still on
/// its way.
fn refresh_after(status: SubmissionStatus, banner_duration: Duration) -> Option<u64> {
    if status.is_submitting() {
        Some(1)
    } else if status.has_banner() {
        let secs = banner_duration.as_millis().div_ceil(1000).max(1);
        Some(u64::try_from(secs).unwrap_or(u64::MAX))
    } else {
        None
    }
}
