use landing_models::contact::ContactField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiError<D> {
    pub detail: D,
}

/// A single input event for one of the form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiFieldUpdate {
    pub field: ContactField,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ApiInvalidForm {
    pub detail: &'static str,
    pub field: ContactField,
    pub message: String,
}
