use std::{collections::BTreeMap, sync::Arc, time::Duration};

use landing_email_contracts::{EmailService, TransactionalEmail};
use landing_utils::trace_instrument;
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::http::HttpClient;

pub mod http;

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    config: Arc<EmailServiceConfig>,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub endpoint: Url,
    /// Public key of the provider account, sent as `user_id`.
    pub public_key: String,
    /// Optional private key, sent as `accessToken`.
    pub private_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl EmailServiceConfig {
    pub fn new(public_key: String, endpoint_override: Option<Url>) -> anyhow::Result<Self> {
        let endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => DEFAULT_ENDPOINT.parse()?,
        };
        Ok(Self {
            endpoint,
            public_key,
            private_key: None,
            timeout: None,
        })
    }
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config.timeout)?;
        Ok(Self {
            config: config.into(),
            client,
        })
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self))]
    async fn send(&self, email: TransactionalEmail) -> anyhow::Result<bool> {
        let request = SendRequest {
            service_id: &email.service_id,
            template_id: &email.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: &email.template_params,
        };

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let detail = response.text().await?;
        warn!(%status, %detail, "email provider refused message");
        Ok(false)
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a BTreeMap<String, String>,
}
