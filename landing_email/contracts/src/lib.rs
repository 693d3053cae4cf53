use std::{collections::BTreeMap, future::Future};

use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hands a message to the transactional email provider.
    ///
    /// Returns `Ok(false)` if the provider refused the message and `Err(_)` if
    /// it could not be reached or its response could not be understood.
    fn send(&self, email: TransactionalEmail) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

/// A message rendered by the provider from one of its stored templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionalEmail {
    pub service_id: String,
    pub template_id: String,
    pub template_params: BTreeMap<String, String>,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: TransactionalEmail, result: bool) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_error(mut self, email: TransactionalEmail, error: &'static str) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Err(anyhow::anyhow!(error)))));
        self
    }
}
