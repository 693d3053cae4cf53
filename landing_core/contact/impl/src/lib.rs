use std::{collections::BTreeMap, sync::Arc};

use landing_core_contact_contracts::{ContactSendMessageError, ContactService};
use landing_email_contracts::{EmailService, TransactionalEmail};
use landing_models::contact::ContactMessage;
use landing_utils::trace_instrument;

pub mod form;

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email> {
    email: Email,
    config: ContactFeatureConfig,
}

/// Routing identifiers of the provider side template which formats contact
/// messages.
#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub service_id: Arc<str>,
    pub template_id: Arc<str>,
}

impl<Email> ContactServiceImpl<Email> {
    pub fn new(email: Email, config: ContactFeatureConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactService for ContactServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    #[trace_instrument(skip(self))]
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let email = TransactionalEmail {
            service_id: self.config.service_id.to_string(),
            template_id: self.config.template_id.to_string(),
            template_params: template_params(message),
        };

        if !self.email.send(email).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}

fn template_params(message: ContactMessage) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("name".into(), message.author.name.into_inner()),
        ("email".into(), message.author.email.to_string()),
        (
            "company".into(),
            message
                .company
                .map(|company| company.into_inner())
                .unwrap_or_default(),
        ),
        ("message".into(), message.content.into_inner()),
    ])
}
