use landing_api_web::WebServerConfig;
use landing_config::Config;
use landing_core_contact_impl::{form::ContactFormConfig, ContactFeatureConfig};
use landing_email_impl::EmailServiceConfig;
use landing_templates_contracts::SiteInfo;
use types::{Contact, Email, Template, WebApi};

pub mod types;

/// Everything the services need, derived from the config file.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    // Email
    pub email_service_config: EmailServiceConfig,

    // Core
    pub contact_feature_config: ContactFeatureConfig,

    // API
    pub web_server_config: WebServerConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Email
        let email_service_config = EmailServiceConfig {
            private_key: config.email.private_key.clone(),
            timeout: config.email.timeout.map(Into::into),
            ..EmailServiceConfig::new(
                config.email.public_key.clone(),
                Some(config.email.endpoint.clone()),
            )?
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            service_id: config.contact.service_id.as_str().into(),
            template_id: config.contact.template_id.as_str().into(),
        };

        // API
        let web_server_config = WebServerConfig {
            site: SiteInfo {
                company: config.site.company.clone(),
                email: config.site.email.to_string(),
                phone: config.site.phone.clone(),
                phone_display: config.site.phone_display.clone(),
                location: config.site.location.clone(),
            },
            form: ContactFormConfig {
                banner_duration: config.contact.banner_duration.into(),
            },
            session_ttl: config.session.ttl.into(),
            session_capacity: config.session.capacity,
        };

        Ok(Self {
            email_service_config,
            contact_feature_config,
            web_server_config,
        })
    }
}

/// Builds the services on top of a [`ConfigProvider`].
#[derive(Debug)]
pub struct Provider {
    config: ConfigProvider,
    email: Email,
}

impl Provider {
    pub fn new(config: ConfigProvider) -> anyhow::Result<Self> {
        let email = Email::new(config.email_service_config.clone())?;
        Ok(Self { config, email })
    }

    pub fn email(&self) -> Email {
        self.email.clone()
    }

    pub fn contact(&self) -> Contact {
        Contact::new(self.email(), self.config.contact_feature_config.clone())
    }

    pub fn templates(&self) -> anyhow::Result<Template> {
        Template::new()
    }

    pub fn web_api(&self) -> anyhow::Result<WebApi> {
        Ok(WebApi::new(
            self.contact(),
            self.templates()?,
            self.config.web_server_config.clone(),
        ))
    }
}
