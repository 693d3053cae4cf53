use std::{net::IpAddr, sync::Arc, time::Duration};

use axum::Router;
use landing_core_contact_contracts::ContactService;
use landing_core_contact_impl::form::ContactFormConfig;
use landing_templates_contracts::{SiteInfo, TemplateService};
use session::FormSessions;
use tokio::net::TcpListener;

mod middlewares;
mod models;
mod routes;
pub mod session;

pub use middlewares::request_id::REQUEST_ID_HEADER;
pub use session::SESSION_COOKIE;

#[derive(Debug, Clone)]
pub struct WebServer<Contact, Templates> {
    contact: Contact,
    templates: Templates,
    config: WebServerConfig,
}

#[derive(Debug, Clone)]
pub struct WebServerConfig {
    pub site: SiteInfo,
    pub form: ContactFormConfig,
    /// Visitors inactive for this long lose their form.
    pub session_ttl: Duration,
    /// Maximum number of forms kept at once.
    pub session_capacity: usize,
}

pub(crate) struct AppState<Contact, Templates> {
    sessions: FormSessions<Contact>,
    templates: Templates,
    site: SiteInfo,
    banner_duration: Duration,
}

impl<Contact, Templates> WebServer<Contact, Templates>
where
    Contact: ContactService + Clone,
    Templates: TemplateService,
{
    pub fn new(contact: Contact, templates: Templates, config: WebServerConfig) -> Self {
        Self {
            contact,
            templates,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        self.serve_listener(listener).await
    }

    pub async fn serve_listener(self, listener: TcpListener) -> anyhow::Result<()> {
        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let state = Arc::new(AppState {
            sessions: FormSessions::new(
                self.contact,
                self.config.form,
                self.config.session_ttl,
                self.config.session_capacity,
            ),
            templates: self.templates,
            site: self.config.site,
            banner_duration: self.config.form.banner_duration,
        });

        let router = Router::new()
            .merge(routes::page::router(Arc::clone(&state)))
            .merge(routes::contact::router(state))
            .merge(routes::health::router())
            .merge(routes::assets::router());

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
