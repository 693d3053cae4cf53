use landing_api_web::WebServer;
use landing_core_contact_impl::ContactServiceImpl;
use landing_email_impl::EmailServiceImpl;
use landing_templates_impl::TemplateServiceImpl;

// Email
pub type Email = EmailServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;

// Core
pub type Contact = ContactServiceImpl<Email>;

// API
pub type WebApi = WebServer<Contact, Template>;
