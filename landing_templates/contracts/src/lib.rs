use landing_models::contact::ContactForm;
use serde::Serialize;

pub mod timeline;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    /// Name the template is registered under. Names ending in `.html` are
    /// html-escaped on render.
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: (&str, &str) = ("base.html", include_str!("../templates/base.html"));

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    IndexTemplate("index.html"),
}

/// The maintenance page with the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexTemplate {
    pub site: SiteInfo,
    pub fields: ContactForm,
    pub is_submitting: bool,
    pub submit_success: bool,
    pub submit_error: bool,
    /// Reason the server refused the form, if the browser did not catch it.
    pub form_error: Option<String>,
    /// Seconds after which the browser should reload the page to pick up the
    /// next state.
    pub refresh_after: Option<u64>,
    pub timeline: Vec<timeline::TimelineStep>,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    pub company: String,
    pub email: String,
    pub phone: String,
    pub phone_display: String,
    pub location: String,
}
