use std::{ops::Deref, sync::LazyLock, time::Duration};

use landing_utils::landing_version;

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let repository = env!("CARGO_PKG_REPOSITORY");
    let version = landing_version();

    format!("Landing Page ({homepage}, {repository}, Version {version})")
});

const _: () = {
    assert!(!env!("CARGO_PKG_HOMEPAGE").is_empty());
    assert!(!env!("CARGO_PKG_REPOSITORY").is_empty());
};

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl HttpClient {
    /// Builds a client which gives up on requests after `timeout`. Without a
    /// timeout, requests wait as long as the connection stays open.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let builder = reqwest::Client::builder().user_agent(&*USER_AGENT);
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Ok(Self(builder.build()?))
    }
}

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
