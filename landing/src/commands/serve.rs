use landing_config::Config;
use tracing::info;

use crate::environment::{ConfigProvider, Provider};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Loading templates");
    let config_provider = ConfigProvider::new(&config)?;
    let provider = Provider::new(config_provider)?;
    let server = provider.web_api()?;

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
