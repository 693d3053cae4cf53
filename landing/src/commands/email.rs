use anyhow::Context;
use clap::Subcommand;
use landing_config::Config;
use landing_core_contact_contracts::ContactService;
use landing_models::contact::ContactForm;
use tracing::info;

use crate::environment::{ConfigProvider, Provider};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Send a contact message through the configured email provider
    Test {
        /// Name of the sender
        #[arg(long)]
        name: String,
        /// Email address of the sender
        #[arg(long)]
        email: String,
        /// Company of the sender
        #[arg(long, default_value_t)]
        company: String,
        /// Message to send
        #[arg(long)]
        message: String,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test {
                name,
                email,
                company,
                message,
            } => {
                test(
                    config,
                    ContactForm {
                        name,
                        email,
                        company,
                        message,
                    },
                )
                .await
            }
        }
    }
}

async fn test(config: Config, form: ContactForm) -> anyhow::Result<()> {
    let message = form.validate()?;

    let provider = Provider::new(ConfigProvider::new(&config)?)?;
    provider
        .contact()
        .send_message(message)
        .await
        .context("Failed to send email")?;

    info!("Email sent");
    Ok(())
}
