use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mail_dispatch::{
    config::Config,
    domain::{Locale, User},
    email::{EmailProvider, HandlebarsTemplateEngine, SmtpEmailProvider, TemplateContext},
    telemetry, Mailer,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "mail-dispatch", version, about = "Render and send account emails")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template and send it
    Send {
        /// Template file name, e.g. verify.html
        #[arg(long)]
        template: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "en")]
        locale: Locale,
        #[arg(long)]
        subject: Option<String>,
        /// Template parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Send the account verification email
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Check that the SMTP server accepts connections
    CheckSmtp,
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in {:?}", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    telemetry::init(&config.telemetry);

    let provider = Arc::new(
        SmtpEmailProvider::from_config(&config.smtp).context("Failed to create SMTP provider")?,
    );

    match cli.command {
        Command::CheckSmtp => {
            provider
                .test_connection()
                .await
                .context("SMTP connection check failed")?;
            info!(host = %config.smtp.host, port = config.smtp.port, "SMTP connection OK");
        }
        Command::Send {
            template,
            to,
            locale,
            subject,
            params,
        } => {
            let mut parameters: TemplateContext = params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            if let Some(subject) = subject {
                parameters.insert("subject".to_string(), Value::String(subject));
            }

            build_mailer(config, provider)?
                .create_and_send_email(&template, &to, &parameters, &locale)
                .await?;
        }
        Command::Verify {
            email,
            token,
            first_name,
            last_name,
            locale,
        } => {
            let user = User {
                email,
                first_name,
                last_name,
                verify_token: token,
            };
            info!(user = %user.display_name(), %locale, "Sending verification email");
            // Awaited rather than spawned so the process outlives the delivery
            build_mailer(config, provider)?
                .deliver_validation_email(&user, &locale)
                .await?;
        }
    }

    Ok(())
}

fn build_mailer(config: Config, provider: Arc<SmtpEmailProvider>) -> Result<Mailer> {
    let templates = HandlebarsTemplateEngine::from_dir(&config.templates_dir).with_context(|| {
        format!(
            "Failed to load templates from {}",
            config.templates_dir.display()
        )
    })?;

    if !config.mail.send {
        info!("EMAIL_SEND is off, messages will be rendered but not delivered");
    }

    Ok(Mailer::new(config.mail, provider, Arc::new(templates)))
}
