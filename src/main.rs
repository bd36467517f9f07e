use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::Method;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use console_gateway::domain::auth::CredentialPair;
use console_gateway::domain::navigation::{LoggingNavigator, Navigator};
use console_gateway::infrastructure::config::{Config, LogFormat};
use console_gateway::infrastructure::http::{ApiGateway, ApiRequest};
use console_gateway::infrastructure::repositories::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore,
};

#[derive(Parser)]
#[command(version, about = "Authenticated client for the console API", long_about = None)]
#[command(name = "console-gateway")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a credential pair obtained from a login
    Login {
        /// Access credential
        access: String,
        /// Refresh credential
        refresh: String,
    },
    /// Forget both stored credentials
    Logout,
    /// Report whether a refresh credential is stored
    Status,
    /// Send a request through the authenticated pipeline
    Request {
        /// HTTP method, e.g. GET or POST
        #[arg(value_parser = parse_method)]
        method: Method,
        /// Path relative to API_BASE_URL
        path: String,
        /// JSON request body
        body: Option<String>,
    },
}

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_uppercase().as_bytes())
        .map_err(|_| format!("unknown HTTP method '{}'", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    let store: Arc<dyn CredentialStore> = match &config.credential_store_path {
        Some(path) => Arc::new(FileCredentialStore::open(path)),
        None => {
            tracing::warn!("CREDENTIAL_STORE_PATH not set, credentials will not survive restarts");
            Arc::new(MemoryCredentialStore::new())
        }
    };
    let navigator: Arc<dyn Navigator> = Arc::new(LoggingNavigator::new(config.navigation_paths()));

    let gateway = ApiGateway::from_config(&config, store, navigator)?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        environment = ?config.environment,
        "Console gateway ready"
    );

    match cli.command {
        Command::Login { access, refresh } => {
            gateway.sign_in(&CredentialPair::new(access.as_str(), refresh.as_str()));
        }
        Command::Logout => gateway.sign_out(),
        Command::Status => {
            println!(
                "{}",
                if gateway.is_signed_in() {
                    "signed in"
                } else {
                    "signed out"
                }
            );
        }
        Command::Request { method, path, body } => {
            let mut request = ApiRequest::new(method, path.as_str());
            if let Some(raw) = body {
                let body: serde_json::Value =
                    serde_json::from_str(&raw).context("request body is not valid JSON")?;
                request = request.with_json(&body)?;
            }

            let response = gateway.execute(request).await?;
            match &response.body {
                Some(body) => println!("{}", serde_json::to_string_pretty(body)?),
                None => println!("{}", String::from_utf8_lossy(&response.body_bytes)),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "console_gateway=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "console_gateway=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
