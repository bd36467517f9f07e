use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::navigation::NavigationPaths;
use crate::infrastructure::oauth::refresh_token::DEFAULT_REFRESH_TOKEN_PATH;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub refresh_token_path: String,
    pub request_timeout_secs: u64,
    /// 0 disables the bound on the refresh call
    pub refresh_timeout_secs: u64,
    pub credential_store_path: Option<PathBuf>,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Navigation destinations
    pub login_path: String,
    pub session_expired_path: String,
    pub forbidden_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = NavigationPaths::default();

        let config = Config {
            api_base_url: env::var("API_BASE_URL")?,
            refresh_token_path: env::var("REFRESH_TOKEN_PATH")
                .unwrap_or_else(|_| DEFAULT_REFRESH_TOKEN_PATH.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            refresh_timeout_secs: env::var("REFRESH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            credential_store_path: env::var("CREDENTIAL_STORE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            environment: env::var("ENVIRONMENT")
                .map(|s| parse_environment(&s))
                .unwrap_or(Environment::Development),
            log_format: env::var("LOG_FORMAT")
                .map(|s| parse_log_format(&s))
                .unwrap_or(LogFormat::Pretty),
            login_path: env::var("LOGIN_PATH").unwrap_or(defaults.login),
            session_expired_path: env::var("SESSION_EXPIRED_PATH")
                .unwrap_or(defaults.session_expired),
            forbidden_path: env::var("FORBIDDEN_PATH").unwrap_or(defaults.forbidden),
        };

        Ok(config)
    }

    /// Config for a given API root with every other setting at its default
    pub fn for_base_url(api_base_url: &str) -> Self {
        let defaults = NavigationPaths::default();
        Config {
            api_base_url: api_base_url.to_string(),
            refresh_token_path: DEFAULT_REFRESH_TOKEN_PATH.to_string(),
            request_timeout_secs: 30,
            refresh_timeout_secs: 30,
            credential_store_path: None,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            login_path: defaults.login,
            session_expired_path: defaults.session_expired,
            forbidden_path: defaults.forbidden,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_timeout(&self) -> Option<Duration> {
        match self.refresh_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn navigation_paths(&self) -> NavigationPaths {
        NavigationPaths {
            login: self.login_path.clone(),
            session_expired: self.session_expired_path.clone(),
            forbidden: self.forbidden_path.clone(),
        }
    }
}

fn parse_environment(value: &str) -> Environment {
    match value.to_lowercase().as_str() {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

fn parse_log_format(value: &str) -> LogFormat {
    match value.to_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}
