use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Content service endpoint and HTTP client tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub enable_request_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("CONTENT_BASE_URL") {
            self.content.base_url = v;
        }
        if let Ok(v) = env::var("CONTENT_REQUEST_TIMEOUT_SECS") {
            self.content.request_timeout_secs =
                v.parse().unwrap_or(self.content.request_timeout_secs);
        }
        if let Ok(v) = env::var("CONTENT_ENABLE_REQUEST_LOGGING") {
            self.content.enable_request_logging =
                v.parse().unwrap_or(self.content.enable_request_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            content: ContentConfig {
                base_url: "http://localhost:3000".to_string(),
                request_timeout_secs: 30,
                enable_request_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            content: ContentConfig {
                base_url: "https://staging.scoutportal.example.com".to_string(),
                request_timeout_secs: 15,
                enable_request_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            content: ContentConfig {
                base_url: "https://www.scoutportal.example.com".to_string(),
                request_timeout_secs: 10,
                enable_request_logging: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
