//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `SUBGATE_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `SUBGATE_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `SUBGATE_GATEWAY__APPLICATION_ID=APP_000123` sets the `gateway.application_id` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! SUBGATE_PORT=8080
//!
//! # Gateway credentials (preferred over putting secrets in YAML)
//! SUBGATE_GATEWAY__APPLICATION_ID="APP_000123"
//! SUBGATE_GATEWAY__PASSWORD="hunter2"
//!
//! # Webhook signing secret shared with the gateway operator
//! SUBGATE_WEBHOOK__SECRET="whsec_..."
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

use crate::signing;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "SUBGATE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Outbound subscription gateway configuration
    pub gateway: GatewayConfig,
    /// Inbound notification webhook configuration
    pub webhook: WebhookConfig,
}

/// Subscription gateway connection settings.
///
/// Credentials are issued by the gateway operator when the application is
/// registered. Set `password` via environment variable rather than YAML where
/// possible.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Application identifier issued by the gateway operator
    pub application_id: String,
    /// Shared secret for the application
    pub password: String,
    /// Gateway protocol version string sent with every request
    pub version: String,
    /// Outbound endpoint for subscribe/unsubscribe requests
    pub url: Url,
    /// Path the gateway operator registers for status-change callbacks.
    /// Recorded here for registration purposes; requests are routed by the
    /// server regardless of this value.
    pub webhook_path: String,
    /// HTTP timeout for gateway requests
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

// Keep the gateway password out of startup logs and error chains.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("application_id", &self.application_id)
            .field("password", &"<redacted>")
            .field("version", &self.version)
            .field("url", &self.url.as_str())
            .field("webhook_path", &self.webhook_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            password: String::new(),
            version: "1.0".to_string(),
            url: Url::parse("http://localhost:7000/subscription/send").unwrap(),
            webhook_path: "/webhooks/subscription".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Inbound notification webhook settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    /// `whsec_`-prefixed signing secret shared with the gateway operator.
    /// When set, inbound notifications must carry a valid HMAC signature;
    /// when unset, unsigned notifications are accepted and a warning is
    /// logged at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Maximum accepted age of a signed notification timestamp (replay window)
    #[serde(with = "humantime_serde")]
    pub tolerance: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            tolerance: Duration::from_secs(5 * 60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            gateway: GatewayConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("SUBGATE_").split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(secret) = &self.webhook.secret
            && signing::decode_secret(secret).is_none()
        {
            return Err(format!(
                "webhook.secret must be a base64 secret prefixed with {:?}",
                signing::SECRET_PREFIX
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_gateway_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
gateway:
  application_id: APP_000123
  password: secret
  url: https://api.gateway.example/subscription/send
  timeout: 10s
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.gateway.application_id, "APP_000123");
            assert_eq!(config.gateway.password, "secret");
            assert_eq!(config.gateway.url.as_str(), "https://api.gateway.example/subscription/send");
            assert_eq!(config.gateway.timeout, Duration::from_secs(10));
            // Defaults fill the rest
            assert_eq!(config.gateway.version, "1.0");
            assert_eq!(config.port, 3001);

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
host: 0.0.0.0
gateway:
  application_id: from-yaml
"#,
            )?;

            jail.set_env("SUBGATE_HOST", "127.0.0.1");
            jail.set_env("SUBGATE_PORT", "8080");
            jail.set_env("SUBGATE_GATEWAY__APPLICATION_ID", "from-env");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            // Env vars should override
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8080);
            assert_eq!(config.gateway.application_id, "from-env");

            Ok(())
        });
    }

    #[test]
    fn test_invalid_webhook_secret_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
webhook:
  secret: not-a-webhook-secret
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            assert!(Config::load(&args).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let mut config = GatewayConfig::default();
        config.password = "hunter2".to_string();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
