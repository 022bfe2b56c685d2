use crate::auth::config::{IntercomConfig, SiteConfig};
use crate::server::config::{LoggingConfig, MetricsConfig, ServerConfig};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const ENV_PREFIX: &str = "OAUTH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub intercom: IntercomConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Config {
    /// Defaults, then `config.yaml` in the working directory, then `OAUTH_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("config.yaml")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::build(path.as_ref(), env_source())
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Config::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Reject configurations the OAuth flow cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intercom.client_id.is_empty() {
            return Err(ConfigError::Message(
                "intercom.client_id is not set (OAUTH_INTERCOM__CLIENT_ID)".to_string(),
            ));
        }
        if self.intercom.client_secret.is_empty() {
            return Err(ConfigError::Message(
                "intercom.client_secret is not set (OAUTH_INTERCOM__CLIENT_SECRET)".to_string(),
            ));
        }

        for (key, value) in [
            ("intercom.authorize_url", &self.intercom.authorize_url),
            ("intercom.token_url", &self.intercom.token_url),
            ("intercom.me_url", &self.intercom.me_url),
            ("site.base_url", &self.site.base_url),
        ] {
            Url::parse(value)
                .map_err(|e| ConfigError::Message(format!("{key} is not a valid URL: {e}")))?;
        }

        Ok(())
    }
}
