//! Layered configuration: defaults, then an optional YAML file, then
//! `NOMAD_*` environment variables, then command-line flags.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use nomad_client::{DEFAULT_ADDRESS, NomadClientConfig};
use secrecy::SecretString;
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub addr: String,
    token: Option<String>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDRESS.to_owned(),
            token: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

impl std::fmt::Debug for ToolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolConfig")
            .field("addr", &self.addr)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("log", &self.log)
            .finish()
    }
}

impl ToolConfig {
    /// Resolve configuration for this invocation.
    ///
    /// # Errors
    /// Returns the figment error for an unreadable file or mistyped value.
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(figment::Error::from(format!(
                    "config file '{}' not found",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("NOMAD_").split("__"));

        if let Some(address) = &cli.address {
            figment = figment.merge(Serialized::default("addr", address));
        }
        if let Some(token) = &cli.token {
            figment = figment.merge(Serialized::default("token", token));
        }
        if let Some(level) = &cli.log_level {
            figment = figment.merge(Serialized::default("log.level", level));
        }
        if cli.json_logs {
            figment = figment.merge(Serialized::default("log.json", true));
        }

        figment.extract()
    }

    /// Client settings; an empty token means unauthenticated.
    pub fn client_config(&self) -> NomadClientConfig {
        let token = self
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::new(token.to_owned().into_boxed_str()));
        NomadClientConfig::remote(self.addr.clone(), token)
    }

    #[cfg(test)]
    fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}
