//! Client configuration loading.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::ArmError;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081/services";
const DEFAULT_OPERATOR: &str = "Anonymous";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 500;
const DEFAULT_READ_TIMEOUT_MS: u64 = 2000;

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base path of the arm service, up to but excluding `/{joint}` and
    /// `/control`.
    pub base_url: SmolStr,
    /// Name sent when acquiring the access token.
    pub operator: SmolStr,
    /// Default log filter for the binary.
    pub log_level: SmolStr,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// HTTP read timeout.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: SmolStr::new(DEFAULT_BASE_URL),
            operator: SmolStr::new(DEFAULT_OPERATOR),
            log_level: SmolStr::new(DEFAULT_LOG_LEVEL),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a `client.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArmError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|err| ArmError::InvalidConfig(format!("client.toml: {err}").into()))?;
        Self::parse(&text)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ArmError> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn parse(text: &str) -> Result<Self, ArmError> {
        let raw: ClientToml = toml::from_str(text)
            .map_err(|err| ArmError::InvalidConfig(format!("client.toml: {err}").into()))?;
        raw.into_config()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClientToml {
    service: Option<ServiceSection>,
    operator: Option<OperatorSection>,
    log: Option<LogSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    base_url: Option<String>,
    connect_timeout_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OperatorSection {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LogSection {
    level: Option<String>,
}

impl ClientToml {
    fn into_config(self) -> Result<ClientConfig, ArmError> {
        let service = self.service.unwrap_or_default();
        let operator = self.operator.unwrap_or_default();
        let log = self.log.unwrap_or_default();

        let base_url = service
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL);
        if base_url.is_empty() {
            return Err(ArmError::InvalidConfig(
                "service.base_url must not be empty".into(),
            ));
        }

        let name = operator.name.as_deref().map(str::trim).unwrap_or("");
        let operator = if name.is_empty() {
            SmolStr::new(DEFAULT_OPERATOR)
        } else {
            SmolStr::new(name)
        };

        Ok(ClientConfig {
            base_url: SmolStr::new(base_url),
            operator,
            log_level: SmolStr::new(log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)),
            connect_timeout: Duration::from_millis(
                service
                    .connect_timeout_ms
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            ),
            read_timeout: Duration::from_millis(
                service.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS),
            ),
        })
    }
}
