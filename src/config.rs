//! Client configuration
//!
//! `ClientConfig` is what the gateway client is built from. Environment lookups
//! live in [`Settings`], which resolves defaults once and hands them to the
//! client explicitly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Prefix for every environment variable read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "MOMO";

/// Minimum length for both the client id and the client secret.
pub const MIN_CREDENTIAL_LEN: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingField { field: &'static str },

    #[error("{field} must be at least {min} characters long, got {actual}")]
    CredentialTooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("Mode must be one of 'uat' or 'live', got '{value}'")]
    InvalidMode { value: String },

    #[error("Invalid base URL for {mode}: {message}")]
    InvalidBaseUrl { mode: Mode, message: String },

    #[error("Failed to create HTTP client: {message}")]
    HttpClient { message: String },

    #[error("The gateway client must be created inside a Tokio runtime")]
    NoRuntime,
}

impl ConfigError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid_mode(value: impl Into<String>) -> Self {
        Self::InvalidMode {
            value: value.into(),
        }
    }

    pub fn http_client(message: impl Into<String>) -> Self {
        Self::HttpClient {
            message: message.into(),
        }
    }
}

/// Deployment mode, which selects the upstream base URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// User acceptance testing (sandbox)
    #[default]
    Uat,
    /// Production
    Live,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Uat => "uat",
            Mode::Live => "live",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uat" => Ok(Mode::Uat),
            "live" => Ok(Mode::Live),
            _ => Err(ConfigError::invalid_mode(s)),
        }
    }
}

/// Fully resolved, validated client configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: Mode,
    pub client_id: String,
    pub client_secret: String,
    /// Logs request payloads and response bodies when set
    pub debug: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(mode: Mode, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            mode,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Merge caller-supplied fields over `defaults`, then validate.
    ///
    /// Unset mode falls back to [`Mode::Uat`] and unset debug to `false`.
    pub fn resolve(partial: PartialConfig, defaults: PartialConfig) -> Result<Self, ConfigError> {
        let merged = partial.merge_over(defaults);

        let config = Self {
            mode: merged.mode.unwrap_or_default(),
            client_id: merged
                .client_id
                .ok_or_else(|| ConfigError::missing_field("client_id"))?,
            client_secret: merged
                .client_secret
                .ok_or_else(|| ConfigError::missing_field("client_secret"))?,
            debug: merged.debug.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_credential("client_id", &self.client_id)?;
        check_credential("client_secret", &self.client_secret)?;
        Ok(())
    }
}

fn check_credential(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let actual = value.chars().count();
    if actual < MIN_CREDENTIAL_LEN {
        return Err(ConfigError::CredentialTooShort {
            field,
            min: MIN_CREDENTIAL_LEN,
            actual,
        });
    }
    Ok(())
}

/// Caller-supplied configuration; any field left `None` is taken from defaults
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub mode: Option<Mode>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub debug: Option<bool>,
}

impl fmt::Debug for PartialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("debug", &self.debug)
            .finish()
    }
}

impl PartialConfig {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Fields set on `self` win over those on `defaults`.
    pub fn merge_over(self, defaults: PartialConfig) -> PartialConfig {
        PartialConfig {
            mode: self.mode.or(defaults.mode),
            client_id: self.client_id.or(defaults.client_id),
            client_secret: self.client_secret.or(defaults.client_secret),
            debug: self.debug.or(defaults.debug),
        }
    }
}

/// Upstream base URL per deployment mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    uat: Url,
    live: Url,
}

impl BaseUrls {
    pub fn new(uat: Url, live: Url) -> Self {
        Self {
            uat: with_trailing_slash(uat),
            live: with_trailing_slash(live),
        }
    }

    pub fn parse(uat: &str, live: &str) -> Result<Self, ConfigError> {
        let parse = |mode: Mode, raw: &str| {
            Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
                mode,
                message: e.to_string(),
            })
        };
        Ok(Self::new(parse(Mode::Uat, uat)?, parse(Mode::Live, live)?))
    }

    pub fn for_mode(&self, mode: Mode) -> &Url {
        match mode {
            Mode::Uat => &self.uat,
            Mode::Live => &self.live,
        }
    }
}

// `Url::join` drops the last path segment unless the base ends with '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[derive(Deserialize)]
struct EnvSettings {
    mode: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    debug: Option<bool>,
    uat_base_url: String,
    live_base_url: String,
}

/// Environment-derived defaults and base URLs
#[derive(Debug, Clone)]
pub struct Settings {
    pub defaults: PartialConfig,
    pub base_urls: BaseUrls,
}

impl Settings {
    /// Read `MOMO_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Build settings from an explicit environment source.
    pub fn load(environment: config::Environment) -> Result<Self> {
        let raw: EnvSettings = config::Config::builder()
            .add_source(environment)
            .build()
            .context("Failed to read environment configuration")?
            .try_deserialize()
            .context("MOMO_UAT_BASE_URL and MOMO_LIVE_BASE_URL must be set")?;

        let mode = raw
            .mode
            .as_deref()
            .map(Mode::from_str)
            .transpose()
            .context("MOMO_MODE is invalid")?;

        let base_urls = BaseUrls::parse(&raw.uat_base_url, &raw.live_base_url)
            .context("Base URLs must be valid absolute URLs")?;

        Ok(Self {
            defaults: PartialConfig {
                mode,
                client_id: raw.client_id,
                client_secret: raw.client_secret,
                debug: raw.debug,
            },
            base_urls,
        })
    }

    /// Resolve caller-supplied fields against the environment defaults.
    pub fn resolve(&self, partial: PartialConfig) -> Result<ClientConfig, ConfigError> {
        ClientConfig::resolve(partial, self.defaults.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_source(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("uat".parse::<Mode>().unwrap(), Mode::Uat);
        assert_eq!(" LIVE ".parse::<Mode>().unwrap(), Mode::Live);
        assert_eq!(
            "sandbox".parse::<Mode>(),
            Err(ConfigError::invalid_mode("sandbox"))
        );
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let defaults = PartialConfig::default()
            .client_id("env-client")
            .client_secret("env-secret");

        let config = ClientConfig::resolve(PartialConfig::default(), defaults).unwrap();
        assert_eq!(config.mode, Mode::Uat);
        assert_eq!(config.client_id, "env-client");
        assert!(!config.debug);
    }

    #[test]
    fn test_resolve_caller_fields_win() {
        let defaults = PartialConfig::default()
            .mode(Mode::Uat)
            .client_id("env-client")
            .client_secret("env-secret")
            .debug(false);
        let partial = PartialConfig::default().mode(Mode::Live).client_id("caller-id").debug(true);

        let config = ClientConfig::resolve(partial, defaults).unwrap();
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.client_id, "caller-id");
        assert_eq!(config.client_secret, "env-secret");
        assert!(config.debug);
    }

    #[test]
    fn test_short_credentials_rejected() {
        let result = ClientConfig::resolve(
            PartialConfig::default().client_id("abcd").client_secret("secret"),
            PartialConfig::default(),
        );
        assert_eq!(
            result,
            Err(ConfigError::CredentialTooShort {
                field: "client_id",
                min: 5,
                actual: 4
            })
        );

        let config = ClientConfig::new(Mode::Live, "client", "1234");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CredentialTooShort { field: "client_secret", .. })
        ));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = ClientConfig::resolve(
            PartialConfig::default().client_id("client"),
            PartialConfig::default(),
        );
        assert_eq!(result, Err(ConfigError::missing_field("client_secret")));
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = ClientConfig::new(Mode::Uat, "client", "super-secret").with_debug(true);
        assert!(config.debug);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_partial_debug_output_redacts_secret() {
        let partial = PartialConfig::default().client_secret("super-secret");
        assert!(!format!("{:?}", partial).contains("super-secret"));
    }

    #[test]
    fn test_base_urls_gain_trailing_slash() {
        let urls = BaseUrls::parse("https://uat.example.com/api", "https://live.example.com/").unwrap();
        assert_eq!(urls.for_mode(Mode::Uat).as_str(), "https://uat.example.com/api/");
        assert_eq!(urls.for_mode(Mode::Live).as_str(), "https://live.example.com/");

        let joined = urls.for_mode(Mode::Uat).join("accounts/v1/oauth/token").unwrap();
        assert_eq!(joined.as_str(), "https://uat.example.com/api/accounts/v1/oauth/token");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = BaseUrls::parse("not a url", "https://live.example.com");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidBaseUrl { mode: Mode::Uat, .. })
        ));
    }

    #[test]
    fn test_settings_load_from_source() {
        let settings = Settings::load(env_source(&[
            ("MOMO_MODE", "live"),
            ("MOMO_CLIENT_ID", "env-client"),
            ("MOMO_CLIENT_SECRET", "env-secret"),
            ("MOMO_DEBUG", "true"),
            ("MOMO_UAT_BASE_URL", "https://uat.example.com"),
            ("MOMO_LIVE_BASE_URL", "https://live.example.com"),
        ]))
        .unwrap();

        assert_eq!(settings.defaults.mode, Some(Mode::Live));
        assert_eq!(settings.defaults.debug, Some(true));

        let config = settings.resolve(PartialConfig::default()).unwrap();
        assert_eq!(config.client_id, "env-client");
        assert_eq!(
            settings.base_urls.for_mode(config.mode).as_str(),
            "https://live.example.com/"
        );
    }

    #[test]
    fn test_settings_reject_invalid_mode() {
        let result = Settings::load(env_source(&[
            ("MOMO_MODE", "staging"),
            ("MOMO_UAT_BASE_URL", "https://uat.example.com"),
            ("MOMO_LIVE_BASE_URL", "https://live.example.com"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_require_base_urls() {
        let result = Settings::load(env_source(&[("MOMO_CLIENT_ID", "env-client")]));
        assert!(result.is_err());
    }
}
