//! Application settings loaded via OrthoConfig.
//!
//! Every value may be set through a `MOTOFINANCE_*` environment variable or
//! the matching command-line flag.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SMS_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SIGNATURE: &str = "MotoFinance";

/// Errors raised when settings are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("MOTOFINANCE_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid SMS gateway URL '{value}': {source}")]
    InvalidGatewayUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("MOTOFINANCE_SMS_API_KEY must be set when a gateway URL is configured")]
    MissingApiKey,
}

/// Runtime configuration for the server and the SMS sweep.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOTOFINANCE")]
pub struct AppSettings {
    /// Interface to bind.
    #[ortho_config(default = DEFAULT_HOST.to_owned())]
    pub host: String,
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Pool size.
    #[ortho_config(default = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
    /// SMS provider endpoint. Messages are only logged when unset.
    pub sms_gateway_url: Option<String>,
    pub sms_api_key: Option<String>,
    pub sms_sender_id: Option<String>,
    /// Signature appended to automated messages.
    #[ortho_config(default = DEFAULT_SIGNATURE.to_owned())]
    pub sms_signature: String,
    #[ortho_config(default = DEFAULT_SMS_TIMEOUT_SECS)]
    pub sms_timeout_secs: u64,
}

/// Endpoint and credentials for the HTTP SMS provider.
#[derive(Debug, Clone)]
pub struct SmsGatewaySettings {
    pub endpoint: Url,
    pub api_key: String,
    pub sender_id: Option<String>,
    pub timeout: Duration,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn sms_signature(&self) -> &str {
        &self.sms_signature
    }

    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Provider settings, or `None` when no gateway URL is configured.
    ///
    /// # Errors
    ///
    /// Fails when the URL does not parse or the API key is missing.
    pub fn sms_gateway(&self) -> Result<Option<SmsGatewaySettings>, SettingsError> {
        let Some(raw) = self.sms_gateway_url.as_deref().filter(|url| !url.trim().is_empty())
        else {
            return Ok(None);
        };
        let endpoint = Url::parse(raw).map_err(|source| SettingsError::InvalidGatewayUrl {
            value: raw.to_owned(),
            source,
        })?;
        let api_key = self
            .sms_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)?;
        Ok(Some(SmsGatewaySettings {
            endpoint,
            api_key,
            sender_id: self.sms_sender_id.clone(),
            timeout: Duration::from_secs(self.sms_timeout_secs),
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "MOTOFINANCE_HOST",
        "MOTOFINANCE_PORT",
        "MOTOFINANCE_DATABASE_URL",
        "MOTOFINANCE_DB_MAX_CONNECTIONS",
        "MOTOFINANCE_SMS_GATEWAY_URL",
        "MOTOFINANCE_SMS_API_KEY",
        "MOTOFINANCE_SMS_SENDER_ID",
        "MOTOFINANCE_SMS_SIGNATURE",
        "MOTOFINANCE_SMS_TIMEOUT_SECS",
    ];

    fn load_with(overrides: &[(&'static str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("motofinance")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.db_max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.sms_signature(), "MotoFinance");
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert!(settings.sms_gateway().expect("no gateway is fine").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("MOTOFINANCE_PORT", "9090"),
            ("MOTOFINANCE_DATABASE_URL", "postgres://localhost/motofinance"),
            ("MOTOFINANCE_SMS_GATEWAY_URL", "https://sms.example.com/send"),
            ("MOTOFINANCE_SMS_API_KEY", "key"),
            ("MOTOFINANCE_SMS_TIMEOUT_SECS", "3"),
            ("MOTOFINANCE_SMS_SIGNATURE", "Moto Ltd"),
        ]);
        assert_eq!(settings.port(), 9090);
        assert_eq!(
            settings.database_url().expect("url set"),
            "postgres://localhost/motofinance"
        );
        assert_eq!(settings.sms_signature(), "Moto Ltd");
        let gateway = settings
            .sms_gateway()
            .expect("valid gateway")
            .expect("gateway configured");
        assert_eq!(gateway.endpoint.host_str(), Some("sms.example.com"));
        assert_eq!(gateway.timeout, Duration::from_secs(3));
    }

    #[rstest]
    fn gateway_timeout_defaults_when_unset() {
        let settings = load_with(&[
            ("MOTOFINANCE_SMS_GATEWAY_URL", "https://sms.example.com/send"),
            ("MOTOFINANCE_SMS_API_KEY", "key"),
        ]);
        let gateway = settings
            .sms_gateway()
            .expect("valid gateway")
            .expect("gateway configured");
        assert_eq!(gateway.timeout, Duration::from_secs(DEFAULT_SMS_TIMEOUT_SECS));
    }

    #[rstest]
    fn gateway_without_key_is_rejected() {
        let settings = load_with(&[("MOTOFINANCE_SMS_GATEWAY_URL", "https://sms.example.com")]);
        assert!(matches!(
            settings.sms_gateway(),
            Err(SettingsError::MissingApiKey)
        ));
    }

    #[rstest]
    fn malformed_gateway_url_is_rejected() {
        let settings = load_with(&[
            ("MOTOFINANCE_SMS_GATEWAY_URL", "not a url"),
            ("MOTOFINANCE_SMS_API_KEY", "key"),
        ]);
        assert!(matches!(
            settings.sms_gateway(),
            Err(SettingsError::InvalidGatewayUrl { .. })
        ));
    }
}
