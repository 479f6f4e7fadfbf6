use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub upstream: UpstreamSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

/// Third-party balances APIs the proxy routes forward to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Base URL of the V2 balances API (Zapper).
    pub zapper_api_url: String,
    /// Value sent as `authorization: Basic <key>`.
    pub zapper_api_key: String,
    /// Base URL of the V3 NFT API (Moralis).
    pub moralis_api_url: String,
    /// Value sent as `X-API-Key`.
    pub moralis_api_key: String,
    pub timeout_seconds: u64,
}

/// Settings for the dashboard-side session that talks to the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub proxy_base_url: String,
    pub timeout_seconds: u64,
    /// Reject addresses whose 40-character body is not hex.
    pub strict_address_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api: ApiSettings::default(),
            upstream: UpstreamSettings::default(),
            client: ClientSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            zapper_api_url: "https://api.zapper.fi".to_string(),
            zapper_api_key: String::new(),
            moralis_api_url: "https://deep-index.moralis.io/api/v2".to_string(),
            moralis_api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            proxy_base_url: "http://localhost:3000".to_string(),
            timeout_seconds: 30,
            strict_address_format: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
        }
    }
}

/// Integer setting narrowed to `T`, rejecting values that do not fit.
fn int_setting<T: TryFrom<i64>>(source: &config::Config, key: &str) -> Result<T, config::ConfigError> {
    let value = source.get_int(key)?;
    T::try_from(value).map_err(|_| {
        config::ConfigError::Message(format!("{} is out of range: {}", key.to_uppercase(), value))
    })
}

impl Settings {
    /// Load settings from the process environment, falling back to defaults
    /// for anything unset.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let source = config::Config::builder()
            .set_default("api_host", defaults.api.host.clone())?
            .set_default("api_port", defaults.api.port as i64)?
            .set_default("zapper_api_url", defaults.upstream.zapper_api_url.clone())?
            .set_default("zapper_api_key", defaults.upstream.zapper_api_key.clone())?
            .set_default("moralis_api_url", defaults.upstream.moralis_api_url.clone())?
            .set_default("moralis_api_key", defaults.upstream.moralis_api_key.clone())?
            .set_default("upstream_timeout_seconds", defaults.upstream.timeout_seconds as i64)?
            .set_default("proxy_base_url", defaults.client.proxy_base_url.clone())?
            .set_default("proxy_timeout_seconds", defaults.client.timeout_seconds as i64)?
            .set_default("strict_address_format", defaults.client.strict_address_format)?
            .set_default("log_level", defaults.logging.level.clone())?
            .add_source(config::Environment::default())
            .build()?;

        Self::from_source(&source)
    }

    /// Read settings out of an already-built config source.
    pub fn from_source(source: &config::Config) -> Result<Self, config::ConfigError> {
        let settings = Settings {
            api: ApiSettings {
                host: source.get_string("api_host")?,
                port: int_setting(source, "api_port")?,
            },
            upstream: UpstreamSettings {
                zapper_api_url: source.get_string("zapper_api_url")?,
                zapper_api_key: source.get_string("zapper_api_key")?,
                moralis_api_url: source.get_string("moralis_api_url")?,
                moralis_api_key: source.get_string("moralis_api_key")?,
                timeout_seconds: int_setting(source, "upstream_timeout_seconds")?,
            },
            client: ClientSettings {
                proxy_base_url: source.get_string("proxy_base_url")?,
                timeout_seconds: int_setting(source, "proxy_timeout_seconds")?,
                strict_address_format: source.get_bool("strict_address_format")?,
            },
            logging: LoggingSettings {
                level: source.get_string("log_level")?,
            },
        };

        Ok(settings)
    }

    /// Call once logging is up.
    pub fn log_missing_credentials(&self) {
        if self.upstream.zapper_api_key.is_empty() {
            warn!("ZAPPER_API_KEY is not set; V2 balance requests will be rejected upstream");
        }
        if self.upstream.moralis_api_key.is_empty() {
            warn!("MORALIS_API_KEY is not set; V3 position requests will be rejected upstream");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.port, 3000);
        assert_eq!(settings.upstream.timeout_seconds, 30);
        assert!(!settings.client.strict_address_format);
        assert!(settings.upstream.zapper_api_url.starts_with("https://"));
        assert_eq!(settings.client.timeout_seconds, 30);
    }

    fn source_with(key: &str, value: i64) -> config::Config {
        config::Config::builder()
            .set_default("api_host", "0.0.0.0").unwrap()
            .set_default("api_port", 3000i64).unwrap()
            .set_default("zapper_api_url", "https://api.zapper.fi").unwrap()
            .set_default("zapper_api_key", "").unwrap()
            .set_default("moralis_api_url", "https://deep-index.moralis.io/api/v2").unwrap()
            .set_default("moralis_api_key", "").unwrap()
            .set_default("upstream_timeout_seconds", 30i64).unwrap()
            .set_default("proxy_base_url", "http://localhost:3000").unwrap()
            .set_default("proxy_timeout_seconds", 30i64).unwrap()
            .set_default("strict_address_format", false).unwrap()
            .set_default("log_level", "info").unwrap()
            .set_override(key, value).unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_in_range_values_are_read() {
        let settings = Settings::from_source(&source_with("api_port", 8080)).unwrap();
        assert_eq!(settings.api.port, 8080);
        assert_eq!(settings.upstream.timeout_seconds, 30);
    }

    #[test]
    fn test_port_above_u16_is_rejected() {
        let err = Settings::from_source(&source_with("api_port", 70000)).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }

    #[test]
    fn test_negative_timeouts_are_rejected() {
        assert!(Settings::from_source(&source_with("upstream_timeout_seconds", -5)).is_err());
        assert!(Settings::from_source(&source_with("proxy_timeout_seconds", -1)).is_err());
    }
}
