use crate::credential_gate::{Identity, default_identities};
use anyhow::{Context, Result, ensure};
use reqwest::Url;
use std::{env, sync::OnceLock};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Target device configuration
    pub device: DeviceConfig,

    /// Operators allowed to log in
    pub operator: OperatorConfig,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct OperatorConfig {
    pub identities: Vec<Identity>,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// On first call, it loads and validates all configuration from
    /// environment variables. Subsequent calls return the cached instance.
    pub fn load() -> Result<&'static Self> {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

        if let Some(config) = APP_CONFIG.get() {
            return Ok(config);
        }

        let config = Self::load_internal()?;
        Ok(APP_CONFIG.get_or_init(|| config))
    }

    fn load_internal() -> Result<Self> {
        let device = DeviceConfig::load()?;
        let operator = OperatorConfig::load();

        Ok(Self { device, operator })
    }
}

impl DeviceConfig {
    pub const DEFAULT_BASE_URL: &str = "http://192.168.4.1";

    fn load() -> Result<Self> {
        let base_url =
            env::var("DEVICE_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());

        Self::from_base_url(&base_url)
    }

    /// Validate a device base address
    ///
    /// The address must be an absolute http(s) URL. A trailing slash is
    /// dropped so paths can be appended verbatim.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');

        let url = Url::parse(base_url)
            .with_context(|| format!("failed to parse DEVICE_BASE_URL: {base_url}"))?;

        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "failed to parse DEVICE_BASE_URL: unsupported scheme {}",
            url.scheme()
        );
        ensure!(
            url.host_str().is_some(),
            "failed to parse DEVICE_BASE_URL: missing host"
        );
        ensure!(
            url.query().is_none() && url.fragment().is_none(),
            "failed to parse DEVICE_BASE_URL: query or fragment not allowed"
        );

        Ok(Self {
            base_url: base_url.to_string(),
        })
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OperatorConfig {
    fn load() -> Self {
        Self {
            identities: default_identities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod device_config {
        use super::*;

        #[test]
        fn accepts_default_address() {
            let config = DeviceConfig::from_base_url("http://192.168.4.1").unwrap();
            assert_eq!(config.base_url, "http://192.168.4.1");
        }

        #[test]
        fn strips_trailing_slash() {
            let config = DeviceConfig::from_base_url("http://10.0.0.7:8080/").unwrap();
            assert_eq!(config.base_url, "http://10.0.0.7:8080");
        }

        #[test]
        fn rejects_missing_scheme() {
            let result = DeviceConfig::from_base_url("192.168.4.1");
            assert!(result.is_err());
        }

        #[test]
        fn rejects_non_http_scheme() {
            let result = DeviceConfig::from_base_url("ftp://192.168.4.1");
            assert!(
                result
                    .unwrap_err()
                    .to_string()
                    .contains("unsupported scheme")
            );
        }

        #[test]
        fn rejects_query_and_fragment() {
            for base_url in ["http://192.168.4.1/?a=b", "http://192.168.4.1#top"] {
                let result = DeviceConfig::from_base_url(base_url);
                assert!(
                    result
                        .unwrap_err()
                        .to_string()
                        .contains("query or fragment not allowed")
                );
            }
        }

        #[test]
        fn default_matches_constant() {
            assert_eq!(DeviceConfig::default().base_url, DeviceConfig::DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn operator_config_uses_default_identities() {
        assert_eq!(OperatorConfig::load().identities, default_identities());
    }
}
