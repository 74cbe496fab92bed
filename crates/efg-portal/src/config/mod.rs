use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::portal::{TermCode, TermCodeError};
use crate::widgets::WidgetSettings;

const DEFAULT_BANNER_BASE_URL: &str = "http://localhost:8080/BannerExtensibility/internalPb";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub banner: BannerConfig,
    pub portal: PortalConfig,
    pub widgets: WidgetSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let base_url = var_or("BANNER_BASE_URL", DEFAULT_BANNER_BASE_URL);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBannerUrl(base_url));
        }

        let default_term = TermCode::parse(&var_or("EFG_DEFAULT_TERM", crate::portal::DEFAULT_TERM))
            .map_err(ConfigError::InvalidDefaultTerm)?;

        let defaults = WidgetSettings::default();
        let widgets = WidgetSettings {
            recorder_event_code: var_or("NAME_RECORDER_EVENT_CODE", &defaults.recorder_event_code),
            recorder_access_token: var_or(
                "NAME_RECORDER_ACCESS_TOKEN",
                &defaults.recorder_access_token,
            ),
            brand_color: var_or("NAME_RECORDER_BRAND_COLOR", &defaults.brand_color),
            call_access_code: var_or("CALL_WIDGET_ACCESS_CODE", &defaults.call_access_code),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: false,
            },
            banner: BannerConfig { base_url },
            portal: PortalConfig { default_term },
            widgets,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Location of the Banner extensibility virtual domains.
#[derive(Debug, Clone)]
pub struct BannerConfig {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub default_term: TermCode,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBannerUrl(String),
    InvalidDefaultTerm(TermCodeError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBannerUrl(url) => {
                write!(f, "BANNER_BASE_URL must be an absolute http(s) url, found '{url}'")
            }
            ConfigError::InvalidDefaultTerm(err) => write!(f, "EFG_DEFAULT_TERM: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidBannerUrl(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidDefaultTerm(err) => Some(err),
        }
    }
}
