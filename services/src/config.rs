use debug_api_table::{DownloadDelivery, TableConfig, Tz, parse_timezone};
use serde::Deserialize;
use std::env::vars;
use std::fmt::Display;
use tracing::info;

/// Route that serves downloadable thing columns by reference.
pub const THING_DOWNLOAD_PATH: &str = "/_fake/admin/things/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Env {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "prod")]
    Prod,
}

impl Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Test => write!(f, "test"),
            Env::Prod => write!(f, "prod"),
        }
    }
}

/// How downloadable cells reach the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DeliveryMode {
    #[serde(rename = "embedded")]
    Embedded,
    #[serde(rename = "reference")]
    Reference,
}

// The final, validated configuration struct.
#[derive(Debug, Clone)]
pub struct Config {
    env: Env,
    server_addr: String,
    port: u16,
    // Ambient display timezone for admin pages; UTC when unset.
    display_timezone: Option<Tz>,
    downloadable_columns: Option<Vec<String>>,
    download_delivery: DeliveryMode,
    max_embedded_download_bytes: usize,
}

// An intermediate struct for deserializing environment variables.
#[derive(Deserialize)]
struct RawConfig {
    env: Env,
    server_addr: Option<String>,
    port: Option<u16>,
    display_timezone: Option<String>,
    // Comma separated column names.
    downloadable_columns: Option<String>,
    download_delivery: Option<DeliveryMode>,
    max_embedded_download_bytes: Option<usize>,
}

impl Config {
    /// Create a test configuration with default values.
    ///
    /// This function is available for both unit tests and integration tests.
    /// It should not be used in production code.
    pub fn new_for_test() -> Self {
        Self {
            env: Env::Local,
            server_addr: "127.0.0.1".to_owned(),
            port: 8080,
            display_timezone: None,
            downloadable_columns: None,
            download_delivery: DeliveryMode::Embedded,
            max_embedded_download_bytes: debug_api_table::config::DEFAULT_MAX_EMBEDDED_BYTES,
        }
    }

    /// Test configuration with reference downloads.
    pub fn new_for_test_with_reference_downloads() -> Self {
        Self {
            download_delivery: DeliveryMode::Reference,
            ..Self::new_for_test()
        }
    }

    /// Test configuration with an ambient display timezone.
    pub fn new_for_test_with_timezone(timezone: Tz) -> Self {
        Self {
            display_timezone: Some(timezone),
            ..Self::new_for_test()
        }
    }

    pub fn environment(&self) -> &Env {
        &self.env
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_local(&self) -> bool {
        matches!(self.env, Env::Local)
    }

    pub fn display_timezone(&self) -> Option<Tz> {
        self.display_timezone
    }

    pub fn download_delivery(&self) -> DeliveryMode {
        self.download_delivery
    }

    /// Renderer settings derived from this configuration.
    pub fn table_config(&self) -> TableConfig {
        let delivery = match self.download_delivery {
            DeliveryMode::Embedded => DownloadDelivery::Embedded {
                max_bytes: self.max_embedded_download_bytes,
            },
            DeliveryMode::Reference => DownloadDelivery::Reference {
                href_base: THING_DOWNLOAD_PATH.to_owned(),
                key_column: "thing_id".to_owned(),
            },
        };
        let config = TableConfig::default().with_download_delivery(delivery);
        match &self.downloadable_columns {
            Some(columns) => config.with_downloadable_columns(columns.iter().cloned()),
            None => config,
        }
    }

    /// Initializes configuration by reading from environment variables
    /// and applying environment-aware defaults.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");

        let raw_config: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            env,
            server_addr,
            port,
            display_timezone,
            downloadable_columns,
            download_delivery,
            max_embedded_download_bytes,
        } = raw_config;

        let server_addr = match server_addr {
            Some(addr) => {
                info!("Using provided SERVER_ADDR: {}", addr);
                addr
            }
            None => {
                let default_addr = match env {
                    Env::Local => "127.0.0.1",
                    _ => "0.0.0.0",
                };
                info!(
                    "SERVER_ADDR not set, defaulting to {} for {} environment",
                    default_addr, env
                );
                default_addr.to_owned()
            }
        };

        let port = match port {
            Some(port) => port,
            None if matches!(env, Env::Local | Env::Test) => {
                info!("PORT not set, defaulting to 8080 for {} environment", env);
                8080
            }
            None => anyhow::bail!("PORT must be set for {} environment", env),
        };

        // The only process-wide read of the display timezone.
        let display_timezone = display_timezone
            .filter(|name| !name.trim().is_empty())
            .map(|name| parse_timezone(&name))
            .transpose()?;

        let downloadable_columns = downloadable_columns.map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        });

        let max_embedded_download_bytes = max_embedded_download_bytes
            .unwrap_or(debug_api_table::config::DEFAULT_MAX_EMBEDDED_BYTES);

        Ok(Config {
            env,
            server_addr,
            port,
            display_timezone,
            downloadable_columns,
            download_delivery: download_delivery.unwrap_or(DeliveryMode::Embedded),
            max_embedded_download_bytes,
        })
    }
}
