use serde::Deserialize;

/// Main configuration structure for reichelt-api
///
/// Every section is optional; a missing file section falls back to the
/// defaults that talk to the live vendor site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the vendor lives
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    /// Scheme and host of the vendor site, without trailing path
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every vendor request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Dispatcher settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the dispatcher binds to
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.reichelt.de".to_string()
}

fn default_user_agent() -> String {
    format!("reichelt-api/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}
