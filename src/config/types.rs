// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration, all durations in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// How long shutdown waits for open connections
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Twitter connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TwitterConfig {
    pub provider_id: String,
    pub api_base_url: String,
    /// Timeout for each API request, in seconds
    pub request_timeout: u64,
    /// Local user every request is served for
    pub user_id: String,
    /// Seeded connections, one `[[twitter.connections]]` table each
    #[serde(default)]
    pub connections: Vec<SeededConnection>,
}

/// Access token stored for a local user at startup
///
/// The user id is a value rather than a table key so its case survives loading.
#[derive(Debug, Deserialize, Clone)]
pub struct SeededConnection {
    pub user_id: String,
    pub access_token: String,
}

/// Template configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplatesConfig {
    /// Directory with `.hbs` files that replace the built-in templates
    #[serde(default)]
    pub dir: Option<String>,
}
