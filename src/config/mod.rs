// Configuration module entry point
// Loads application configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    TemplatesConfig, TwitterConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error; `HELLO_*` environment variables override
    /// file values, with `__` separating nested keys (`HELLO_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "twitter-hello/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("twitter.provider_id", "twitter")?
            .set_default("twitter.api_base_url", "https://api.twitter.com")?
            .set_default("twitter.request_timeout", 10)?
            .set_default("twitter.user_id", "testuser")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("HELLO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does/not/exist").unwrap();
        assert_eq!(cfg.twitter.provider_id, "twitter");
        assert_eq!(cfg.twitter.api_base_url, "https://api.twitter.com");
        assert!(cfg.twitter.connections.is_empty());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.shutdown_timeout, 10);
        assert!(cfg.http.health.enabled);
        assert_eq!(cfg.http.health.liveness_path, "/healthz");
        assert!(cfg.templates.dir.is_none());
    }

    #[test]
    fn test_file_values_and_connections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hello.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9090

[twitter]
user_id = "Ada"

[[twitter.connections]]
user_id = "Ada"
access_token = "token-ada"

[templates]
dir = "custom"
"#,
        )
        .unwrap();

        let base = path.with_extension("");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.twitter.user_id, "Ada");
        assert_eq!(cfg.twitter.connections.len(), 1);
        assert_eq!(cfg.twitter.connections[0].user_id, "Ada");
        assert_eq!(cfg.twitter.connections[0].access_token, "token-ada");
        assert_eq!(cfg.templates.dir.as_deref(), Some("custom"));
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:9090".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut cfg = Config::load_from("does/not/exist").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
