//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};
use serde::Serialize;

const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, as written to the access log
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Local user the request was served for, when one was resolved
    pub user_id: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            user_id: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `$remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - {} [{}] \"{}\" {} {}",
            self.remote_addr,
            self.user_id.as_deref().unwrap_or("-"),
            self.time.format(CLF_TIME_FORMAT),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Common format followed by `"$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr`, `$remote_user`
    /// - `$time_local`, `$time_iso8601`
    /// - `$request`, `$request_method`, `$request_uri`, `$request_time` (seconds)
    /// - `$status`, `$body_bytes_sent`
    /// - `$http_referer`, `$http_user_agent`
    ///
    /// The pattern is scanned once; substituted values are never expanded
    /// again. Unknown variables are kept as written.
    fn format_custom(&self, pattern: &str) -> String {
        let mut line = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            line.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..name_len];

            match self.variable(name) {
                Some(value) => line.push_str(&value),
                None => {
                    line.push('$');
                    line.push_str(name);
                }
            }
            rest = &after[name_len..];
        }
        line.push_str(rest);
        line
    }

    fn variable(&self, name: &str) -> Option<String> {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "remote_user" => or_dash(&self.user_id),
            "time_local" => self.time.format(CLF_TIME_FORMAT).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => self.request_line(),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let secs = self.request_time_us as f64 / 1_000_000.0;
                format!("{secs:.3}")
            }
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => or_dash(&self.referer),
            "http_user_agent" => or_dash(&self.user_agent),
            _ => return None,
        };
        Some(value)
    }
}
