//! Configuration schema definitions.
//!
//! All fields have defaults so a minimal (even empty) config file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Address to listen on (e.g., "0.0.0.0").
    pub listen_addr: String,

    /// Port to listen on.
    pub listen_port: u16,

    /// Address of the relay target.
    pub target_addr: String,

    /// Port of the relay target.
    pub target_port: u16,

    /// Maximum concurrent connections; new connections beyond this are
    /// rejected, not queued.
    pub max_conns: u64,

    /// Lifetime cap per connection in seconds, applied as one absolute
    /// deadline at connection start. 0 disables it.
    pub idle_timeout_secs: u64,

    /// Timeout for dialing the target in seconds. 0 disables it.
    pub connect_timeout_secs: u64,

    /// How long shutdown waits for in-flight connections to drain.
    pub shutdown_grace_secs: u64,

    /// Log level: debug, info, warn or error.
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 4000,
            target_addr: "127.0.0.1".to_string(),
            target_port: 5000,
            max_conns: 200,
            idle_timeout_secs: 60,
            connect_timeout_secs: 5,
            shutdown_grace_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl RelayConfig {
    /// Listen address in `host:port` form.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Target address in `host:port` form.
    pub fn target_address(&self) -> String {
        format!("{}:{}", self.target_addr, self.target_port)
    }

    /// Connection lifetime cap, if configured.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    /// Dial timeout, if configured.
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }

    /// Shutdown drain window.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_conventions() {
        let config = RelayConfig::default();
        assert_eq!(config.listen_address(), "0.0.0.0:4000");
        assert_eq!(config.target_address(), "127.0.0.1:5000");
        assert_eq!(config.max_conns, 200);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            listen_port = 9000
            target_addr = "10.0.0.1"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.target_addr, "10.0.0.1");
        assert_eq!(config.target_port, 5000);
        assert_eq!(config.idle_timeout_secs, 60);
    }

    #[test]
    fn zero_timeouts_disable_them() {
        let config = RelayConfig {
            idle_timeout_secs: 0,
            connect_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.idle_timeout().is_none());
        assert!(config.connect_timeout().is_none());
    }
}
