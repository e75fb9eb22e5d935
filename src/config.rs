use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";

/// Server settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `HOST`, `PORT` and `STATIC_DIR` through `lookup`. Unset or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = lookup("HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.host);
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            host,
            port,
            static_dir,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.socket_addr_with_port(self.port)
    }

    pub fn fallback_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let port = self
            .port
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("no fallback port above {}", self.port))?;
        self.socket_addr_with_port(port)
    }

    fn socket_addr_with_port(&self, port: u16) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("cannot parse listen address {}: {}", addr, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9100"),
            ("STATIC_DIR", "/srv/www"),
        ]));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.socket_addr().unwrap().port(), 9100);
        assert_eq!(config.fallback_socket_addr().unwrap().port(), 9101);
    }

    #[test]
    fn highest_port_has_no_fallback() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "65535")]));
        assert_eq!(config.socket_addr().unwrap().port(), 65535);
        assert!(config.fallback_socket_addr().is_err());
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn unparseable_host_is_an_error() {
        let config = AppConfig::from_lookup(lookup(&[("HOST", "not a host")]));
        assert!(config.socket_addr().is_err());
    }
}
