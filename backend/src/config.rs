use std::env;
use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use shared::constants::DISCORD_WEBHOOK_BASE;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_FRONTEND_DIST: &str = "../frontend/dist";

/// Discord integration settings. All three values are needed for the
/// integration to be offered at all.
#[derive(Clone, Default)]
pub struct NotifierConfig {
    pub webhook_id: Option<String>,
    pub webhook_token: Option<String>,
    pub totp_secret: Option<String>,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("webhook_id", &self.webhook_id)
            .field("webhook_token", &self.webhook_token.as_ref().map(|_| "<set>"))
            .field("totp_secret", &self.totp_secret.as_ref().map(|_| "<set>"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        Self {
            webhook_id: non_empty_var("DISCORD_WEBHOOK_ID"),
            webhook_token: non_empty_var("DISCORD_WEBHOOK_TOKEN"),
            totp_secret: non_empty_var("DISCORD_TOTP_SECRET"),
        }
    }

    pub fn enabled(&self) -> bool {
        self.webhook_url().is_some() && self.totp_secret.is_some()
    }

    pub fn webhook_url(&self) -> Option<String> {
        match (&self.webhook_id, &self.webhook_token) {
            (Some(id), Some(token)) => Some(format!("{}/{}/{}", DISCORD_WEBHOOK_BASE, id, token)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAddr(&'static str, AddrParseError),
    SetupNotLoopback(SocketAddr),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAddr(name, e) => write!(f, "{} is not a valid socket address: {}", name, e),
            ConfigError::SetupNotLoopback(addr) => {
                write!(f, "TOTP_SETUP_ADDR must be a loopback address, got {}", addr)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub frontend_dist: PathBuf,
    /// Separate loopback listener for the authenticator setup page. Off unless set.
    pub totp_setup_addr: Option<SocketAddr>,
    /// Take the client address from proxy headers for visit logging.
    pub trust_proxy_headers: bool,
}

fn parse_addr(name: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|e| ConfigError::InvalidAddr(name, e))
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            non_empty_var("BIND_ADDR"),
            non_empty_var("FRONTEND_DIST"),
            non_empty_var("TOTP_SETUP_ADDR"),
            non_empty_var("TRUST_PROXY_HEADERS"),
        )
    }

    fn from_values(
        bind_addr: Option<String>,
        frontend_dist: Option<String>,
        totp_setup_addr: Option<String>,
        trust_proxy_headers: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = parse_addr("BIND_ADDR", bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR))?;
        let frontend_dist = frontend_dist
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIST));

        let totp_setup_addr = match totp_setup_addr {
            Some(value) => {
                let addr = parse_addr("TOTP_SETUP_ADDR", &value)?;
                if !addr.ip().is_loopback() {
                    return Err(ConfigError::SetupNotLoopback(addr));
                }
                Some(addr)
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            frontend_dist,
            totp_setup_addr,
            trust_proxy_headers: parse_flag(trust_proxy_headers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> NotifierConfig {
        NotifierConfig {
            webhook_id: Some("123".to_string()),
            webhook_token: Some("abc".to_string()),
            totp_secret: Some("GEZDGNBVGY3TQOJQ".to_string()),
        }
    }

    #[test]
    fn test_enabled_needs_all_three() {
        assert!(full().enabled());

        let mut missing_secret = full();
        missing_secret.totp_secret = None;
        assert!(!missing_secret.enabled());

        let mut missing_token = full();
        missing_token.webhook_token = None;
        assert!(!missing_token.enabled());
        assert_eq!(missing_token.webhook_url(), None);

        assert!(!NotifierConfig::default().enabled());
    }

    #[test]
    fn test_webhook_url() {
        assert_eq!(
            full().webhook_url().as_deref(),
            Some("https://discord.com/api/webhooks/123/abc")
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let printed = format!("{:?}", full());
        assert!(!printed.contains("abc"));
        assert!(!printed.contains("GEZD"));
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_values(None, None, None, None).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.frontend_dist, PathBuf::from("../frontend/dist"));
        assert_eq!(config.totp_setup_addr, None);
        assert!(!config.trust_proxy_headers);
    }

    #[test]
    fn test_setup_listener_must_be_loopback() {
        let config = ServerConfig::from_values(None, None, Some("127.0.0.1:3001".to_string()), None).unwrap();
        assert_eq!(config.totp_setup_addr, Some("127.0.0.1:3001".parse().unwrap()));

        let public = ServerConfig::from_values(None, None, Some("0.0.0.0:3001".to_string()), None);
        assert!(matches!(public, Err(ConfigError::SetupNotLoopback(_))));

        let garbage = ServerConfig::from_values(None, None, Some("nope".to_string()), None);
        assert!(matches!(garbage, Err(ConfigError::InvalidAddr("TOTP_SETUP_ADDR", _))));
    }

    #[test]
    fn test_proxy_flag() {
        assert!(parse_flag(Some("TRUE".to_string())));
        assert!(parse_flag(Some("1".to_string())));
        assert!(!parse_flag(Some("0".to_string())));
        assert!(!parse_flag(None));
    }
}
