use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
pub const DEFAULT_MAX_WINDOWS_PER_DAY: usize = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_windows_per_day: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_windows_per_day: DEFAULT_MAX_WINDOWS_PER_DAY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = match env::var("API_HOST") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("API_HOST '{}' is not an IP address, using {}", raw, defaults.host);
                defaults.host
            }),
            Err(_) => {
                warn!("API_HOST not set, using {}", defaults.host);
                defaults.host
            }
        };

        let port = match env::var("API_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("API_PORT '{}' is not a valid port, using {}", raw, defaults.port);
                defaults.port
            }),
            Err(_) => {
                warn!("API_PORT not set, using {}", defaults.port);
                defaults.port
            }
        };

        let max_windows_per_day = match env::var("MAX_WINDOWS_PER_DAY") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    warn!(
                        "MAX_WINDOWS_PER_DAY '{}' must be a positive integer, using {}",
                        raw, defaults.max_windows_per_day
                    );
                    defaults.max_windows_per_day
                }
                Ok(value) => value,
            },
            Err(_) => defaults.max_windows_per_day,
        };

        Self {
            host,
            port,
            max_windows_per_day,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_all_interfaces_on_3000() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr(), SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(config.max_windows_per_day, DEFAULT_MAX_WINDOWS_PER_DAY);
    }
}
