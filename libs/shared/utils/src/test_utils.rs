use std::sync::Arc;

use shared_config::AppConfig;

pub struct TestConfig {
    pub port: u16,
    pub max_windows_per_day: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            port: 0,
            max_windows_per_day: 8,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            port: self.port,
            max_windows_per_day: self.max_windows_per_day,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Builds an `application/x-www-form-urlencoded` body the way a browser would.
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Adds the six fields of one `start`/`end` window under `day.index`.
    pub fn window(
        self,
        day: &str,
        index: usize,
        start: (u8, u8, &str),
        end: (u8, u8, &str),
    ) -> Self {
        let prefix = format!("{}.{}", day, index);
        self.field(format!("{}.start.hour", prefix), start.0.to_string())
            .field(format!("{}.start.minute", prefix), start.1.to_string())
            .field(format!("{}.start.meridiem", prefix), start.2)
            .field(format!("{}.end.hour", prefix), end.0.to_string())
            .field(format!("{}.end.minute", prefix), end.1.to_string())
            .field(format!("{}.end.meridiem", prefix), end.2)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Default for FormBody {
    fn default() -> Self {
        Self::new()
    }
}
