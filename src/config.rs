use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Default location of the configuration file (extension optional).
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    pub returns: ReturnsConfig,
    pub actions: ActionsConfig,
    pub processing: ProcessingConfig,
    pub wardrobing: WardrobingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReturnsConfig {
    /// Length of the return window in days, counted from the received date
    pub window_days: i64,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self { window_days: 30 }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ActionsConfig {
    pub unknown_code: UnknownCodePolicy,
}

/// What the action decoder does with a code outside the 1..=5 table
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCodePolicy {
    #[default]
    Reject,
    Skip,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProcessingConfig {
    pub delay_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WardrobingConfig {
    pub max_amount: f64,
    pub max_failed_attempts: u32,
    pub max_return_rate: f64,
    pub high_risk_ranges: Vec<IpRange>,
}

impl Default for WardrobingConfig {
    fn default() -> Self {
        Self {
            max_amount: 1000.0,
            max_failed_attempts: 3,
            max_return_rate: 0.7,
            high_risk_ranges: vec![
                IpRange::new("192.168.1.0", "192.168.1.255"),
                IpRange::new("203.0.113.0", "203.0.113.255"),
                IpRange::new("45.134.56.0", "45.134.56.255"),
            ],
        }
    }
}

/// Inclusive IPv4 range, kept as strings so it survives env/TOML layering
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IpRange {
    pub start: String,
    pub end: String,
}

impl IpRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn bounds(&self) -> anyhow::Result<(Ipv4Addr, Ipv4Addr)> {
        let start: Ipv4Addr = self
            .start
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid range start '{}': {}", self.start, e))?;
        let end: Ipv4Addr = self
            .end
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid range end '{}': {}", self.end, e))?;
        if start > end {
            anyhow::bail!("Range start {} is after end {}", start, end);
        }
        Ok((start, end))
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("RETURNWISE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.returns.window_days < 0 {
            anyhow::bail!("returns.window_days must be non-negative");
        }
        if !(0.0..=1.0).contains(&self.wardrobing.max_return_rate) {
            anyhow::bail!("wardrobing.max_return_rate must be within 0..=1");
        }
        for range in &self.wardrobing.high_risk_ranges {
            range.bounds()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.returns.window_days, 30);
        assert_eq!(config.processing.delay_ms, 2000);
        assert_eq!(config.actions.unknown_code, UnknownCodePolicy::Reject);
        assert_eq!(config.wardrobing.high_risk_ranges.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[returns]
window_days = 14

[actions]
unknown_code = "skip"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.returns.window_days, 14);
        assert_eq!(config.actions.unknown_code, UnknownCodePolicy::Skip);
        // untouched sections keep their defaults
        assert_eq!(config.processing.delay_ms, 2000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.returns.window_days, 30);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut config = Config::default();
        config.wardrobing.high_risk_ranges = vec![IpRange::new("10.0.0.9", "10.0.0.1")];
        assert!(config.validate().is_err());

        config.wardrobing.high_risk_ranges = vec![IpRange::new("not-an-ip", "10.0.0.1")];
        assert!(config.validate().is_err());
    }
}
