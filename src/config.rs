use crate::errors::{EngineError, EngineResult};
use std::path::PathBuf;

/// Minimum EV (strictly exceeded) for each bet type to be recommended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvThresholds {
    pub moneyline: f64,
    pub spread: f64,
    pub total: f64,
    pub prop: f64,
}

impl Default for EvThresholds {
    fn default() -> Self {
        Self {
            moneyline: 0.10,
            spread: 0.12,
            total: 0.12,
            prop: 0.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub snapshot_path: PathBuf,
    pub scan_interval_secs: u64,
    pub scan_workers: usize,
    pub top_n: usize,
    pub thresholds: EvThresholds,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let scan_interval_secs = env_var_or("SCAN_INTERVAL_SECS", "30")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("SCAN_INTERVAL_SECS: {e}")))?;

        let scan_workers = env_var_or("SCAN_WORKERS", "4")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("SCAN_WORKERS: {e}")))?;

        let top_n = env_var_or("TOP_N", "10")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("TOP_N: {e}")))?;

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        if scan_interval_secs == 0 {
            return Err(EngineError::Config("SCAN_INTERVAL_SECS must be > 0".into()));
        }

        let defaults = EvThresholds::default();
        let thresholds = EvThresholds {
            moneyline: threshold_var("ML_EV_THRESHOLD", defaults.moneyline)?,
            spread: threshold_var("SPREAD_EV_THRESHOLD", defaults.spread)?,
            total: threshold_var("TOTAL_EV_THRESHOLD", defaults.total)?,
            prop: threshold_var("PROP_EV_THRESHOLD", defaults.prop)?,
        };

        Ok(Self {
            snapshot_path: PathBuf::from(env_var_or("SNAPSHOT_PATH", "data/snapshot.json")),
            scan_interval_secs,
            scan_workers: scan_workers.max(1),
            top_n,
            thresholds,
            server_port,
        })
    }
}

fn threshold_var(key: &str, default: f64) -> EngineResult<f64> {
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|e| EngineError::Config(format!("{key}: {e}")))?;
            if !value.is_finite() {
                return Err(EngineError::Config(format!("{key}: must be finite")));
            }
            Ok(value)
        }
        Err(_) => Ok(default),
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = EvThresholds::default();
        assert_eq!(t.moneyline, 0.10);
        assert_eq!(t.spread, 0.12);
        assert_eq!(t.total, 0.12);
        assert_eq!(t.prop, 0.15);
    }

    #[test]
    fn test_threshold_var_falls_back_when_unset() {
        let v = threshold_var("EV_RANKER_TEST_UNSET_THRESHOLD", 0.42).unwrap();
        assert_eq!(v, 0.42);
    }
}
