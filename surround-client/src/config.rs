use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Runtime settings, read from the environment with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub estimate_trials: u32,
    pub estimate_tolerance: f32,
    pub tick: Duration,
    /// Milliseconds the server clock runs ahead of ours.
    pub server_time_offset_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            estimate_trials: 1000,
            estimate_tolerance: 0.3,
            tick: Duration::from_millis(1000),
            server_time_offset_ms: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Config::default();
        let tick_ms = parse_or(
            &lookup,
            "SURROUND_TICK_MS",
            defaults.tick.as_millis() as u64,
        )?;
        if tick_ms == 0 {
            return Err(AppError::Config("SURROUND_TICK_MS must be positive".to_string()));
        }
        Ok(Config {
            estimate_trials: parse_or(&lookup, "SURROUND_ESTIMATE_TRIALS", defaults.estimate_trials)?,
            estimate_tolerance: parse_or(
                &lookup,
                "SURROUND_ESTIMATE_TOLERANCE",
                defaults.estimate_tolerance,
            )?,
            tick: Duration::from_millis(tick_ms),
            server_time_offset_ms: parse_or(
                &lookup,
                "SURROUND_SERVER_TIME_OFFSET_MS",
                defaults.server_time_offset_ms,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key}: cannot parse {raw:?}"))),
        None => Ok(default),
    }
}
