//! Simulation settings read from an optional TOML file.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Settings that drive a headless run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    /// Fixed steps per simulated second.
    pub(crate) tick_hz: f64,
    /// Upper bound on the number of steps before the run stops.
    pub(crate) max_ticks: u64,
    /// Starts the invasion before the first step.
    pub(crate) auto_start: bool,
    /// Pulls the next wave forward whenever the field is clear.
    pub(crate) send_waves_early: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            max_ticks: 18_000,
            auto_start: true,
            send_waves_early: false,
        }
    }
}

impl SimulationConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid simulation config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse simulation config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let _ = self.step()?;
        Ok(())
    }

    /// Length of one fixed step.
    pub(crate) fn step(&self) -> Result<Duration> {
        if !self.tick_hz.is_finite() || self.tick_hz <= 0.0 {
            bail!("tick_hz must be a positive number, got {}", self.tick_hz);
        }
        Duration::try_from_secs_f64(1.0 / self.tick_hz)
            .with_context(|| format!("tick_hz {} gives a step that does not fit", self.tick_hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = SimulationConfig::parse("max_ticks = 50\n").expect("valid config");
        assert_eq!(config.max_ticks, 50);
        assert_eq!(config.tick_hz, 30.0);
        assert!(config.auto_start);
        assert!(!config.send_waves_early);
    }

    #[test]
    fn full_config_is_read() {
        let config = SimulationConfig::parse(
            "tick_hz = 20.0\nmax_ticks = 400\nauto_start = false\nsend_waves_early = true\n",
        )
        .expect("valid config");
        assert_eq!(
            config,
            SimulationConfig {
                tick_hz: 20.0,
                max_ticks: 400,
                auto_start: false,
                send_waves_early: true,
            }
        );
        assert_eq!(config.step().expect("valid rate"), Duration::from_millis(50));
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        assert!(SimulationConfig::parse("tick_hz = 0.0\n").is_err());
        assert!(SimulationConfig::parse("tick_hz = -5.0\n").is_err());
    }

    #[test]
    fn rate_with_unrepresentable_step_is_rejected() {
        let error = SimulationConfig::parse("tick_hz = 1e-20\n").expect_err("step overflows");
        assert!(format!("{error:#}").contains("does not fit"));

        let config = SimulationConfig {
            tick_hz: 1e-20,
            ..SimulationConfig::default()
        };
        assert!(config.step().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = SimulationConfig::parse("tick_rate = 10\n").expect_err("unknown key");
        assert!(format!("{error:#}").contains("tick_rate"));
    }
}
