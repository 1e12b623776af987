//! Configuration for factory simulation runs
//!
//! This module provides the configuration types controlling how a run is set up
//! and driven, including worker orchestration and concurrency settings.

use crate::core::errors::FactoryError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BELT_LENGTH: usize = 3;
pub const DEFAULT_TICKS_TO_RUN: u64 = 100;
pub const DEFAULT_ASSEMBLY_TICKS: u64 = 1;

/// How the two worker rows share the belt within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowPolicy {
    /// Every top worker acts, then every bottom worker acts
    Independent,
    /// At each position the bottom worker acts only if the top worker did not
    Gated,
}

impl Default for RowPolicy {
    fn default() -> Self {
        RowPolicy::Independent
    }
}

impl std::str::FromStr for RowPolicy {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "independent" => Ok(RowPolicy::Independent),
            "gated" | "paired" => Ok(RowPolicy::Gated),
            other => Err(FactoryError::InvalidConfiguration(format!(
                "unknown row policy '{}'",
                other
            ))),
        }
    }
}

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Workers act one after another on the calling thread
    Sequential,
    /// Worker positions are driven in parallel with Rayon
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of belt slots, and so of worker pairs
    pub belt_length: usize,
    /// Ticks to run in batch mode
    pub ticks_to_run: u64,
    /// Ticks an assembly takes. Accepted but not yet acted on.
    pub assembly_ticks: u64,
    pub row_policy: RowPolicy,
    pub concurrency_mode: ConcurrencyMode,
    /// Size of a dedicated thread pool, only relevant in Rayon mode
    pub thread_pool_size: Option<usize>,
    /// Seed for the belt feed; entropy when unset
    pub random_seed: Option<u64>,
    /// Print the factory state after every batch tick
    pub verbose: bool,
    /// Step through ticks interactively
    pub stepped: bool,
}

impl SimulationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            belt_length: DEFAULT_BELT_LENGTH,
            ticks_to_run: DEFAULT_TICKS_TO_RUN,
            assembly_ticks: DEFAULT_ASSEMBLY_TICKS,
            row_policy: RowPolicy::default(),
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            random_seed: None,
            verbose: false,
            stepped: false,
        }
    }

    /// Merge optional overrides onto the defaults. Missing or zero values
    /// fall back to the default.
    pub fn resolve(
        belt_length: Option<usize>,
        ticks_to_run: Option<u64>,
        assembly_ticks: Option<u64>,
    ) -> Self {
        let defaults = Self::new();
        Self {
            belt_length: belt_length.filter(|n| *n > 0).unwrap_or(defaults.belt_length),
            ticks_to_run: ticks_to_run.filter(|n| *n > 0).unwrap_or(defaults.ticks_to_run),
            assembly_ticks: assembly_ticks
                .filter(|n| *n > 0)
                .unwrap_or(defaults.assembly_ticks),
            ..defaults
        }
    }

    pub fn with_belt_length(mut self, belt_length: usize) -> Self {
        self.belt_length = belt_length;
        self
    }

    pub fn with_ticks(mut self, ticks_to_run: u64) -> Self {
        self.ticks_to_run = ticks_to_run;
        self
    }

    pub fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_stepped(mut self, stepped: bool) -> Self {
        self.stepped = stepped;
        self
    }

    /// Reject configurations a factory cannot be built from
    pub fn validate(&self) -> Result<(), FactoryError> {
        if self.belt_length == 0 {
            return Err(FactoryError::InvalidConfiguration(
                "belt length must be positive".to_string(),
            ));
        }
        if self.ticks_to_run == 0 && !self.stepped {
            return Err(FactoryError::InvalidConfiguration(
                "tick count must be positive".to_string(),
            ));
        }
        if self.thread_pool_size == Some(0) {
            return Err(FactoryError::InvalidConfiguration(
                "thread pool size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.belt_length, DEFAULT_BELT_LENGTH);
        assert_eq!(config.ticks_to_run, DEFAULT_TICKS_TO_RUN);
        assert_eq!(config.assembly_ticks, DEFAULT_ASSEMBLY_TICKS);
        assert_eq!(config.row_policy, RowPolicy::Independent);
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Sequential);
        assert_eq!(config.thread_pool_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_uses_defaults_when_missing() {
        let config = SimulationConfig::resolve(None, None, None);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let config = SimulationConfig::resolve(Some(5), Some(10), Some(10));
        assert_eq!(config.belt_length, 5);
        assert_eq!(config.ticks_to_run, 10);
        assert_eq!(config.assembly_ticks, 10);
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::new()
            .with_belt_length(7)
            .with_row_policy(RowPolicy::Gated)
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(4)
            .with_seed(9);

        assert_eq!(config.belt_length, 7);
        assert_eq!(config.row_policy, RowPolicy::Gated);
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Rayon);
        assert_eq!(config.thread_pool_size, Some(4));
        assert_eq!(config.random_seed, Some(9));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(SimulationConfig::new().with_belt_length(0).validate().is_err());
        assert!(SimulationConfig::new().with_ticks(0).validate().is_err());
        assert!(SimulationConfig::new()
            .with_ticks(0)
            .with_stepped(true)
            .validate()
            .is_ok());
        assert!(SimulationConfig::new().with_thread_pool_size(0).validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SimulationConfig::new()
            .with_belt_length(4)
            .with_row_policy(RowPolicy::Gated)
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_seed(3);

        let json = serde_json::to_string(&config).unwrap();
        let restored: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
        assert!(json.contains("\"row_policy\":\"Gated\""));
    }

    #[test]
    fn test_row_policy_from_str() {
        assert_eq!("independent".parse::<RowPolicy>(), Ok(RowPolicy::Independent));
        assert_eq!("Gated".parse::<RowPolicy>(), Ok(RowPolicy::Gated));
        assert!("sideways".parse::<RowPolicy>().is_err());
    }
}
