//! # Command-Line Interface and Configuration
//!
//! Two ways in, one configuration out:
//!
//! - **Options**: `Args`, parsed by clap, one flag per harness setting
//! - **Config file**: a JSON document passed with `--config`, whose fields
//!   mirror `HarnessConfig` and fall back to `crate::defaults` when absent
//!
//! Either way `HarnessConfig::from_args` expands the `all` scenario and
//! validates the result before the benchmark sees it. The time budget is
//! written as an amount of `time_unit` and handed to the harness as a
//! [`std::time::Duration`] through `HarnessConfig::budget`.

use crate::timer::TimeUnit;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Signal Benchmark - measures the cost of signal/observer dispatch
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Scenarios to run (space-separated, or all)
    #[clap(short = 's', long, value_enum, default_values_t = vec![Scenario::All], help_heading = "Core Options", num_args = 1..)]
    pub scenarios: Vec<Scenario>,

    /// Number of observers per repetition (space-separated)
    #[clap(short = 'n', long, default_values_t = crate::defaults::TEST_SIZES.to_vec(), help_heading = "Core Options", num_args = 1..)]
    pub test_sizes: Vec<usize>,

    /// Time budget per scenario invocation, in units of --time-unit
    #[clap(short = 'l', long, default_value_t = crate::defaults::LIMIT)]
    pub limit: u64,

    /// Unit of the time budget
    #[clap(short = 'u', long, value_enum, default_value_t = crate::defaults::TIME_UNIT)]
    pub time_unit: TimeUnit,

    /// Seed for the workload and handler random source
    #[clap(long, default_value_t = crate::defaults::SEED)]
    pub seed: u64,

    /// Untimed combined repetitions to run before measuring each test size
    #[clap(short = 'w', long, default_value_t = crate::defaults::WARMUP_REPETITIONS)]
    pub warmup_repetitions: usize,

    /// Pin the benchmark thread to this CPU core
    #[clap(long)]
    pub cpu_affinity: Option<usize>,

    /// Load configuration from a JSON file instead of the options above
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Benchmark scenarios
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Allocate a subject and its observers
    #[clap(name = "construction")]
    Construction,

    /// Drop a fully connected subject and its observers
    #[clap(name = "destruction")]
    Destruction,

    /// Connect every observer to the subject
    #[clap(name = "connection")]
    Connection,

    /// Emit one signal to every connected observer
    #[clap(name = "emission")]
    Emission,

    /// Allocate, connect and emit in one window
    #[clap(name = "combined")]
    Combined,

    /// Untimed determinism check returning a checksum
    #[clap(name = "validate")]
    Validate,

    /// All scenarios
    #[clap(name = "all")]
    All,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Construction => write!(f, "construction"),
            Scenario::Destruction => write!(f, "destruction"),
            Scenario::Connection => write!(f, "connection"),
            Scenario::Emission => write!(f, "emission"),
            Scenario::Combined => write!(f, "combined"),
            Scenario::Validate => write!(f, "validate"),
            Scenario::All => write!(f, "all"),
        }
    }
}

impl Scenario {
    /// Expand the "All" variant to every runnable scenario
    pub fn expand_all(scenarios: Vec<Scenario>) -> Vec<Scenario> {
        if scenarios.contains(&Scenario::All) {
            vec![
                Scenario::Construction,
                Scenario::Destruction,
                Scenario::Connection,
                Scenario::Emission,
                Scenario::Combined,
                Scenario::Validate,
            ]
        } else {
            scenarios
        }
    }

    /// Whether the scenario produces a throughput rather than a checksum
    pub fn is_timed(self) -> bool {
        !matches!(self, Scenario::Validate | Scenario::All)
    }
}

/// Configuration for a harness run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub scenarios: Vec<Scenario>,
    pub test_sizes: Vec<usize>,
    pub limit: u64,
    pub time_unit: TimeUnit,
    pub seed: u64,
    pub warmup_repetitions: usize,
    pub cpu_affinity: Option<usize>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            scenarios: Scenario::expand_all(vec![Scenario::All]),
            test_sizes: crate::defaults::TEST_SIZES.to_vec(),
            limit: crate::defaults::LIMIT,
            time_unit: crate::defaults::TIME_UNIT,
            seed: crate::defaults::SEED,
            warmup_repetitions: crate::defaults::WARMUP_REPETITIONS,
            cpu_affinity: None,
        }
    }
}

impl HarnessConfig {
    /// Build the configuration from parsed arguments.
    ///
    /// A `--config` file replaces every other option. The result is validated
    /// either way.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = match args.config {
            Some(ref path) => Self::from_file(path)?,
            None => Self {
                scenarios: Scenario::expand_all(args.scenarios.clone()),
                test_sizes: args.test_sizes.clone(),
                limit: args.limit,
                time_unit: args.time_unit,
                seed: args.seed,
                warmup_repetitions: args.warmup_repetitions,
                cpu_affinity: args.cpu_affinity,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let mut config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.scenarios = Scenario::expand_all(config.scenarios);
        Ok(config)
    }

    /// Time budget per invocation
    pub fn budget(&self) -> Duration {
        self.time_unit.to_duration(self.limit)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            anyhow::bail!("At least one scenario must be selected");
        }
        if self.test_sizes.is_empty() {
            anyhow::bail!("At least one test size must be given");
        }
        if self.limit == 0 {
            anyhow::bail!("Time budget must be greater than zero");
        }
        Ok(())
    }
}
