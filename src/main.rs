//! # Signal Benchmark - Main Entry Point
//!
//! Runs the selected scenarios for each configured test size and logs one
//! line per result.
//!
//! 1. **Initialize logging**: colorized tracing output, `RUST_LOG` aware
//! 2. **Parse arguments**: clap options or a JSON config file
//! 3. **Pin the thread**: optional CPU affinity
//! 4. **Run**: warm up, then every scenario for every test size

use anyhow::Result;
use clap::Parser;
use signal_benchmark::{
    logging,
    utils::{format_duration, format_op_rate, pin_current_thread},
    Args, ChronoTimer, HarnessConfig, Listener, ScenarioOutcome, SignalBenchmark,
};
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    info!("Starting Signal Benchmark v{}", signal_benchmark::VERSION);
    debug!("Arguments: {:?}", args);

    let config = HarnessConfig::from_args(&args)?;
    debug!("Configuration: {:?}", config);

    if let Some(core) = config.cpu_affinity {
        pin_current_thread(core)?;
        info!("Benchmark thread pinned to CPU core {}", core);
    }

    let budget = config.budget();
    let mut harness = SignalBenchmark::new(ChronoTimer::new(), budget, config.seed);
    info!(
        "Time budget {} per invocation, seed {}",
        format_duration(budget),
        config.seed
    );

    for &test_size in &config.test_sizes {
        harness.warm_up::<Listener>(test_size, config.warmup_repetitions);

        for &scenario in &config.scenarios {
            match harness.run::<Listener>(scenario, test_size)? {
                ScenarioOutcome::Timed(measurement) => info!(
                    "{:<12} N={:<6} repetitions={:<8} {}",
                    scenario.to_string(),
                    test_size,
                    measurement.repetitions,
                    format_op_rate(measurement.ops_per_second())
                ),
                ScenarioOutcome::Checksum(checksum) => info!(
                    "{:<12} N={:<6} checksum={:#018x}",
                    scenario.to_string(),
                    test_size,
                    checksum
                ),
            }
        }
    }

    info!("Signal Benchmark completed successfully");
    Ok(())
}
