use anyhow::Result;
use clap::Parser;
use signal_benchmark::{
    Args, ChronoTimer, HarnessConfig, Listener, Measurement, Scenario, ScenarioOutcome,
    SignalBenchmark,
};
use std::time::Duration;

fn config_from(argv: &[&str]) -> Result<HarnessConfig> {
    let args = Args::try_parse_from(std::iter::once("signal-benchmark").chain(argv.iter().copied()))?;
    HarnessConfig::from_args(&args)
}

fn emission_with(config: &HarnessConfig, test_size: usize) -> Measurement {
    let mut harness = SignalBenchmark::new(ChronoTimer::new(), config.budget(), config.seed);
    harness.emission::<Listener>(test_size)
}

/// Run every scenario end-to-end against the wall-clock timer.
///
/// The budget is kept tiny so the whole sweep finishes quickly; only
/// structural properties are asserted, never timings.
#[test]
fn all_scenarios_wall_clock_smoke() -> Result<()> {
    let args = Args::try_parse_from([
        "signal-benchmark",
        "-s",
        "all",
        "-n",
        "0",
        "1",
        "32",
        "-l",
        "200",
        "-u",
        "us",
        "-w",
        "2",
    ])?;
    let config = HarnessConfig::from_args(&args)?;
    assert_eq!(config.scenarios.len(), 6);

    let mut harness = SignalBenchmark::new(ChronoTimer::new(), config.budget(), config.seed);

    for &test_size in &config.test_sizes {
        harness.warm_up::<Listener>(test_size, config.warmup_repetitions);
        for &scenario in &config.scenarios {
            match harness.run::<Listener>(scenario, test_size)? {
                ScenarioOutcome::Timed(measurement) => {
                    assert!(scenario.is_timed());
                    assert_eq!(measurement.scenario, scenario);
                    assert_eq!(measurement.test_size, test_size);
                    assert!(measurement.repetitions >= 1);
                    assert_eq!(measurement.limit_ns, 200_000);
                    assert!(measurement.elapsed_ns >= measurement.limit_ns);
                    assert!(measurement.rate.is_finite());
                    if test_size > 0 {
                        assert!(measurement.rate > 0.0);
                    } else {
                        assert_eq!(measurement.rate, 0.0);
                    }
                }
                ScenarioOutcome::Checksum(_) => assert_eq!(scenario, Scenario::Validate),
            }
        }
    }
    Ok(())
}

#[test]
fn combined_runs_do_not_share_state() {
    let mut harness = SignalBenchmark::new(ChronoTimer::new(), Duration::from_micros(100), 1);
    let first = harness.combined::<Listener>(16);
    let second = harness.combined::<Listener>(16);

    // Each invocation accumulates its own budget from zero.
    for measurement in [&first, &second] {
        assert!(measurement.elapsed_ns >= 100_000);
        assert!(measurement.repetitions >= 2);
        assert_eq!(
            measurement.rate,
            16.0 * measurement.repetitions as f64 / 100_000.0
        );
    }
}

/// The same budget written in different units must measure the same thing.
///
/// Wall-clock noise is allowed for with a wide margin; rounding each short
/// window down to whole microseconds or milliseconds inflates the count by
/// orders of magnitude and still trips it.
#[test]
fn budget_unit_gives_comparable_repetitions() -> Result<()> {
    let in_ns = config_from(&["-l", "1000000", "-u", "ns"])?;
    let in_us = config_from(&["-l", "1000", "-u", "us"])?;
    let in_ms = config_from(&["-l", "1", "-u", "ms"])?;
    assert_eq!(in_ns.budget(), in_ms.budget());

    let started = std::time::Instant::now();
    let ns = emission_with(&in_ns, 8);
    let us = emission_with(&in_us, 8);
    let ms = emission_with(&in_ms, 8);
    let wall = started.elapsed();

    for measurement in [&us, &ms] {
        assert_eq!(measurement.limit_ns, ns.limit_ns);
        assert!(measurement.repetitions <= ns.repetitions * 20);
        assert!(ns.repetitions <= measurement.repetitions * 20);
    }
    // Three 1ms budgets; the timed windows are a fraction of each
    // repetition, so allow generous untimed overhead.
    assert!(wall < Duration::from_secs(2), "took {:?}", wall);
    Ok(())
}
