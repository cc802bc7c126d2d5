use std::fmt::Write as _;

use log::{debug, info};
use minion_core::harness::vectors::{split, DEFAULT_SEED};
use minion_core::{
    HarnessError, MinionConfig, ReadyPattern, RunReport, TestHarness, TestSink, TestSource,
};

use crate::Scenario;

/// Step budget for any one scenario.
pub const MAX_STEPS: u64 = 100_000;

/// Knobs for one scenario run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Initial and interval delay of the request source.
    pub src_delay: u32,
    /// Initial and interval delay of the response sink.
    pub sink_delay: u32,
    /// Random sink readiness; overrides `sink_delay` when set.
    pub ready_probability: Option<f64>,
    /// Seed for random traffic and random readiness.
    pub seed: u64,
    /// Constant written by the `all_n` scenario.
    pub value: u32,
    /// Record one line per step.
    pub trace: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            src_delay: 0,
            sink_delay: 0,
            ready_probability: None,
            seed: DEFAULT_SEED,
            value: 0xffff_ffff,
            trace: false,
        }
    }
}

impl RunOptions {
    fn ready_pattern(&self) -> ReadyPattern {
        self.ready_probability.map_or(
            ReadyPattern::Delayed {
                initial: self.sink_delay,
                interval: self.sink_delay,
            },
            |probability| ReadyPattern::Random {
                probability,
                seed: self.seed,
            },
        )
    }
}

/// A finished scenario and its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Scenario that ran.
    pub scenario: Scenario,
    /// Requests sent.
    pub requests: usize,
    /// Harness report.
    pub report: RunReport,
}

/// Runs `scenario` to completion on a default-geometry minion.
///
/// # Errors
///
/// Propagates the first [`HarnessError`] from the run.
pub fn run_scenario(
    scenario: Scenario,
    options: &RunOptions,
) -> Result<ScenarioOutcome, HarnessError> {
    let pairs = scenario.pairs(options.seed, options.value);
    let (reqs, resps) = split(&pairs);
    let requests = reqs.len();
    info!("running {scenario} with {requests} requests");
    debug!("options: {options:?}");

    let src = TestSource::with_delays(reqs, options.src_delay, options.src_delay);
    let sink = TestSink::new(resps, options.ready_pattern())?;
    let mut harness =
        TestHarness::build(MinionConfig::default(), src, sink)?.with_line_trace(options.trace);
    let report = harness.run(MAX_STEPS)?;

    info!("{scenario} finished in {} steps", report.steps);
    Ok(ScenarioOutcome {
        scenario,
        requests,
        report,
    })
}

/// Plain-text summary of an outcome, followed by the line trace if one was
/// recorded.
#[must_use]
pub fn render_report(outcome: &ScenarioOutcome) -> String {
    let diag = &outcome.report.diag;
    let mut out = String::new();
    let _ = writeln!(out, "scenario: {}", outcome.scenario);
    let _ = writeln!(out, "requests: {}", outcome.requests);
    let _ = writeln!(out, "steps: {}", outcome.report.steps);
    let _ = writeln!(out, "delivered: {}", diag.delivered);
    let _ = writeln!(out, "bypassed: {}", diag.bypassed);
    let _ = writeln!(out, "producer_stalls: {}", diag.producer_stalls);
    let _ = writeln!(out, "consumer_stalls: {}", diag.consumer_stalls);
    let _ = writeln!(out, "peak_occupancy: {}", diag.peak_occupancy);

    if !outcome.report.trace.is_empty() {
        out.push('\n');
        for line in &outcome.report.trace {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
