//! Scenario runner for the SRAM minion pipeline model.

use env_logger as _;

/// Named traffic scenarios.
pub mod scenario;
/// Harness construction, execution and report rendering.
pub mod runner;

pub use runner::{render_report, run_scenario, RunOptions, ScenarioOutcome};
pub use scenario::Scenario;

#[cfg(test)]
use tempfile as _;
