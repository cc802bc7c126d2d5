//! CLI entry point for the minion scenario runner.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use log::{error, LevelFilter};
use minion_core as _;
use minion_sim::{render_report, run_scenario, RunOptions, Scenario};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: minion-sim <command> [options]

Commands:
  list                    List available scenarios
  run <scenario> [opts]   Run a scenario through the minion pipeline

Options:
  --src-delay <n>          Source initial and interval delay (default: 0)
  --sink-delay <n>         Sink initial and interval delay (default: 0)
  --ready-probability <p>  Random sink readiness in 0.0..=1.0
  --seed <s>               Seed for random traffic and readiness
  --value <v>              Constant for the all_n scenario
  --trace                  Print one line per step
  -o, --output <file>      Write the run report to a file
  -v, --verbose            Enable debug logging
  -h, --help               Show this help message

Examples:
  minion-sim list
  minion-sim run random --src-delay 3 --sink-delay 5
  minion-sim run basic_multiple --ready-probability 0.5 --trace
";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Run(RunArgs),
}

#[derive(Debug, PartialEq)]
struct RunArgs {
    scenario: Scenario,
    options: RunOptions,
    output: Option<PathBuf>,
    verbose: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "list" => match args.next() {
            None => Ok(ParseResult::Command(Command::List)),
            Some(extra) => Err(format!("unexpected argument: {}", extra.to_string_lossy())),
        },
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_number(flag: &str, value: Option<OsString>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    let parsed = text.strip_prefix("0x").map_or_else(
        || text.parse::<u64>(),
        |hex| u64::from_str_radix(hex, 16),
    );
    parsed.map_err(|e| format!("invalid value for {flag}: {text} ({e})"))
}

fn parse_u32(flag: &str, value: Option<OsString>) -> Result<u32, String> {
    let wide = parse_number(flag, value)?;
    u32::try_from(wide).map_err(|_| format!("value for {flag} does not fit in 32 bits: {wide}"))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut scenario: Option<Scenario> = None;
    let mut options = RunOptions::default();
    let mut output: Option<PathBuf> = None;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "--trace" {
            options.trace = true;
            continue;
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        if arg == "--src-delay" {
            options.src_delay = parse_u32("--src-delay", args.next())?;
            continue;
        }

        if arg == "--sink-delay" {
            options.sink_delay = parse_u32("--sink-delay", args.next())?;
            continue;
        }

        if arg == "--seed" {
            options.seed = parse_number("--seed", args.next())?;
            continue;
        }

        if arg == "--value" {
            options.value = parse_u32("--value", args.next())?;
            continue;
        }

        if arg == "--ready-probability" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --ready-probability".to_string())?;
            let text = value.to_string_lossy();
            let probability = text
                .parse::<f64>()
                .map_err(|e| format!("invalid value for --ready-probability: {text} ({e})"))?;
            options.ready_probability = Some(probability);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if scenario.is_some() {
            return Err("multiple scenarios provided".to_string());
        }
        scenario = Some(arg.to_string_lossy().parse()?);
    }

    let scenario = scenario.ok_or_else(|| "missing scenario name".to_string())?;
    Ok(RunArgs {
        scenario,
        options,
        output,
        verbose,
    })
}

fn setup_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::builder()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn run_list() {
    for scenario in Scenario::ALL {
        println!("{:<16} {}", scenario.name(), scenario.description());
    }
}

fn run_run(args: &RunArgs) -> Result<(), i32> {
    setup_logger(args.verbose);

    let outcome = match run_scenario(args.scenario, &args.options) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{} failed: {e}", args.scenario);
            eprintln!("FAIL {}: {e}", args.scenario);
            return Err(1);
        }
    };

    for line in &outcome.report.trace {
        println!("{line}");
    }

    if let Some(path) = &args.output {
        if let Err(e) = fs::write(path, render_report(&outcome)) {
            eprintln!("error: failed to write report: {e}");
            return Err(1);
        }
    }

    println!(
        "PASS {}: {} requests in {} steps",
        outcome.scenario, outcome.requests, outcome.report.steps
    );
    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::List)) => {
            run_list();
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => match run_run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
