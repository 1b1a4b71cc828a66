use clap::Parser;
use fuzzex::{ComputedExpression, Engine, Tolerance, Value, render_error};
use miette::{Diagnostic, IntoDiagnostic, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::process::ExitCode;
use tracing::debug;

/// fuzzex - compiled expressions with tolerant numeric comparison
#[derive(Parser, Debug)]
#[command(name = "fuzzex")]
#[command(about = "Evaluate fuzzex expressions", long_about = None)]
struct Args {
    /// Bind a parameter, e.g. `-a x=1.5` (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    args: Vec<(String, Value)>,

    /// Absolute slack below the reference value
    #[arg(long)]
    lower: Option<f64>,

    /// Absolute slack above the reference value
    #[arg(long)]
    upper: Option<f64>,

    /// Slack below, applied to integer-truncated values
    #[arg(long)]
    int_lower: Option<f64>,

    /// Slack above, applied to integer-truncated values
    #[arg(long)]
    int_upper: Option<f64>,

    /// Relative slack as a fraction of either operand
    #[arg(long)]
    proportional: Option<f64>,

    /// Print the parameters of each expression (for debugging)
    #[arg(long)]
    debug_params: bool,

    /// Expression to evaluate (if not provided, reads one per line from stdin)
    expression: Option<String>,
}

impl Args {
    fn tolerance(&self) -> Tolerance {
        let mut tolerance = Tolerance::exact();
        tolerance.lower = self.lower;
        tolerance.upper = self.upper;
        tolerance.int_lower = self.int_lower;
        tolerance.int_upper = self.int_upper;
        tolerance.proportional = self.proportional;
        tolerance
    }
}

#[derive(Debug, thiserror::Error, Diagnostic)]
enum CliError {
    #[error("expected NAME=VALUE, got '{0}'")]
    #[diagnostic(code(cli::assignment), help("bind parameters as `-a name=value`"))]
    Assignment(String),
}

/// Parse `name=value`. The value is read as an integer, a float or a
/// boolean if it looks like one, and as a string otherwise.
fn parse_assignment(text: &str) -> std::result::Result<(String, Value), CliError> {
    let (name, raw) = text
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::Assignment(text.to_string()))?;
    let value = if let Ok(i) = raw.parse::<i64>() {
        Value::int(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::float(f)
    } else {
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::str(raw),
        }
    };
    Ok((name.trim().to_string(), value))
}

fn print_parameters(expr: &ComputedExpression) {
    println!("=== Parameters ===");
    for parameter in expr.dump_parameters() {
        let producer = if parameter.is_producer() { ", producer" } else { "" };
        println!(
            "{}: {} ({:?}{})",
            parameter.name(),
            parameter.value_type(),
            parameter.preference(),
            producer
        );
    }
    println!();
}

/// Compile and evaluate one expression. Errors are rendered to stderr;
/// the return value says whether evaluation succeeded.
fn interpret_input(
    engine: &Engine,
    input: &str,
    arguments: &HashMap<String, Value>,
    tolerance: &Tolerance,
    debug_params: bool,
) -> bool {
    let expr = match engine.interpret(input) {
        Ok(expr) => expr,
        Err(e) => {
            render_error(&e);
            return false;
        }
    };

    if debug_params {
        print_parameters(&expr);
    }

    match expr.compute_with(tolerance, arguments) {
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(e) => {
            render_error(&e);
            false
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control the log level; default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let engine = Engine::default();
    let tolerance = args.tolerance();
    let arguments: HashMap<String, Value> = args.args.iter().cloned().collect();
    debug!(arguments = arguments.len(), exact = tolerance.is_exact(), "Starting");

    // Check if we have a direct expression argument
    if let Some(expr) = &args.expression {
        let ok = interpret_input(&engine, expr, &arguments, &tolerance, args.debug_params);
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // Otherwise evaluate one expression per input line
    let mut failed = false;
    for line in std::io::stdin().lock().lines() {
        let line = line.into_diagnostic()?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if !interpret_input(&engine, input, &arguments, &tolerance, args.debug_params) {
            failed = true;
        }
    }
    debug!(cached = engine.len(), "Done");

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
