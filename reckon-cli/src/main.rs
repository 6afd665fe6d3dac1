//! Reckon CLI
//!
//! JSON front end for the matrix calculator.
//!
//! Modes:
//! - no arguments: JSON lines on stdin, one response line per request on stdout
//! - FILE: evaluate the single JSON record in FILE and pretty-print the response
//! - --describe: print the calculator metadata
//!
//! Logs go to stderr and are filtered by RUST_LOG (default `info`).

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use reckon_core::{CalcError, Formula};
use reckon_matrix::MatrixCalculator;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const BIN_NAME: &str = "reckon";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: reckon [OPTIONS] [FILE]

Reads matrix calculator requests as JSON. Without FILE, each stdin line is
one request and each response is written as one stdout line.

Arguments:
  [FILE]       Evaluate the JSON request in FILE and print the response

Options:
  --describe   Print the calculator metadata as JSON
  -h, --help   Print this help
  -V, --version  Print the version

Environment:
  RUST_LOG     Log filter for stderr output (default: info)";

/// One response line: exactly one of the two fields is present
#[derive(Debug, Serialize)]
struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CalcError>,
}

impl Response {
    fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Result<JsonValue, CalcError>> for Response {
    fn from(outcome: Result<JsonValue, CalcError>) -> Self {
        match outcome {
            Ok(result) => Response { result: Some(result), error: None },
            Err(error) => Response { result: None, error: Some(error) },
        }
    }
}

/// Evaluate one JSON request
fn handle_line(calc: &MatrixCalculator, line: &str) -> Response {
    let outcome = serde_json::from_str::<JsonValue>(line)
        .map_err(CalcError::from)
        .and_then(|request| calc.calculate_json(request));

    if let Err(ref e) = outcome {
        debug!(code = %e.code, "request failed: {}", e.message);
    }
    outcome.into()
}

enum Command {
    Serve,
    File(String),
    Describe,
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Serve),
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [flag] if flag == "-V" || flag == "--version" => Ok(Command::Version),
        [flag] if flag == "--describe" => Ok(Command::Describe),
        [flag] if flag.starts_with('-') => Err(format!("unknown option '{}'", flag)),
        [file] => Ok(Command::File(file.clone())),
        _ => Err("expected at most one argument".to_string()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Answer every non-empty request line from `reader` with one line on `out`.
/// Returns the number of requests handled.
fn serve_lines<R: BufRead, W: Write>(calc: &MatrixCalculator, reader: R, out: &mut W) -> io::Result<usize> {
    let mut handled = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "received request");
        let response = handle_line(calc, line);
        serde_json::to_writer(&mut *out, &response)?;
        writeln!(out)?;
        out.flush()?;
        handled += 1;
    }

    Ok(handled)
}

fn serve(calc: &MatrixCalculator) -> ExitCode {
    info!("{} v{} ready, reading requests from stdin", BIN_NAME, VERSION);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    match serve_lines(calc, stdin.lock(), &mut stdout) {
        Ok(handled) => {
            info!(requests = handled, "stdin closed, shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("request loop stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Evaluate the request in `path` and pretty-print the response to `out`.
/// Returns whether the calculation succeeded.
fn evaluate_file<W: Write>(calc: &MatrixCalculator, path: &Path, out: &mut W) -> io::Result<bool> {
    let content = fs::read_to_string(path)?;
    let response = handle_line(calc, &content);
    serde_json::to_writer_pretty(&mut *out, &response)?;
    writeln!(out)?;
    Ok(!response.is_error())
}

fn run_file(calc: &MatrixCalculator, path: &str) -> ExitCode {
    let mut stdout = io::stdout().lock();
    match evaluate_file(calc, Path::new(path), &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("failed to evaluate '{}': {}", path, e);
            ExitCode::FAILURE
        }
    }
}

fn describe(calc: &MatrixCalculator) -> ExitCode {
    match serde_json::to_string_pretty(&calc.meta()) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to encode metadata: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{}: {}\n\n{}", BIN_NAME, msg, USAGE);
            return ExitCode::from(2);
        }
    };

    let calc = MatrixCalculator;
    match command {
        Command::Serve => serve(&calc),
        Command::File(path) => run_file(&calc, &path),
        Command::Describe => describe(&calc),
        Command::Help => {
            println!("{}", USAGE);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("{} {}", BIN_NAME, VERSION);
            ExitCode::SUCCESS
        }
    }
}
