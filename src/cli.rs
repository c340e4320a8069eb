// File: ./src/cli.rs
//! Shared command-line glue for the two binaries: usage text and logging.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Startup banner printed by the converter before processing.
pub fn print_banner() {
    println!("nvtfix v{}", env!("CARGO_PKG_VERSION"));
}

/// Converter usage text. The batch driver has no CLI surface at all, so
/// there is no help to print for it.
pub fn print_usage() {
    println!("Scan Neuralynx *.nvt file for zero position entries");
    println!("and replace them by average value calculated based on");
    println!("position data taken from right and left side entries");
    println!();
    println!("USAGE:");
    println!("    nvtfix <input.nvt> [<output.nvt>] <dump.csv>");
    println!();
    println!("If the output *.nvt file name is not provided");
    println!("then only the CSV file will be generated.");
}

/// Logger setup shared by both binaries. Spec-bound console output goes
/// straight to stdout; the logger only carries diagnostics to stderr.
/// Level defaults to warn and is overridable via NVTFIX_LOG.
pub fn init_logging() {
    let level = std::env::var("NVTFIX_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
