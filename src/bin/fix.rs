use anyhow::Result;
use nvtfix::cli;
use nvtfix::fixer::FixJob;
use nvtfix::trace::TraceSink;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    cli::init_logging();
    let args: Vec<String> = env::args().collect();

    // Handle help flag
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        cli::print_usage();
        return Ok(());
    }

    // Two file arguments: CSV-only mode. Three: fix into the named output.
    // Anything else prints usage and exits successfully, as batch callers
    // expect no hard failure from a bad invocation.
    let job = match args.len() {
        4 => FixJob::new(
            Path::new(&args[1]),
            Path::new(&args[2]),
            Path::new(&args[3]),
        ),
        3 => FixJob::csv_only(Path::new(&args[1]), Path::new(&args[2])),
        _ => {
            cli::print_usage();
            return Ok(());
        }
    };

    cli::print_banner();
    // Presence of debug.txt in the working directory opts into the trace.
    let mut trace = TraceSink::open_if_enabled(Path::new("."));
    let summary = job.run(&mut trace)?;
    log::debug!(
        "{} records processed, {} zero intervals fixed",
        summary.records,
        summary.intervals
    );
    Ok(())
}
