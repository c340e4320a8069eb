use anyhow::{Context, Result};
use nvtfix::batch;
use nvtfix::cli;
use nvtfix::shell::ShellRunner;
use std::env;
use std::io;

fn main() -> Result<()> {
    cli::init_logging();
    // No flags, no arguments, no configuration; stray arguments are
    // ignored and the driver always operates on the current directory.
    let working_dir = env::current_dir().context("Failed to resolve the current directory")?;
    batch::run(&working_dir, &mut io::stdout(), &ShellRunner)
}
