// File: ./src/batch.rs
/*! Batch conversion of every `*.nvt` file in a directory.

Lists the working directory once, derives a conversion task for each entry
whose name ends in ".nvt" but not "_fixed.nvt", and for each task either
prints a skip notice (the output file already exists) or echoes and runs
the external converter command. Selection is pure string suffix matching on
the entry name; entries are never filtered by file type.
*/

use crate::shell::CommandRunner;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const SOURCE_SUFFIX: &str = ".nvt";
pub const FIXED_SUFFIX: &str = "_fixed.nvt";
pub const SIDECAR_SUFFIX: &str = ".csv";

/// Program name the driver invokes, fixed by the external converter
/// contract (the batch driver predates this crate shipping the converter
/// itself, and existing directories are laid out around this name).
pub const CONVERTER_PROGRAM: &str = "nvtfix.exe";

/// One candidate conversion, derived from a directory listing entry.
///
/// `output_name` and `sidecar_name` are pure functions of `input_name`:
/// the trailing ".nvt" replaced by "_fixed.nvt" and ".csv" respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub input_name: String,
    pub output_name: String,
    pub sidecar_name: String,
}

impl ConversionTask {
    /// Derive a task from a listing entry name, or `None` if the entry is
    /// not a source file. The exclusion check runs on the original name,
    /// never on a computed one. A file literally named ".nvt" is a valid
    /// source with an empty stem.
    pub fn from_entry(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(SOURCE_SUFFIX)?;
        if name.ends_with(FIXED_SUFFIX) {
            return None;
        }
        Some(Self {
            input_name: name.to_string(),
            output_name: format!("{stem}{FIXED_SUFFIX}"),
            sidecar_name: format!("{stem}{SIDECAR_SUFFIX}"),
        })
    }

    /// The space-joined command line passed to the shell: program, input,
    /// output, sidecar, in that order.
    pub fn command_line(&self) -> String {
        format!(
            "{} {} {} {}",
            CONVERTER_PROGRAM, self.input_name, self.output_name, self.sidecar_name
        )
    }
}

/// Process every source file in `working_dir`, writing the transcript to
/// `out` and running commands through `runner`.
///
/// The listing is taken once up front, but the output-existence test is a
/// live check at decision time, so an output produced earlier in the same
/// run causes a skip. Entries are processed in whatever order the OS
/// returns them; each matching entry is visited exactly once. Only the
/// listing itself can fail the run.
pub fn run(working_dir: &Path, out: &mut dyn Write, runner: &dyn CommandRunner) -> Result<()> {
    let listing = fs::read_dir(working_dir)
        .with_context(|| format!("Failed to list directory {}", working_dir.display()))?;

    for entry in listing {
        let entry = entry
            .with_context(|| format!("Failed to read an entry of {}", working_dir.display()))?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            // Selection is defined over filename strings; a name that is
            // not valid Unicode can never end in ".nvt".
            Err(raw) => {
                log::debug!("ignoring non-unicode entry {raw:?}");
                continue;
            }
        };
        let Some(task) = ConversionTask::from_entry(&name) else {
            continue;
        };
        if working_dir.join(&task.output_name).is_file() {
            writeln!(out, "{} Output file exist. Skip.", task.output_name)?;
        } else {
            let command_line = task.command_line();
            writeln!(out, "{command_line}")?;
            out.flush()?;
            runner.run(working_dir, &command_line);
        }
    }

    out.write_all(b"\n\n")?;
    out.flush()?;
    runner.pause(working_dir);
    Ok(())
}
