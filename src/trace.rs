// File: ./src/trace.rs
/*! Opt-in per-record debug trace.

If a file named `debug.txt` exists in the working directory when the
converter starts, it is truncated and rewritten with a run header, a dump
of every record, markers around each zero interval and a final interval
count. Absent the file, nothing is written: presence of `debug.txt` is the
entire opt-in switch, there is no flag.
*/

use crate::nvt::NvtRecord;
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const TRACE_FILENAME: &str = "debug.txt";

pub struct TraceSink {
    writer: Option<BufWriter<File>>,
}

impl TraceSink {
    /// Open the trace if `debug.txt` already exists in `dir`. Failure to
    /// reopen it for writing silently disables the trace.
    pub fn open_if_enabled(dir: &Path) -> Self {
        let path = dir.join(TRACE_FILENAME);
        let writer = if path.is_file() {
            File::create(&path).ok().map(BufWriter::new)
        } else {
            None
        };
        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn run_header(&mut self, input: &str, output: &str, record_size: usize) {
        self.emit(|w| {
            writeln!(
                w,
                "nvtfix {} {}",
                env!("CARGO_PKG_VERSION"),
                Local::now().format("%Y-%m-%d %H:%M:%S")
            )?;
            writeln!(w, "Input file: {input}")?;
            writeln!(w, "Output file: {output}")?;
            writeln!(w, "Record size: {record_size}")?;
            writeln!(w, "Scan for zero-entry intervals...")?;
            writeln!(w)
        });
    }

    pub fn interval_start(&mut self, index: u64) {
        self.emit(|w| {
            writeln!(w, "------- Zero-interval start -------")?;
            writeln!(w, "{index}")
        });
    }

    pub fn interval_end(&mut self, index: u64) {
        self.emit(|w| {
            writeln!(w, "{index}")?;
            writeln!(w, "-------- Zero-interval end --------")?;
            writeln!(w)
        });
    }

    pub fn record(&mut self, record: &NvtRecord) {
        self.emit(|w| {
            writeln!(w, "TimeStamp {}", record.timestamp())?;
            writeln!(w, "Xpos {}", record.x())?;
            writeln!(w, "Ypos {}", record.y())?;
            writeln!(w, "Angle {}", record.angle())?;
            writeln!(w)
        });
    }

    pub fn summary(&mut self, intervals: usize) {
        self.emit(|w| writeln!(w, "zero intervals found: {intervals}"));
    }

    // Trace writes are best effort; a full disk must not fail the fix run.
    fn emit(&mut self, f: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>) {
        if let Some(w) = self.writer.as_mut() {
            let _ = f(w);
        }
    }
}
