// File: ./src/fixer.rs
/*! Zero-interval detection and the fix pipeline.

The video tracker writes x = y = 0 for frames where it lost the target.
The fixer finds each run of lost records, bounded by the good positions on
either side, and rewrites the run with the integer mean of those boundary
positions. Two passes over the input: detect all intervals first, then
stream every record (patched or not) to the fixed output file and to a CSV
dump of the position data.
*/

use crate::nvt::{self, NvtRecord, RECORD_SIZE};
use crate::progress::{Stage, StageCounter};
use crate::trace::TraceSink;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Scratch output name used in CSV-only mode, kept from the original
/// converter's contract.
pub const SCRATCH_NVT_NAME: &str = "VT1_TMP0945809.nvt";

/// One run of lost-position records. `start` is the last good record
/// before the run (index 0 with an all-zero position when the file begins
/// lost), `stop` is the record that ended it. Records in
/// `start+1 ..= stop` get the patched position; note the stop record
/// itself is rewritten too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroInterval {
    pub start: u64,
    pub stop: u64,
    pub x_start: i32,
    pub y_start: i32,
    pub angle_start: i32,
    pub x_stop: i32,
    pub y_stop: i32,
    pub angle_stop: i32,
}

impl ZeroInterval {
    /// Integer mean of the boundary positions, truncating toward zero.
    /// Summed in i64 so extreme coordinates cannot overflow the addition.
    pub fn patched_position(&self) -> (i32, i32, i32) {
        let mean = |a: i32, b: i32| ((a as i64 + b as i64) / 2) as i32;
        (
            mean(self.x_start, self.x_stop),
            mean(self.y_start, self.y_stop),
            mean(self.angle_start, self.angle_stop),
        )
    }

    /// Whether record `index` falls in the patch range.
    pub fn contains(&self, index: u64) -> bool {
        index > self.start && index <= self.stop
    }
}

/// Emitted by the detector so the caller can place trace markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    Opened { start: u64 },
    Closed { stop: u64 },
}

#[derive(Debug)]
struct OpenInterval {
    start: u64,
    x: i32,
    y: i32,
    angle: i32,
}

/// Streaming state machine over the record sequence.
///
/// A lost record (x == 0 AND y == 0) opens an interval anchored at the
/// previous record; the run closes only at a record with x != 0 AND
/// y != 0. The predicate is asymmetric on purpose: a record like (5, 0)
/// neither opens nor closes a run. A run still open at end of input
/// produces no interval, so trailing zeros stay zero.
pub struct IntervalDetector {
    prev: (u64, i32, i32, i32),
    open: Option<OpenInterval>,
    intervals: Vec<ZeroInterval>,
    next_index: u64,
}

impl IntervalDetector {
    pub fn new() -> Self {
        Self {
            // Synthetic all-zero record preceding record 0, so a file that
            // begins lost anchors its first interval at index 0.
            prev: (0, 0, 0, 0),
            open: None,
            intervals: Vec::new(),
            next_index: 0,
        }
    }

    /// Feed the next record in file order.
    pub fn push(&mut self, record: &NvtRecord) -> Option<DetectorEvent> {
        let index = self.next_index;
        let event = match &self.open {
            Some(open) => {
                if record.x() != 0 && record.y() != 0 {
                    debug_assert!(open.start < index);
                    self.intervals.push(ZeroInterval {
                        start: open.start,
                        stop: index,
                        x_start: open.x,
                        y_start: open.y,
                        angle_start: open.angle,
                        x_stop: record.x(),
                        y_stop: record.y(),
                        angle_stop: record.angle(),
                    });
                    self.open = None;
                    Some(DetectorEvent::Closed { stop: index })
                } else {
                    None
                }
            }
            None => {
                if record.is_lost() {
                    let (start, x, y, angle) = self.prev;
                    self.open = Some(OpenInterval { start, x, y, angle });
                    Some(DetectorEvent::Opened { start })
                } else {
                    None
                }
            }
        };
        self.prev = (index, record.x(), record.y(), record.angle());
        self.next_index = index + 1;
        event
    }

    /// All closed intervals, sorted by position with disjoint patch
    /// ranges. An open run is discarded.
    pub fn finish(self) -> Vec<ZeroInterval> {
        if self.open.is_some() {
            log::debug!("discarding zero run still open at end of input");
        }
        self.intervals
    }
}

impl Default for IntervalDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts reported after a completed fix run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixSummary {
    pub records: u64,
    pub intervals: usize,
}

/// One input file, where its fixed record stream and CSV dump go, and
/// whether the fixed stream is a scratch file to discard afterwards.
pub struct FixJob {
    input: PathBuf,
    output: PathBuf,
    csv: PathBuf,
    remove_output: bool,
    /// Console progress counters; turned off for library and test use.
    pub progress: bool,
}

impl FixJob {
    pub fn new(input: &Path, output: &Path, csv: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            csv: csv.to_path_buf(),
            remove_output: false,
            progress: true,
        }
    }

    /// CSV-only mode: the fixed stream goes to a scratch file next to the
    /// CSV and is removed once the dump is complete.
    pub fn csv_only(input: &Path, csv: &Path) -> Self {
        let parent = csv.parent().unwrap_or_else(|| Path::new(""));
        Self {
            input: input.to_path_buf(),
            output: parent.join(SCRATCH_NVT_NAME),
            csv: csv.to_path_buf(),
            remove_output: true,
            progress: true,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Run both passes. File open, read and write failures are fatal; an
    /// unremovable scratch file only logs a warning.
    pub fn run(&self, trace: &mut TraceSink) -> Result<FixSummary> {
        trace.run_header(
            &self.input.display().to_string(),
            &self.output.display().to_string(),
            RECORD_SIZE,
        );
        let intervals = self.detect(trace)?;
        trace.summary(intervals.len());
        let records = self.fix(&intervals)?;
        if self.remove_output {
            if let Err(e) = fs::remove_file(&self.output) {
                log::warn!(
                    "Could not remove scratch file {}: {e}",
                    self.output.display()
                );
            }
        }
        Ok(FixSummary {
            records,
            intervals: intervals.len(),
        })
    }

    // Pass 1: walk every record and collect the zero intervals.
    fn detect(&self, trace: &mut TraceSink) -> Result<Vec<ZeroInterval>> {
        let mut reader = self.open_input()?;
        let mut detector = IntervalDetector::new();
        let mut counter = StageCounter::new(Stage::Detecting, self.progress);
        while let Some(record) = self.read_record(&mut reader)? {
            counter.tick();
            match detector.push(&record) {
                Some(DetectorEvent::Opened { start }) => trace.interval_start(start),
                Some(DetectorEvent::Closed { stop }) => trace.interval_end(stop),
                None => {}
            }
            trace.record(&record);
        }
        counter.finish();
        Ok(detector.finish())
    }

    // Pass 2: stream every record to the output and the CSV, patching the
    // ones inside an interval. Averages use the boundary values captured
    // in pass 1, so they reflect the original file.
    fn fix(&self, intervals: &[ZeroInterval]) -> Result<u64> {
        let mut reader = BufReader::new(File::open(&self.input).with_context(|| {
            format!("Can't open file {} for reading", self.input.display())
        })?);
        let header = nvt::read_header(&mut reader)
            .with_context(|| format!("Failed to read NVT header of {}", self.input.display()))?;

        let mut out = BufWriter::new(File::create(&self.output).with_context(|| {
            format!("Can't open file {} for writing", self.output.display())
        })?);
        out.write_all(&header)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        let mut csv = BufWriter::new(File::create(&self.csv).with_context(|| {
            format!("Can't open file {} for writing", self.csv.display())
        })?);
        writeln!(csv, "TimeStamp,x,y,angle")
            .with_context(|| format!("Failed to write to {}", self.csv.display()))?;

        let mut counter = StageCounter::new(Stage::Fixing, self.progress);
        let mut cursor = 0;
        let mut index: u64 = 0;
        while let Some(mut record) = self.read_record(&mut reader)? {
            counter.tick();
            while cursor < intervals.len() && index > intervals[cursor].stop {
                cursor += 1;
            }
            if cursor < intervals.len() && intervals[cursor].contains(index) {
                let (x, y, angle) = intervals[cursor].patched_position();
                record.set_position(x, y, angle);
            }
            record
                .write_to(&mut out)
                .with_context(|| format!("Failed to write to {}", self.output.display()))?;
            writeln!(
                csv,
                "{},{},{},{}",
                record.timestamp(),
                record.x(),
                record.y(),
                record.angle()
            )
            .with_context(|| format!("Failed to write to {}", self.csv.display()))?;
            index += 1;
        }
        counter.finish();
        out.flush()
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;
        csv.flush()
            .with_context(|| format!("Failed to write to {}", self.csv.display()))?;
        Ok(index)
    }

    fn open_input(&self) -> Result<BufReader<File>> {
        let mut reader = BufReader::new(File::open(&self.input).with_context(|| {
            format!("Can't open file {} for reading", self.input.display())
        })?);
        nvt::read_header(&mut reader)
            .with_context(|| format!("Failed to read NVT header of {}", self.input.display()))?;
        Ok(reader)
    }

    fn read_record(&self, reader: &mut BufReader<File>) -> Result<Option<NvtRecord>> {
        NvtRecord::read_from(reader)
            .with_context(|| format!("Failed to read a record from {}", self.input.display()))
    }
}
