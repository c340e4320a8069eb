// File: ./src/progress.rs
//! In-place console counters for the converter's processing stages.

use std::io::{self, Write};
use strum::Display;

/// Processing stage being counted; the display label is the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    Detecting,
    Fixing,
}

/// Prints `"<Stage>: <k>\r"` every 1000 records, where `k` counts
/// thousands, and a closing newline when the stage finishes. Disabled
/// counters stay silent so library callers and tests produce no console
/// noise.
pub struct StageCounter {
    stage: Stage,
    records: u32,
    thousands: u32,
    enabled: bool,
}

impl StageCounter {
    pub fn new(stage: Stage, enabled: bool) -> Self {
        Self {
            stage,
            records: 0,
            thousands: 0,
            enabled,
        }
    }

    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        self.records += 1;
        if self.records == 1000 {
            self.records = 0;
            self.thousands += 1;
            print!("{}: {}\r", self.stage, self.thousands);
            let _ = io::stdout().flush();
        }
    }

    pub fn finish(&self) {
        if self.enabled {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_match_the_console_wording() {
        assert_eq!(Stage::Detecting.to_string(), "Detecting");
        assert_eq!(Stage::Fixing.to_string(), "Fixing");
    }

    #[test]
    fn disabled_counter_ignores_ticks() {
        let mut counter = StageCounter::new(Stage::Detecting, false);
        for _ in 0..5000 {
            counter.tick();
        }
        assert_eq!(counter.records, 0);
        assert_eq!(counter.thousands, 0);
    }

    #[test]
    fn thousands_advance_every_thousand_records() {
        let mut counter = StageCounter::new(Stage::Fixing, true);
        for _ in 0..2500 {
            counter.tick();
        }
        assert_eq!(counter.thousands, 2);
        assert_eq!(counter.records, 500);
    }
}
