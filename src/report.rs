//! In-place scanned-addresses feedback line.

use std::io::{stdout, Write};

use num_format::{Locale, ToFormattedString};
use terminal_size::{terminal_size, Width};

const FALLBACK_WIDTH: usize = 80;

/// Commas every three digits, pinned to English grouping.
pub fn group_digits(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Periodic progress output. Each tick redraws one carriage-return
/// prefixed line, padded to the terminal width so the previous tick is
/// fully overwritten. A no-op in quiet mode, where the counter is not even
/// maintained.
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn tick(&self, scanned: u64) {
        if self.quiet {
            return;
        }
        let width = terminal_size().map_or(FALLBACK_WIDTH, |(Width(w), _)| w as usize);
        print!("\r{}", progress_line(scanned, width));
        let _ = stdout().flush();
    }
}

fn progress_line(scanned: u64, width: usize) -> String {
    let text = format!("... scanned {} addresses!", group_digits(scanned));
    format!("{text:<width$}")
}
