//! CLI output formatting for both pipeline stages.
//!
//! Each progress line has a `format_*` function (pure, returns `String` or
//! `Vec<String>`) and a `print_*` wrapper that writes to stdout. Format
//! functions carry the whole layout so tests can pin the output without
//! capturing stdout.
//!
//! ```text
//! ==> Capturing 2 pages
//!   [1/2] landing → ../backup_landing.jpg
//!   [2/2] pricing → ../backup_pricing.jpg
//! ==> Compressing 2 captures
//! Round 01: 2 pending, quality 100.0
//! Round 02: 1 pending, quality 95.0
//! Compressed 2 files under 40 KB
//! ```

use crate::compress::{CompressOutcome, MAX_TRIES};
use std::path::Path;

/// One line per capture: batch position, folder identity, output path.
pub fn format_capture(index: usize, total: usize, folder: &str, path: &Path) -> String {
    format!("  [{}/{}] {} → {}", index, total, folder, path.display())
}

pub fn print_capture(index: usize, total: usize, folder: &str, path: &Path) {
    println!("{}", format_capture(index, total, folder, path));
}

/// One line per compression round: pending count and the quality in effect.
pub fn format_round(round: u32, pending: usize, quality: f64) -> String {
    format!("Round {:0>2}: {} pending, quality {:.1}", round, pending, quality)
}

pub fn print_round(round: u32, pending: usize, quality: f64) {
    println!("{}", format_round(round, pending, quality));
}

/// Warning naming how many files never reached the target.
pub fn format_shortfall(count: usize, target_bytes: u64) -> String {
    format!(
        "Warning: {} file(s) still exceed {} KB after {} rounds",
        count,
        target_bytes / 1024,
        MAX_TRIES
    )
}

pub fn print_shortfall(count: usize, target_bytes: u64) {
    println!("{}", format_shortfall(count, target_bytes));
}

/// Final compression summary: the success line plus one line per shortfall.
pub fn format_summary(outcome: &CompressOutcome, target_bytes: u64) -> Vec<String> {
    let mut lines = vec![format!(
        "Compressed {} files under {} KB",
        outcome.completed.len(),
        target_bytes / 1024
    )];
    for path in &outcome.shortfall {
        lines.push(format!("  still oversized: {}", path.display()));
    }
    lines
}

pub fn print_summary(outcome: &CompressOutcome, target_bytes: u64) {
    for line in format_summary(outcome, target_bytes) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn capture_line_shows_position_and_path() {
        let line = format_capture(2, 5, "landing", Path::new("../backup_landing.jpg"));
        assert_eq!(line, "  [2/5] landing → ../backup_landing.jpg");
    }

    #[test]
    fn round_line_is_zero_padded_with_one_decimal() {
        assert_eq!(
            format_round(3, 2, 90.25),
            "Round 03: 2 pending, quality 90.2"
        );
        assert_eq!(
            format_round(1, 10, 100.0),
            "Round 01: 10 pending, quality 100.0"
        );
    }

    #[test]
    fn shortfall_names_count_and_target() {
        let line = format_shortfall(2, 40 * 1024);
        assert_eq!(line, "Warning: 2 file(s) still exceed 40 KB after 40 rounds");
    }

    #[test]
    fn summary_lists_each_shortfall_path() {
        let outcome = CompressOutcome {
            completed: vec![PathBuf::from("/x/optimized/a.jpg")],
            shortfall: vec![PathBuf::from("/x/optimized/b.jpg")],
            rounds: 40,
        };
        let lines = format_summary(&outcome, 40 * 1024);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Compressed 1 files under 40 KB");
        assert_eq!(lines[1], "  still oversized: /x/optimized/b.jpg");
    }
}
