//! CLI output formatting.
//!
//! Each run prints a short summary of the source before transforming it:
//!
//! ```text
//! file type: GIF
//! 480px x 270px
//! duration: 2.40 s
//! ```
//!
//! The duration line only appears for animated sources. `format_*`
//! functions are pure and return lines; `print_*` wrappers write them to
//! stdout.

use crate::imaging::Header;
use std::time::Duration;

/// Format an animation duration as seconds with two decimals.
fn format_duration(duration: Duration) -> String {
    format!("{:.2} s", duration.as_secs_f64())
}

/// Lines describing the source image.
pub fn format_header_summary(header: &Header) -> Vec<String> {
    let mut lines = vec![
        format!("file type: {}", header.description),
        format!("{}px x {}px", header.width, header.height),
    ];
    if header.is_animated() {
        lines.push(format!("duration: {}", format_duration(header.duration)));
    }
    lines
}

pub fn print_header_summary(header: &Header) {
    for line in format_header_summary(header) {
        println!("{}", line);
    }
}
