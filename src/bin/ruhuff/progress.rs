//! Progress display while reading input files.
//!
//! Built on the `indicatif` crate, see <https://docs.rs/indicatif>

use std::io::Read;

use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

/// Inputs smaller than this are read without drawing a bar
const MIN_SIZE_FOR_BAR: u64 = 4 * 1024 * 1024;

/// Wraps a reader and advances a progress bar by the number of bytes read.
pub struct ProgressMonitor<R: Read> {
    /// Expected number of bytes
    pub total: u64,
    /// Bytes read so far
    pub read: u64,
    reader: R,
    progress_bar: ProgressBar,
}

impl<R: Read> ProgressMonitor<R> {
    pub fn new(reader: R, total: u64, label: &'static str) -> Self {
        let progress_bar = if total >= MIN_SIZE_FOR_BAR {
            let style = ProgressStyle::with_template(
                "{msg} {wide_bar} {binary_bytes}/{binary_total_bytes} [{eta} remaining]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            let bar = ProgressBar::new(total).with_style(style).with_message(label);
            // redrawing at the default 20hz costs more than it shows
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self {
            total,
            read: 0,
            reader,
            progress_bar,
        }
    }

    fn update(&mut self, delta: usize) {
        self.read += delta as u64;
        self.progress_bar.inc(delta as u64);
        if delta == 0 && !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
            debug!(
                "read {} in {}",
                HumanBytes(self.read),
                HumanDuration(self.progress_bar.elapsed())
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let out = self.reader.read(buf)?;
        // a zero length read marks the end of the input
        self.update(out);
        Ok(out)
    }
}

/// Compressed size as a percentage of the original
pub fn fmt_ratio(original: u64, compressed: u64) -> String {
    if original == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", compressed as f64 * 100.0 / original as f64)
}
