use std::path::Path;
use std::time::Duration;

use docinfer_extract::ProgressObserver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} Processing PDFs... [{bar:30.cyan/blue}] {pos}/{len} {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

/// Batch progress bar on stderr; cleared when the batch finishes.
pub struct BatchProgress {
    bar: ProgressBar,
    visible: bool,
}

impl BatchProgress {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        if visible {
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        }
        Self { bar, visible }
    }
}

impl ProgressObserver for BatchProgress {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        if self.visible {
            self.bar.enable_steady_tick(Duration::from_millis(120));
        }
    }

    fn advance(&self, file: &Path) {
        if let Some(name) = file.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Transient spinner shown while a single file is analyzed.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        if visible {
            bar.enable_steady_tick(Duration::from_millis(120));
        }
        Self { bar }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
