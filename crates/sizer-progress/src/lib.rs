use std::borrow::Cow;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// How often should progress bars be redrawn?
pub const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Wraps an `indicatif::ProgressBar` with a local buffer so that a tight per-object
/// `inc(1)` loop in the walker's body-retrieval pass doesn't pay redraw cost on every
/// call; increments are batched and flushed at most every `PROGRESS_UPDATE_INTERVAL`.
pub struct Progress {
    inc_since_sync: u64,
    last_sync: Instant,
    inner: ProgressBar,
    finish_style: Option<ProgressStyle>,
}

impl Progress {
    /// A spinner with no known total, for the header-enumeration pass where the object
    /// count isn't known until it finishes.
    pub fn new_spinner<T: Into<Cow<'static, str>>>(message: T, enabled: bool) -> Self {
        let inner = if enabled {
            let style = ProgressStyle::with_template("{spinner} {msg} {human_len} [{elapsed_precise}]")
                .expect("progress bar style template should compile");
            let inner = ProgressBar::new_spinner().with_style(style).with_message(message);
            inner.enable_steady_tick(PROGRESS_UPDATE_INTERVAL);
            inner
        } else {
            ProgressBar::hidden()
        };

        let finish_style = ProgressStyle::with_template("{msg} [{elapsed_precise}]")
            .expect("progress bar style template should compile");

        Progress {
            inc_since_sync: 0,
            last_sync: Instant::now(),
            inner,
            finish_style: Some(finish_style),
        }
    }

    /// A bar with a known total, for the body-retrieval pass once the header pass has
    /// reported how many objects there are to process.
    pub fn new_bar<T: Into<Cow<'static, str>>>(total: u64, message: T, enabled: bool) -> Self {
        let style = ProgressStyle::with_template("{msg}  {bar} {percent:>3}%  {pos}/{len}  [{elapsed_precise}]")
            .expect("progress bar style template should compile");

        let inner = if enabled {
            let inner = ProgressBar::new(total).with_style(style).with_message(message);
            inner.enable_steady_tick(PROGRESS_UPDATE_INTERVAL);
            inner
        } else {
            ProgressBar::hidden()
        };

        Progress {
            inc_since_sync: 0,
            last_sync: Instant::now(),
            inner,
            finish_style: None,
        }
    }

    #[inline]
    pub fn set_message<T: Into<Cow<'static, str>>>(&mut self, message: T) {
        self.inner.set_message(message);
    }

    #[inline]
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.inner.suspend(f)
    }

    #[inline]
    pub fn inc(&mut self, amount: u64) {
        self.inc_since_sync += amount;
        if self.last_sync.elapsed() >= PROGRESS_UPDATE_INTERVAL {
            self.sync();
        }
    }

    pub fn finish_with_message<T: Into<Cow<'static, str>>>(&mut self, message: T) {
        self.sync();
        if let Some(style) = &self.finish_style {
            self.inner.set_style(style.clone());
        }
        self.inner.finish_with_message(message);
    }

    fn sync(&mut self) {
        self.inner.inc(self.inc_since_sync);
        self.inc_since_sync = 0;
        self.last_sync = Instant::now();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.sync();
    }
}
