//! Batch progress reporting.

/// Receives batch progress as a percentage in [0, 100].
pub trait ProgressObserver: Send + Sync {
    /// Called after each item completes and once more with `100.0` at the end.
    fn on_progress(&self, percent: f64);
}

impl<F> ProgressObserver for F
where
    F: Fn(f64) + Send + Sync,
{
    fn on_progress(&self, percent: f64) {
        self(percent)
    }
}

/// Observer that ignores all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _percent: f64) {}
}

/// Turns item completions into non-decreasing percentages.
pub struct ProgressTracker<'a> {
    observer: &'a dyn ProgressObserver,
    total: usize,
    completed: usize,
    last: f64,
}

impl<'a> ProgressTracker<'a> {
    /// Track a batch of `total` items.
    pub fn new(observer: &'a dyn ProgressObserver, total: usize) -> Self {
        Self {
            observer,
            total,
            completed: 0,
            last: 0.0,
        }
    }

    /// Percentage for `completed` of `total` items. An empty batch is complete.
    pub fn percent(completed: usize, total: usize) -> f64 {
        if total == 0 {
            return 100.0;
        }
        (completed.min(total) as f64 / total as f64) * 100.0
    }

    /// Record one finished item (success or failure) and notify the observer.
    pub fn advance(&mut self) -> f64 {
        self.completed += 1;
        let percent = Self::percent(self.completed, self.total).max(self.last);
        self.last = percent;
        self.observer.on_progress(percent);
        percent
    }

    /// Items completed so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Final notification; always reports exactly 100.
    pub fn finish(mut self) {
        self.last = 100.0;
        self.observer.on_progress(self.last);
    }
}
