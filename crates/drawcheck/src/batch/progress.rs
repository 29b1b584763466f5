/// Receives the monotonically increasing processed count as the batch
/// aggregator drains completed jobs. Only ever called from the single
/// aggregation point, never from workers.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, processed: usize, total: usize);
}

/// No-op reporter for unit tests and headless runs.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _processed: usize, _total: usize) {}
}
