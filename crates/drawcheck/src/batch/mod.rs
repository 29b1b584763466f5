pub mod job;
pub mod pool;
pub mod progress;
pub mod runner;

pub use job::{BatchJob, BatchSummary, JobStatus};
pub use pool::{worker_count_for, ExtractJob, WorkerPool};
pub use progress::{NoopProgress, ProgressReporter};
pub use runner::BatchProcessor;
