use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};

use crate::batch::job::BatchJob;
use crate::error::WorkerError;
use crate::extract::RecordExtractor;
use crate::matching::MatchEngine;
use crate::register::RegisterIndex;
use crate::source::DocumentProvider;

/// Ceiling on worker threads regardless of core count.
const MAX_WORKERS: usize = 16;

/// Worker count for a batch of `job_count` documents: twice the core count,
/// capped at [`MAX_WORKERS`] and at the number of jobs.
pub fn worker_count_for(job_count: usize) -> usize {
    (num_cpus::get() * 2).min(MAX_WORKERS).min(job_count).max(1)
}

/// One document queued for extraction. `index` is the submission position and
/// travels with the job so results can be put back in order.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub index: usize,
    pub path: PathBuf,
}

pub struct WorkerPool {
    job_sender: Sender<ExtractJob>,
    result_receiver: Receiver<BatchJob>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Starts `worker_count` extraction workers. When `register` is given the
    /// workers also match each extracted record against it.
    ///
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn new(
        provider: Arc<dyn DocumentProvider>,
        register: Option<Arc<RegisterIndex>>,
        worker_count: usize,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let (job_sender, job_receiver) = bounded::<ExtractJob>(worker_count * 2);
        let (result_sender, result_receiver) = bounded::<BatchJob>(worker_count * 2);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let shutdown_flag = Arc::clone(&shutdown);
            let worker_provider = Arc::clone(&provider);
            let worker_register = register.clone();

            let handle = thread::spawn(move || {
                run_worker(
                    worker_id,
                    job_rx,
                    result_tx,
                    shutdown_flag,
                    worker_provider,
                    worker_register,
                );
            });

            workers.push(handle);
        }

        info!("Started {} workers", worker_count);

        Self {
            job_sender,
            result_receiver,
            workers,
            shutdown,
        }
    }

    pub fn submit(&self, job: ExtractJob) -> Result<(), WorkerError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(WorkerError::ChannelClosed);
        }

        self.job_sender
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    pub fn try_recv_result(&self) -> Option<BatchJob> {
        self.result_receiver.try_recv().ok()
    }

    pub fn recv_result(&self) -> Option<BatchJob> {
        self.result_receiver.recv().ok()
    }

    pub fn shutdown(&self) {
        info!("Shutting down worker pool...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn wait(self) {
        // Drop sender to signal workers to exit
        drop(self.job_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<ExtractJob>,
    result_sender: Sender<BatchJob>,
    shutdown: Arc<AtomicBool>,
    provider: Arc<dyn DocumentProvider>,
    register: Option<Arc<RegisterIndex>>,
) {
    debug!("Worker {} started", worker_id);

    // Patterns are compiled once per worker, not once per document.
    let extractor = RecordExtractor::new();
    let engine = MatchEngine::new();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Worker {} received shutdown signal", worker_id);
            break;
        }

        match job_receiver.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(job) => {
                debug!("Worker {} processing document: {:?}", worker_id, job.path);

                let mut result = match provider.open(&job.path) {
                    Ok(source) => match extractor.extract(source.as_ref()) {
                        Ok(record) => BatchJob::completed(job.index, job.path, record),
                        Err(e) => BatchJob::failed(job.index, job.path, e.to_string()),
                    },
                    Err(e) => BatchJob::failed(job.index, job.path, e.to_string()),
                };

                if let (Some(index), Some(record)) = (register.as_deref(), result.record.as_ref())
                {
                    result.match_result = Some(engine.match_document(record, index));
                }

                if let Err(e) = result_sender.send(result) {
                    error!("Worker {} failed to send result: {}", worker_id, e);
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                continue;
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                debug!("Worker {} job channel disconnected", worker_id);
                break;
            }
        }
    }

    debug!("Worker {} stopped", worker_id);
}
