use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use tracing::info_span;

use crate::batch::job::{sort_to_submission_order, BatchJob, BatchSummary};
use crate::batch::pool::{worker_count_for, ExtractJob, WorkerPool};
use crate::batch::progress::ProgressReporter;
use crate::config::RegisterLayout;
use crate::error::{DrawcheckError, RegisterError, WorkerError};
use crate::normalize::build_description;
use crate::register::{ColumnRole, RegisterIndex, RegisterRow, RegisterSink};
use crate::source::DocumentProvider;

/// Drives a batch of drawing documents through the worker pool, in one of two
/// modes: fill writes extracted records into blank register rows, compare
/// checks them against an existing register snapshot.
pub struct BatchProcessor {
    provider: Arc<dyn DocumentProvider>,
}

impl BatchProcessor {
    pub fn new(provider: Arc<dyn DocumentProvider>) -> Self {
        Self { provider }
    }

    /// Extracts every document and writes the records into the register's
    /// data rows, first document to first data row. Register rows are
    /// inserted when there are more documents than blank rows.
    pub fn run_fill(
        &self,
        documents: &[PathBuf],
        layout: &RegisterLayout,
        sink: &mut dyn RegisterSink,
        progress: &dyn ProgressReporter,
    ) -> Result<(Vec<BatchJob>, BatchSummary), DrawcheckError> {
        let _span = info_span!("batch.fill").entered();

        let jobs = self.run_jobs(documents, None, progress)?;
        self.write_records(&jobs, layout, sink)?;

        let summary = BatchSummary::from_jobs(&jobs);
        Ok((jobs, summary))
    }

    /// Extracts every document and matches each record against the register
    /// snapshot. Never writes to the register.
    pub fn run_compare(
        &self,
        documents: &[PathBuf],
        snapshot: Vec<RegisterRow>,
        progress: &dyn ProgressReporter,
    ) -> Result<(Vec<BatchJob>, BatchSummary), DrawcheckError> {
        let _span = info_span!("batch.compare").entered();

        let rows: Vec<RegisterRow> = snapshot
            .into_iter()
            .filter(RegisterRow::has_identity)
            .collect();
        if rows.is_empty() {
            return Err(RegisterError::EmptySnapshot.into());
        }
        let index = Arc::new(RegisterIndex::build(rows));

        let jobs = self.run_jobs(documents, Some(index), progress)?;
        let summary = BatchSummary::from_jobs(&jobs);
        Ok((jobs, summary))
    }

    /// Runs extraction over the pool and returns the jobs in submission
    /// order. This is the single aggregation point: workers never touch
    /// shared results, and progress is reported from here only.
    fn run_jobs(
        &self,
        documents: &[PathBuf],
        register: Option<Arc<RegisterIndex>>,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<BatchJob>, DrawcheckError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let total = documents.len();
        let worker_count = worker_count_for(total);
        info!("Processing {} documents with {} workers", total, worker_count);

        let pool = WorkerPool::new(Arc::clone(&self.provider), register, worker_count);

        let mut jobs = Vec::with_capacity(total);
        for (index, path) in documents.iter().enumerate() {
            // Drain finished jobs before each submit so neither channel
            // backs up while submission is still in progress.
            while let Some(done) = pool.try_recv_result() {
                jobs.push(done);
                progress.report(jobs.len(), total);
            }

            pool.submit(ExtractJob {
                index,
                path: path.clone(),
            })?;
        }

        while jobs.len() < total {
            match pool.recv_result() {
                Some(done) => {
                    jobs.push(done);
                    progress.report(jobs.len(), total);
                }
                None => return Err(WorkerError::ChannelClosed.into()),
            }
        }

        pool.shutdown();
        pool.wait();

        // Workers finish in arbitrary order; the register is filled in
        // submission order.
        sort_to_submission_order(&mut jobs);
        Ok(jobs)
    }

    fn write_records(
        &self,
        jobs: &[BatchJob],
        layout: &RegisterLayout,
        sink: &mut dyn RegisterSink,
    ) -> Result<(), DrawcheckError> {
        let available = layout.available_rows() as usize;
        if jobs.len() > available {
            let extra = (jobs.len() - available) as u32;
            warn!(
                "Register has {} blank data rows for {} documents, inserting {}",
                available,
                jobs.len(),
                extra
            );
            // Insert below the first data row so its formatting carries over.
            sink.insert_rows(layout.data_start_row(), extra)?;
        }

        for (i, job) in jobs.iter().enumerate() {
            let record = match &job.record {
                Some(record) => record,
                None => continue,
            };
            let row = layout.data_start_row() + i as u32;

            let fields = [
                (ColumnRole::Name, record.name.as_str()),
                (ColumnRole::Spec, record.drawing_no.as_str()),
                (ColumnRole::Version, record.version.as_str()),
                (ColumnRole::Title, record.title.as_str()),
            ];
            for (role, value) in fields {
                if !value.is_empty() {
                    sink.write_cell(row, layout.column_for(role), value)?;
                }
            }

            let description = build_description(record);
            if !description.is_empty() {
                sink.write_cell(row, layout.column_for(ColumnRole::Description), &description)?;
            }
        }

        Ok(())
    }
}
