use std::path::PathBuf;

use crate::extract::DocumentRecord;
use crate::matching::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    /// Processed, but flagged for manual review (multi-page drawing).
    Warning,
    Error,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Warning => "warning",
            JobStatus::Error => "error",
        }
    }
}

/// One processed document in a batch. Jobs are collected back into original
/// submission order regardless of which worker finished first.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Submission index, 0-based.
    pub index: usize,
    pub document: PathBuf,
    /// Absent when extraction failed.
    pub record: Option<DocumentRecord>,
    pub status: JobStatus,
    pub message: Option<String>,
    /// Present in compare mode only.
    pub match_result: Option<MatchResult>,
}

impl BatchJob {
    pub fn completed(index: usize, document: PathBuf, record: DocumentRecord) -> Self {
        let (status, message) = if record.page_count > 1 {
            (
                JobStatus::Warning,
                Some(format!(
                    "multi-page drawing ({} pages), needs manual review",
                    record.page_count
                )),
            )
        } else {
            (JobStatus::Success, None)
        };

        Self {
            index,
            document,
            record: Some(record),
            status,
            message,
            match_result: None,
        }
    }

    pub fn failed(index: usize, document: PathBuf, message: String) -> Self {
        Self {
            index,
            document,
            record: None,
            status: JobStatus::Error,
            message: Some(message),
            match_result: None,
        }
    }

    /// File name of the source document, for reports and logs.
    pub fn file_name(&self) -> String {
        self.document
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.document.display().to_string())
    }

    pub fn page_count(&self) -> usize {
        self.record.as_ref().map(|r| r.page_count).unwrap_or(0)
    }
}

/// Aggregate counts over a settled batch, computed once after all jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub warning: usize,
    pub error: usize,
    pub multi_page: usize,
}

impl BatchSummary {
    pub fn from_jobs(jobs: &[BatchJob]) -> Self {
        Self {
            total: jobs.len(),
            success: jobs.iter().filter(|j| j.status == JobStatus::Success).count(),
            warning: jobs.iter().filter(|j| j.status == JobStatus::Warning).count(),
            error: jobs.iter().filter(|j| j.status == JobStatus::Error).count(),
            multi_page: jobs.iter().filter(|j| j.page_count() > 1).count(),
        }
    }
}

/// Keep this separate from `BatchJob` construction: tests simulate arbitrary
/// completion orders and re-sort through the same path production uses.
pub fn sort_to_submission_order(jobs: &mut [BatchJob]) {
    jobs.sort_by_key(|job| job.index);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_pages(page_count: usize) -> DocumentRecord {
        DocumentRecord {
            page_count,
            ..DocumentRecord::default()
        }
    }

    #[test]
    fn test_single_page_job_is_success() {
        let job = BatchJob::completed(0, PathBuf::from("a.pdf"), record_with_pages(1));
        assert_eq!(job.status, JobStatus::Success);
        assert!(job.message.is_none());
    }

    #[test]
    fn test_multi_page_job_is_warning() {
        let job = BatchJob::completed(0, PathBuf::from("a.pdf"), record_with_pages(3));
        assert_eq!(job.status, JobStatus::Warning);
        assert_eq!(
            job.message.as_deref(),
            Some("multi-page drawing (3 pages), needs manual review")
        );
    }

    #[test]
    fn test_failed_job() {
        let job = BatchJob::failed(2, PathBuf::from("bad.pdf"), "decode failed".to_string());
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.record.is_none());
        assert_eq!(job.page_count(), 0);
    }

    #[test]
    fn test_file_name() {
        let job = BatchJob::completed(0, PathBuf::from("/deep/dir/a.pdf"), record_with_pages(1));
        assert_eq!(job.file_name(), "a.pdf");
    }

    #[test]
    fn test_summary_counts() {
        let jobs = vec![
            BatchJob::completed(0, PathBuf::from("a.pdf"), record_with_pages(1)),
            BatchJob::completed(1, PathBuf::from("b.pdf"), record_with_pages(4)),
            BatchJob::failed(2, PathBuf::from("c.pdf"), "boom".to_string()),
        ];

        let summary = BatchSummary::from_jobs(&jobs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.multi_page, 1);
    }

    #[test]
    fn test_sort_to_submission_order() {
        let mut jobs = vec![
            BatchJob::completed(2, PathBuf::from("c.pdf"), record_with_pages(1)),
            BatchJob::completed(0, PathBuf::from("a.pdf"), record_with_pages(1)),
            BatchJob::completed(1, PathBuf::from("b.pdf"), record_with_pages(1)),
        ];

        sort_to_submission_order(&mut jobs);
        let names: Vec<String> = jobs.iter().map(|j| j.file_name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }
}
