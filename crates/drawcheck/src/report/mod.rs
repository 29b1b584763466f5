//! Plain-text run reports, one per batch.
//!
//! Reports are plain UTF-8 text meant to be attached to a review ticket or
//! read in a terminal. Layout: a banner with the generation time, aggregate
//! counts, then one block per document separated by a rule.

use chrono::{DateTime, Local};

use crate::batch::{BatchJob, BatchSummary, JobStatus};
use crate::matching::MatchLevel;
use crate::normalize::build_description;
use crate::register::RegisterIndex;

const BANNER: &str = "======================================================================";
const RULE: &str = "----------------------------------------------------------------------";

pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Report for a fill run: counts, multi-page documents that need manual
    /// review, then the extracted fields per document.
    pub fn fill_report(
        &self,
        jobs: &[BatchJob],
        summary: &BatchSummary,
        generated_at: DateTime<Local>,
    ) -> String {
        let mut out = String::new();

        self.write_banner(&mut out, "Drawing extraction and register fill report", generated_at);

        out.push_str("Summary:\n");
        out.push_str(&format!("  Total documents: {}\n", summary.total));
        out.push_str(&format!("  Success: {}\n", summary.success));
        out.push_str(&format!("  Warning: {}\n", summary.warning));
        out.push_str(&format!("  Error: {}\n", summary.error));
        out.push_str(&format!("  Multi-page: {}\n\n", summary.multi_page));

        if summary.multi_page > 0 {
            out.push_str("Multi-page drawings needing manual review:\n");
            for job in jobs.iter().filter(|j| j.page_count() > 1) {
                out.push_str(&format!(
                    "  - {} ({} pages)\n",
                    job.file_name(),
                    job.page_count()
                ));
            }
            out.push('\n');
        }

        out.push_str("Details:\n\n");
        for (i, job) in jobs.iter().enumerate() {
            out.push_str(&format!("Document #{}:\n", i + 1));
            out.push_str(&format!("  File: {}\n", job.file_name()));
            out.push_str(&format!("  Status: {}\n", job.status.label()));
            if let Some(message) = &job.message {
                out.push_str(&format!("  Message: {}\n", message));
            }
            out.push_str(&format!("  Pages: {}\n", job.page_count()));

            if let Some(record) = &job.record {
                out.push_str("  Extracted fields:\n");
                let fields = [
                    ("name", record.name.as_str()),
                    ("drawing no", record.drawing_no.as_str()),
                    ("processing", record.processing.as_str()),
                    ("material", record.material.as_str()),
                    ("color", record.color.as_str()),
                    ("surface", record.surface.as_str()),
                    ("version", record.version.as_str()),
                    ("title", record.title.as_str()),
                ];
                for (label, value) in fields {
                    if !value.is_empty() {
                        out.push_str(&format!("    {}: {}\n", label, value));
                    }
                }
            }

            out.push_str(RULE);
            out.push('\n');
        }

        out
    }

    /// Report for a compare run. Only documents with a problem appear: failed
    /// extractions and anything short of a full match.
    pub fn comparison_report(
        &self,
        jobs: &[BatchJob],
        index: &RegisterIndex,
        generated_at: DateTime<Local>,
    ) -> String {
        let mut out = String::new();

        self.write_banner(&mut out, "Register and drawing comparison report", generated_at);

        let issues: Vec<&BatchJob> = jobs.iter().filter(|job| has_issue(job)).collect();

        if issues.is_empty() {
            out.push_str("All drawings match the register. No discrepancies found.\n");
            return out;
        }

        out.push_str(&format!("Found {} issues:\n\n", issues.len()));
        for (i, job) in issues.iter().enumerate() {
            out.push_str(&format!("Issue #{}:\n", i + 1));
            out.push_str(&format!("  File: {}\n", job.file_name()));
            out.push_str(&format!("  Path: {}\n", job.document.display()));

            if job.status == JobStatus::Error {
                out.push_str("  Match type: extraction failed\n");
                if let Some(message) = &job.message {
                    out.push_str(&format!("  Message: {}\n", message));
                }
                out.push_str(RULE);
                out.push('\n');
                continue;
            }

            let Some(result) = &job.match_result else {
                out.push_str(RULE);
                out.push('\n');
                continue;
            };

            match result.matched_row {
                Some(row) => out.push_str(&format!("  Register row: {}\n", row)),
                None => out.push_str("  Register row: none\n"),
            }
            out.push_str(&format!("  Match type: {}\n", result.level.label()));

            let matched = result
                .matched_row
                .and_then(|row| index.rows().iter().find(|r| r.source_row_number == row));
            if let (Some(record), Some(row)) = (&job.record, matched) {
                let drawing_desc = build_description(record);
                if !row.description.is_empty() || !drawing_desc.is_empty() {
                    out.push_str(&format!("  Register description: {}\n", row.description));
                    out.push_str(&format!("  Drawing description: {}\n", drawing_desc));
                }
                if !row.title.is_empty() || !record.title.is_empty() {
                    out.push_str(&format!("  Register title: {}\n", row.title));
                    out.push_str(&format!("  Drawing title: {}\n", record.title));
                }
            }

            if !result.discrepancies.is_empty() {
                out.push_str("  Discrepancies:\n");
                for message in &result.discrepancies {
                    out.push_str(&format!("    - {}\n", message));
                }
            }

            out.push_str(RULE);
            out.push('\n');
        }

        out
    }

    fn write_banner(&self, out: &mut String, title: &str, generated_at: DateTime<Local>) {
        out.push_str(BANNER);
        out.push('\n');
        out.push_str(title);
        out.push('\n');
        out.push_str(&format!(
            "Generated: {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(BANNER);
        out.push_str("\n\n");
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn has_issue(job: &BatchJob) -> bool {
    if job.status == JobStatus::Error {
        return true;
    }
    match &job.match_result {
        Some(result) => result.level != MatchLevel::Full,
        None => false,
    }
}
