//! End-to-end tests over the full pipeline: decoded title-block content in,
//! match results and reports out. Documents are served by an in-memory
//! provider so the scenarios stay deterministic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;

use drawcheck::batch::NoopProgress;
use drawcheck::{
    BatchProcessor, CropContent, CropRect, DocumentProvider, DocumentSource, ExtractError,
    JobStatus, MatchLevel, PageGeometry, RegisterIndex, RegisterLayout, RegisterRow, RegisterSink,
    ReportBuilder, SourceError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default)]
struct Drawing {
    grid: Vec<Vec<String>>,
    text: String,
    pages: usize,
    /// Delay before the document opens, to force out-of-order completion.
    delay: Duration,
}

struct MemorySource {
    drawing: Drawing,
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> Result<usize, ExtractError> {
        Ok(self.drawing.pages)
    }

    fn page_geometry(&self, _page: usize) -> Result<PageGeometry, ExtractError> {
        Ok(PageGeometry {
            width: 1190.0,
            height: 841.0,
        })
    }

    fn crop(&self, _page: usize, _rect: CropRect) -> Result<CropContent, ExtractError> {
        Ok(CropContent {
            tables: vec![self.drawing.grid.clone()],
            text: self.drawing.text.clone(),
        })
    }
}

struct MemoryProvider {
    drawings: HashMap<String, Drawing>,
}

impl MemoryProvider {
    fn new() -> Self {
        Self {
            drawings: HashMap::new(),
        }
    }

    fn with(mut self, stem: &str, drawing: Drawing) -> Self {
        self.drawings.insert(stem.to_string(), drawing);
        self
    }
}

impl DocumentProvider for MemoryProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn DocumentSource>, SourceError> {
        let stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match self.drawings.get(&stem) {
            Some(drawing) => {
                if !drawing.delay.is_zero() {
                    std::thread::sleep(drawing.delay);
                }
                Ok(Box::new(MemorySource {
                    drawing: drawing.clone(),
                }))
            }
            None => Err(SourceError::OpenDocument {
                path: path.to_path_buf(),
                reason: "unknown test document".to_string(),
            }),
        }
    }
}

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn bracket_drawing(version: &str) -> Drawing {
    Drawing {
        grid: grid(&[
            &["名称", "Bracket", "图号", "DWG-1"],
            &["加工", "cnc", "材料", "aluminum"],
            &["颜色", "black", "表面处理", "matte"],
            &["版本", version],
        ]),
        text: String::new(),
        pages: 1,
        delay: Duration::ZERO,
    }
}

fn bracket_row(version: &str) -> RegisterRow {
    RegisterRow {
        name: "Bracket".to_string(),
        spec: "DWG-1".to_string(),
        // The register folds color and surface into one free-text part.
        description: "cnc,aluminum,black matte".to_string(),
        version: version.to_string(),
        title: String::new(),
        source_row_number: 24,
    }
}

#[derive(Default)]
struct MemorySink {
    writes: Vec<(u32, u32, String)>,
    inserts: Vec<(u32, u32)>,
}

impl RegisterSink for MemorySink {
    fn write_cell(
        &mut self,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), drawcheck::RegisterError> {
        self.writes.push((row, column, value.to_string()));
        Ok(())
    }

    fn insert_rows(&mut self, after_row: u32, count: u32) -> Result<(), drawcheck::RegisterError> {
        self.inserts.push((after_row, count));
        Ok(())
    }
}

#[test]
fn full_match_despite_description_phrasing() {
    init_tracing();
    let provider = MemoryProvider::new().with("bracket", bracket_drawing("V1.0"));
    let processor = BatchProcessor::new(Arc::new(provider));

    let (jobs, summary) = processor
        .run_compare(
            &[PathBuf::from("bracket.pdf")],
            vec![bracket_row("V1.0")],
            &NoopProgress,
        )
        .unwrap();

    assert_eq!(summary.success, 1);
    let result = jobs[0].match_result.as_ref().unwrap();
    assert_eq!(result.level, MatchLevel::Full);
    assert_eq!(result.matched_row, Some(24));
    assert!(result.discrepancies.is_empty());
}

#[test]
fn version_mismatch_is_partial_with_exact_message() {
    init_tracing();
    let provider = MemoryProvider::new().with("bracket", bracket_drawing("V1.1"));
    let processor = BatchProcessor::new(Arc::new(provider));

    let (jobs, _) = processor
        .run_compare(
            &[PathBuf::from("bracket.pdf")],
            vec![bracket_row("V1.0")],
            &NoopProgress,
        )
        .unwrap();

    let result = jobs[0].match_result.as_ref().unwrap();
    assert_eq!(result.level, MatchLevel::Partial);
    assert_eq!(
        result.discrepancies,
        vec!["version mismatch: Excel(V1.0) != PDF(V1.1)".to_string()]
    );
}

#[test]
fn stub_table_version_reconciled_from_crop_text() {
    init_tracing();
    // Table pass finds only "V0"; the crop text carries the full version.
    let mut drawing = bracket_drawing("V0");
    drawing.text = "some notes\nVersion: V0.3\n".to_string();

    let provider = MemoryProvider::new().with("bracket", drawing);
    let processor = BatchProcessor::new(Arc::new(provider));

    let (jobs, _) = processor
        .run_compare(
            &[PathBuf::from("bracket.pdf")],
            vec![bracket_row("V0.3")],
            &NoopProgress,
        )
        .unwrap();

    let result = jobs[0].match_result.as_ref().unwrap();
    assert_eq!(result.level, MatchLevel::Full, "{:?}", result.discrepancies);
}

#[test]
fn unmatched_drawing_reports_no_corresponding_record() {
    init_tracing();
    let mut drawing = bracket_drawing("V1.0");
    drawing.grid[0] = vec![
        "名称".to_string(),
        "Unknown".to_string(),
        "图号".to_string(),
        "DWG-999".to_string(),
    ];

    let provider = MemoryProvider::new().with("unknown", drawing);
    let processor = BatchProcessor::new(Arc::new(provider));

    let (jobs, _) = processor
        .run_compare(
            &[PathBuf::from("unknown.pdf")],
            vec![bracket_row("V1.0")],
            &NoopProgress,
        )
        .unwrap();

    let result = jobs[0].match_result.as_ref().unwrap();
    assert_eq!(result.level, MatchLevel::None);
    assert_eq!(
        result.discrepancies,
        vec!["no corresponding record found".to_string()]
    );
}

#[test]
fn fill_preserves_submission_order_under_reversed_completion() {
    init_tracing();
    let mut slow = bracket_drawing("V1.0");
    slow.delay = Duration::from_millis(150);
    let mut second = bracket_drawing("V2.0");
    second.grid[0][1] = "Cover".to_string();

    let provider = MemoryProvider::new().with("slow", slow).with("cover", second);
    let processor = BatchProcessor::new(Arc::new(provider));
    let layout = RegisterLayout::default();
    let mut sink = MemorySink::default();

    let documents = vec![PathBuf::from("slow.pdf"), PathBuf::from("cover.pdf")];
    let (jobs, summary) = processor
        .run_fill(&documents, &layout, &mut sink, &NoopProgress)
        .unwrap();

    assert_eq!(summary.success, 2);
    assert_eq!(jobs[0].file_name(), "slow.pdf");
    assert_eq!(jobs[1].file_name(), "cover.pdf");

    // First document goes to the first data row even though it finished last.
    let mut names: Vec<(u32, String)> = sink
        .writes
        .iter()
        .filter(|(_, col, _)| *col == layout.name_col)
        .map(|(row, _, value)| (*row, value.clone()))
        .collect();
    names.sort_by_key(|(row, _)| *row);
    assert_eq!(
        names,
        vec![(24, "Bracket".to_string()), (25, "Cover".to_string())]
    );

    // Two documents fit the default fifteen data rows, so nothing is inserted.
    assert!(sink.inserts.is_empty());

    // Description is rebuilt from the extracted fields.
    let descriptions: Vec<&String> = sink
        .writes
        .iter()
        .filter(|(row, col, _)| *row == 24 && *col == layout.desc_col)
        .map(|(_, _, value)| value)
        .collect();
    assert_eq!(descriptions, vec!["cnc,aluminum,black,matte"]);
}

#[test]
fn failed_document_does_not_block_the_batch() {
    init_tracing();
    let provider = MemoryProvider::new().with("bracket", bracket_drawing("V1.0"));
    let processor = BatchProcessor::new(Arc::new(provider));
    let mut sink = MemorySink::default();

    let documents = vec![PathBuf::from("missing.pdf"), PathBuf::from("bracket.pdf")];
    let (jobs, summary) = processor
        .run_fill(&documents, &RegisterLayout::default(), &mut sink, &NoopProgress)
        .unwrap();

    assert_eq!(summary.error, 1);
    assert_eq!(summary.success, 1);
    assert_eq!(jobs[0].status, JobStatus::Error);
    assert_eq!(jobs[1].status, JobStatus::Success);

    // Row 24 belongs to the failed document and stays blank.
    assert!(sink.writes.iter().all(|(row, _, _)| *row == 25));
}

#[test]
fn multi_page_drawing_flagged_for_review_in_report() {
    init_tracing();
    let mut drawing = bracket_drawing("V1.0");
    drawing.pages = 3;

    let provider = MemoryProvider::new().with("bracket", drawing);
    let processor = BatchProcessor::new(Arc::new(provider));
    let mut sink = MemorySink::default();

    let (jobs, summary) = processor
        .run_fill(
            &[PathBuf::from("bracket.pdf")],
            &RegisterLayout::default(),
            &mut sink,
            &NoopProgress,
        )
        .unwrap();

    assert_eq!(summary.warning, 1);
    assert_eq!(summary.multi_page, 1);

    let generated_at = chrono::Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let report = ReportBuilder::new().fill_report(&jobs, &summary, generated_at);
    assert!(report.contains("Multi-page drawings needing manual review:"));
    assert!(report.contains("- bracket.pdf (3 pages)"));
    assert!(report.contains("  Status: warning"));
}

#[test]
fn comparison_report_covers_partial_and_clean_runs() {
    init_tracing();
    let provider = MemoryProvider::new().with("bracket", bracket_drawing("V1.1"));
    let processor = BatchProcessor::new(Arc::new(provider));

    let (jobs, _) = processor
        .run_compare(
            &[PathBuf::from("bracket.pdf")],
            vec![bracket_row("V1.0")],
            &NoopProgress,
        )
        .unwrap();

    let index = RegisterIndex::build(vec![bracket_row("V1.0")]);
    let generated_at = chrono::Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let builder = ReportBuilder::new();

    let report = builder.comparison_report(&jobs, &index, generated_at);
    assert!(report.contains("Found 1 issues:"));
    assert!(report.contains("Register row: 24"));
    assert!(report.contains("- version mismatch: Excel(V1.0) != PDF(V1.1)"));

    // A clean run produces the all-clear form instead.
    let provider = MemoryProvider::new().with("bracket", bracket_drawing("V1.0"));
    let processor = BatchProcessor::new(Arc::new(provider));
    let (jobs, _) = processor
        .run_compare(
            &[PathBuf::from("bracket.pdf")],
            vec![bracket_row("V1.0")],
            &NoopProgress,
        )
        .unwrap();

    let report = builder.comparison_report(&jobs, &index, generated_at);
    assert!(report.contains("All drawings match the register."));
}
