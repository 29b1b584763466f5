use std::collections::HashSet;

use log::debug;
use tracing::info_span;

use crate::extract::DocumentRecord;
use crate::normalize::{build_description, description_parts, normalize_description};
use crate::register::{RegisterIndex, RegisterRow};

use super::result::{MatchLevel, MatchResult};

pub const NO_MATCH_MESSAGE: &str = "no corresponding record found";

/// A scored register row candidate for one document.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub row_index: usize,
    pub result: MatchResult,
}

/// Finds and scores register rows for extracted document records.
#[derive(Debug, Default)]
pub struct MatchEngine;

impl MatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compares one register row against a document record.
    ///
    /// Name and spec are the strong fields: when neither matches the result
    /// is [`MatchLevel::None`] with no discrepancies and the row is not a
    /// candidate at all. Otherwise every mismatching field adds a discrepancy
    /// and the level is Full only when none accumulated.
    pub fn compare_record(&self, row: &RegisterRow, doc: &DocumentRecord) -> MatchResult {
        let name_match = row.name == doc.name;
        let spec_match = row.spec == doc.drawing_no;

        if !name_match && !spec_match {
            return MatchResult::none(Vec::new());
        }

        let mut discrepancies = Vec::new();

        if !name_match {
            discrepancies.push(format!(
                "name mismatch: Excel({}) != PDF({})",
                row.name, doc.name
            ));
        }
        if !spec_match {
            discrepancies.push(format!(
                "spec mismatch: Excel({}) != PDF({})",
                row.spec, doc.drawing_no
            ));
        }
        if row.version != doc.version {
            discrepancies.push(format!(
                "version mismatch: Excel({}) != PDF({})",
                row.version, doc.version
            ));
        }
        // Title is only compared when the drawing actually carries one.
        if !doc.title.is_empty() && row.title != doc.title {
            discrepancies.push(format!(
                "title mismatch: Excel({}) != PDF({})",
                row.title, doc.title
            ));
        }

        self.compare_descriptions(row, doc, &mut discrepancies);

        let level = if discrepancies.is_empty() {
            MatchLevel::Full
        } else {
            MatchLevel::Partial
        };

        MatchResult {
            level,
            discrepancies,
            matched_row: Some(row.source_row_number),
        }
    }

    /// Two independent one-way diffs over normalized description parts, not a
    /// symmetric diff: parts the drawing has but the register lacks are
    /// "missing", parts the register has but the drawing lacks are "extra".
    fn compare_descriptions(
        &self,
        row: &RegisterRow,
        doc: &DocumentRecord,
        discrepancies: &mut Vec<String>,
    ) {
        let doc_norm = normalize_description(&build_description(doc));
        let row_norm = normalize_description(&row.description);

        let doc_parts = description_parts(&doc_norm);
        let row_parts = description_parts(&row_norm);

        let missing: Vec<&String> = doc_parts
            .iter()
            .filter(|p| !row_parts.contains(p))
            .collect();
        let extra: Vec<&String> = row_parts
            .iter()
            .filter(|p| !doc_parts.contains(p))
            .collect();

        if !missing.is_empty() {
            discrepancies.push(format!(
                "description mismatch: Excel missing parts: {}",
                join(&missing)
            ));
        }
        if !extra.is_empty() {
            discrepancies.push(format!(
                "description mismatch: Excel has extra parts: {}",
                join(&extra)
            ));
        }
    }

    /// Probes the index in fixed priority order: the `name|spec` composite,
    /// then name, then spec, then title — least ambiguous key first, title
    /// last as the weakest signal. Rows already scored by an earlier probe
    /// are skipped, rows where neither strong field matched are suppressed,
    /// and the whole search stops at the first Full match.
    pub fn find_candidates(&self, doc: &DocumentRecord, index: &RegisterIndex) -> Vec<Candidate> {
        let name = doc.name.trim();
        let spec = doc.drawing_no.trim();
        let title = doc.title.trim();

        let mut candidates = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        let probes: [&[usize]; 4] = [
            if !name.is_empty() && !spec.is_empty() {
                index.by_name_spec(name, spec)
            } else {
                &[]
            },
            if !name.is_empty() {
                index.by_name(name)
            } else {
                &[]
            },
            if !spec.is_empty() {
                index.by_spec(spec)
            } else {
                &[]
            },
            if !title.is_empty() {
                index.by_title(title)
            } else {
                &[]
            },
        ];

        for probe in probes {
            for &row_index in probe {
                if !seen.insert(row_index) {
                    continue;
                }

                let result = self.compare_record(index.row(row_index), doc);
                if result.level == MatchLevel::None {
                    continue;
                }

                let is_full = result.is_full();
                candidates.push(Candidate { row_index, result });
                if is_full {
                    return candidates;
                }
            }
        }

        candidates
    }

    /// Picks the best candidate: a Full match if any, otherwise the Partial
    /// with the fewest discrepancies (first found wins ties, i.e. probe
    /// order), otherwise a None result with a single "not found" message.
    pub fn select_best_match(&self, candidates: &[Candidate]) -> MatchResult {
        if let Some(full) = candidates.iter().find(|c| c.result.is_full()) {
            return full.result.clone();
        }

        let best = candidates.iter().min_by_key(|c| c.result.discrepancies.len());
        match best {
            Some(candidate) => candidate.result.clone(),
            None => MatchResult::none(vec![NO_MATCH_MESSAGE.to_string()]),
        }
    }

    /// Full matching pipeline for one document.
    pub fn match_document(&self, doc: &DocumentRecord, index: &RegisterIndex) -> MatchResult {
        let _span = info_span!("matching.document").entered();

        let candidates = self.find_candidates(doc, index);
        let result = self.select_best_match(&candidates);
        debug!(
            "Matched '{}' -> {:?} (row {:?}, {} discrepancies)",
            doc.drawing_no,
            result.level,
            result.matched_row,
            result.discrepancies.len()
        );
        result
    }
}

fn join(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
