use log::debug;
use regex::Regex;
use tracing::info_span;

use crate::error::ExtractError;
use crate::extract::grid::{build_grid, find_in_grid};
use crate::extract::record::DocumentRecord;
use crate::extract::rules;
use crate::source::{title_block_rect, CropContent, DocumentSource};

/// Derives a [`DocumentRecord`] from the title block of a decoded drawing.
///
/// Extraction is layered: a table pass over the merged cell grid, a version
/// reconciliation between the table and the raw crop text, and a
/// label-anchored text fallback for fields the table pass left empty.
pub struct RecordExtractor {
    /// `V1.0a`, `Rev 2`, `V0 . 1` — prefix, numeral with optional spaced
    /// dots, trailing letters.
    version_pattern: Regex,
    /// Same numeral shape, anchored by a version label in running text.
    text_version_pattern: Regex,
    dot_spacing: Regex,
    /// Trailing continuation particles on the processing field ("done/etc.").
    trailing_particle: Regex,
    fallback_name: Regex,
    fallback_drawing_no: Regex,
    fallback_processing: Regex,
    fallback_material: Regex,
    fallback_color: Regex,
    fallback_surface: Regex,
    fallback_title: Regex,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    pub fn new() -> Self {
        // All patterns are fixed strings, compiled once per extractor.
        let compile = |pattern: &str| Regex::new(pattern).expect("valid extraction regex");

        Self {
            version_pattern: compile(r"(?i)(V|Rev)\.?\s*(\d+(?:\s*\.\s*\d+)*)([A-Za-z]*)"),
            text_version_pattern: compile(
                r"(?i)(?:版\s*本|Version|rev)[:：]?\s*(V|Rev)\.?\s*(\d+(?:\s*\.\s*\d+)*)",
            ),
            dot_spacing: compile(r"\s*\.\s*"),
            trailing_particle: compile(r"(中|中文|了|的|等|完毕|完成|结束)$"),
            fallback_name: compile(r"(?i)(?:名\s*称|Name)[:：]?\s*(\S+)"),
            fallback_drawing_no: compile(r"(?i)(?:图\s*号|图\s*名|Drawing|DWG NO.)[:：]?\s*(\S+)"),
            fallback_processing: compile(r"(?i)(?:加\s*工|Processing)[:：]?\s*(.*?)[\s:，;。]"),
            fallback_material: compile(r"(?i)(?:材\s*料|Material)[:：]?\s*(\S+)"),
            fallback_color: compile(r"(?i)(?:颜\s*色|Color)[:：]?\s*(\S+)"),
            fallback_surface: compile(r"(?i)(?:表\s*面\s*处\s*理|Surface)[:：]?\s*(\S+)"),
            fallback_title: compile(r"(?i)(?:title)[:：]?\s*(\S+)"),
        }
    }

    /// Extracts the title-block record from the first page of a document.
    /// A zero-page document yields an all-empty record with `page_count = 0`.
    pub fn extract(&self, source: &dyn DocumentSource) -> Result<DocumentRecord, ExtractError> {
        let _span = info_span!("extract.title_block").entered();

        let page_count = source.page_count()?;
        if page_count == 0 {
            return Ok(DocumentRecord::empty());
        }

        let geometry = source.page_geometry(0)?;
        let crop = source.crop(0, title_block_rect(geometry))?;

        Ok(self.extract_from_crop(&crop, page_count))
    }

    /// Pure extraction from already-decoded crop content.
    pub fn extract_from_crop(&self, crop: &CropContent, page_count: usize) -> DocumentRecord {
        let grid = build_grid(&crop.tables);
        let ignore = rules::IGNORE_VALUES;
        let range = rules::DEFAULT_SEARCH_RANGE;

        let mut record = DocumentRecord {
            name: find_in_grid(&grid, rules::NAME_KEYWORDS, range, ignore),
            drawing_no: find_in_grid(&grid, rules::DRAWING_NO_KEYWORDS, range, ignore),
            material: find_in_grid(&grid, rules::MATERIAL_KEYWORDS, range, ignore),
            color: find_in_grid(&grid, rules::COLOR_KEYWORDS, range, ignore),
            surface: find_in_grid(&grid, rules::SURFACE_KEYWORDS, range, ignore),
            processing: String::new(),
            version: String::new(),
            title: find_in_grid(&grid, rules::TITLE_KEYWORDS, range, ignore),
            page_count,
        };

        let processing_raw = find_in_grid(&grid, rules::PROCESSING_KEYWORDS, range, ignore);
        record.processing = self.strip_trailing_particles(&processing_raw);

        let version_raw = find_in_grid(
            &grid,
            rules::VERSION_KEYWORDS,
            rules::VERSION_SEARCH_RANGE,
            ignore,
        );
        record.version = self.resolve_version(&version_raw, &crop.text);

        // Placeholder-only cells ("none", "/", "无"...) count as absent.
        if rules::all_tokens_ignored(&record.surface) {
            record.surface.clear();
        }
        if rules::all_tokens_ignored(&record.title) {
            record.title.clear();
        }

        self.apply_text_fallback(&mut record, &crop.text);

        debug!(
            "Extracted record: name='{}' drawing_no='{}' version='{}'",
            record.name, record.drawing_no, record.version
        );
        record
    }

    /// Strips trailing continuation particles until none remain. Everything
    /// else, mixed-language text included, is preserved verbatim.
    fn strip_trailing_particles(&self, raw: &str) -> String {
        let mut value = raw.trim().to_string();
        loop {
            let stripped = self.trailing_particle.replace(&value, "");
            let stripped = stripped.trim();
            if stripped == value {
                return value;
            }
            value = stripped.to_string();
        }
    }

    /// Resolves the version from the table pass and the text pass: the table
    /// result wins unless it is a short stub (<= 2 chars) and the text pass
    /// found something longer.
    fn resolve_version(&self, table_raw: &str, text: &str) -> String {
        let table_version = self.version_from_table(table_raw);
        let text_version = self.version_from_text(text);

        if table_version.chars().count() <= 2 && text_version.chars().count() > 2 {
            text_version
        } else {
            table_version
        }
    }

    fn version_from_table(&self, raw: &str) -> String {
        let Some(caps) = self.version_pattern.captures(raw) else {
            return String::new();
        };

        let prefix = caps[1].trim().to_string();
        let numeral = self.dot_spacing.replace_all(caps[2].trim(), ".");
        let mut suffix = caps[3].trim().to_string();

        // A sheet-size marker glued onto the suffix is not part of the
        // version (e.g. "V1.0ASIZE" on cramped title blocks).
        if let Some(pos) = suffix.to_uppercase().find("SIZE") {
            suffix.truncate(pos);
        }

        format!("{}{}{}", prefix, numeral, suffix)
    }

    fn version_from_text(&self, text: &str) -> String {
        let Some(caps) = self.text_version_pattern.captures(text) else {
            return String::new();
        };

        let prefix = caps[1].trim().to_string();
        let numeral = self.dot_spacing.replace_all(caps[2].trim(), ".");
        format!("{}{}", prefix, numeral)
    }

    /// Label-anchored text fallback for fields the table pass left empty.
    /// A title populated from the table pass is never overwritten.
    fn apply_text_fallback(&self, record: &mut DocumentRecord, text: &str) {
        if text.is_empty() {
            return;
        }

        let capture = |pattern: &Regex| {
            pattern
                .captures(text)
                .map(|caps| caps[1].trim().to_string())
                .unwrap_or_default()
        };

        if record.name.is_empty() {
            record.name = capture(&self.fallback_name);
        }
        if record.drawing_no.is_empty() {
            record.drawing_no = capture(&self.fallback_drawing_no);
        }
        if record.processing.is_empty() {
            let raw = capture(&self.fallback_processing);
            record.processing = self.strip_trailing_particles(&raw);
        }
        if record.material.is_empty() {
            record.material = capture(&self.fallback_material);
        }
        if record.color.is_empty() {
            record.color = capture(&self.fallback_color);
        }
        if record.surface.is_empty() {
            record.surface = capture(&self.fallback_surface);
        }
        if record.title.is_empty() {
            record.title = capture(&self.fallback_title);
        }
        if record.version.is_empty() {
            record.version = self.version_from_text(text);
        }
    }
}
