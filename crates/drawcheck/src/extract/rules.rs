//! Declarative keyword rule set for title-block field extraction.
//!
//! Title blocks label their cells in Chinese, English, or a mix of both, and
//! decoders sometimes keep line breaks inside a label cell — the newline
//! variants below are literal strings observed on real drawings.

/// Cell values that never count as a field value.
pub const IGNORE_VALUES: &[&str] = &["", "none", "无", "空白", "/"];

/// How many cells to the right of a keyword cell are inspected for a value.
pub const DEFAULT_SEARCH_RANGE: usize = 5;

/// Version labels and values get split across more cells than other fields.
pub const VERSION_SEARCH_RANGE: usize = 6;

pub const NAME_KEYWORDS: &[&str] = &["名称", "name"];

pub const DRAWING_NO_KEYWORDS: &[&str] = &["图号", "图名", "drawing", "DWG NO."];

pub const PROCESSING_KEYWORDS: &[&str] = &[
    "加工",
    "processing",
    "processes",
    "MANUFACTUIING\nPROCESSES",
];

pub const MATERIAL_KEYWORDS: &[&str] = &["材料", "material"];

pub const COLOR_KEYWORDS: &[&str] = &["颜色", "color"];

pub const SURFACE_KEYWORDS: &[&str] = &["表面处理", "表面", "surface", "SURFACE\nFINISHING"];

pub const VERSION_KEYWORDS: &[&str] = &["版本", "版 本", "version", "rev"];

pub const TITLE_KEYWORDS: &[&str] = &["title", "TITLE"];

/// True when every whitespace-separated token of `value` is an ignore value.
/// Used to blank out placeholder-only surface and title cells.
pub fn all_tokens_ignored(value: &str) -> bool {
    value
        .split_whitespace()
        .all(|token| IGNORE_VALUES.contains(&token.to_lowercase().as_str()))
}
