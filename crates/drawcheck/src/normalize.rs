//! Description building and comparison-only normalization.
//!
//! Register descriptions and drawing title blocks phrase the same color the
//! way each author liked: "哑光黑", "黑 哑光", "black matte", "matte black".
//! [`normalize_description`] canonicalizes these so semantically-equal free
//! text compares equal. It never mutates stored fields.

use std::sync::OnceLock;

use regex::Regex;

use crate::extract::DocumentRecord;

/// Color vocabulary. Presence of any of these in a description part triggers
/// canonicalization of that part.
const COLOR_TOKENS: &[&str] = &[
    "黑", "白", "灰", "银", "红", "蓝", "绿", "黄", "black", "white", "gray", "grey", "silver",
    "red", "blue", "green", "yellow",
];

/// Finish/effect vocabulary. Longer tokens first so "哑光" is taken before
/// "哑" and "光".
const EFFECT_TOKENS: &[&str] = &[
    "哑光", "亮光", "磨砂", "高光", "哑", "亮", "光", "matte", "glossy", "frosted", "sandblast",
];

fn list_punctuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[，；、]").expect("valid regex"))
}

fn comma_spacing() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*,\s*").expect("valid regex"))
}

/// Placeholder surface values that mean "no surface treatment".
const ABSENT_SURFACE: &[&str] = &["", "无", "空白", "/"];

/// Joins processing, material, color and surface into the register's
/// description format: comma-separated, empty parts skipped, surface omitted
/// entirely when it is a placeholder.
pub fn build_description(record: &DocumentRecord) -> String {
    let surface = if ABSENT_SURFACE.contains(&record.surface.trim()) {
        ""
    } else {
        record.surface.as_str()
    };

    let parts = [
        record.processing.as_str(),
        record.material.as_str(),
        record.color.as_str(),
        surface,
    ];

    let joined = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    comma_spacing().replace_all(&joined, ",").trim().to_string()
}

/// Canonicalizes a description for equality testing.
///
/// Chinese list punctuation becomes a comma, the text is lower-cased, and any
/// comma part containing a color token is decomposed into its canonical
/// tokens — effect tokens, then color tokens, then whatever text is left —
/// each emitted as its own part. Parts without color tokens pass through
/// unchanged. The result is idempotent.
pub fn normalize_description(text: &str) -> String {
    let unified = list_punctuation().replace_all(text, ",");
    let lowered = unified.to_lowercase();

    let mut normalized_parts: Vec<String> = Vec::new();

    for part in lowered.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if !COLOR_TOKENS.iter().any(|color| part.contains(color)) {
            normalized_parts.push(part.to_string());
            continue;
        }

        let mut leftover = part.to_string();
        let mut effects: Vec<&str> = Vec::new();
        let mut colors: Vec<&str> = Vec::new();

        for token in EFFECT_TOKENS {
            if leftover.contains(token) {
                leftover = leftover.replace(token, "");
                effects.push(token);
            }
        }
        for token in COLOR_TOKENS {
            if leftover.contains(token) {
                leftover = leftover.replace(token, "");
                colors.push(token);
            }
        }

        normalized_parts.extend(effects.iter().map(|t| t.to_string()));
        normalized_parts.extend(colors.iter().map(|t| t.to_string()));

        let leftover = leftover.trim();
        if !leftover.is_empty() {
            normalized_parts.push(leftover.to_string());
        }
    }

    normalized_parts.join(",")
}

/// Splits a normalized description into its comparison parts.
pub fn description_parts(normalized: &str) -> Vec<String> {
    normalized
        .split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}
