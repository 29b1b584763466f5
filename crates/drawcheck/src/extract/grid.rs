//! Table grid handling: split-cell repair and keyword search.

use std::sync::OnceLock;

use regex::Regex;

fn code_cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]+\d+$").expect("valid regex"))
}

fn thickness_cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^t=[\d.]+$").expect("valid regex"))
}

/// Repairs material codes that decoders split across two cells: a code cell
/// like `AL6061` followed by a thickness cell like `t=1.5` becomes one cell
/// `AL6061 t=1.5`, consuming both. Other cells pass through trimmed.
pub fn merge_split_cells(table: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut merged_table = Vec::with_capacity(table.len());

    for row in table {
        let mut merged_row = Vec::with_capacity(row.len());
        let mut i = 0;
        while i < row.len() {
            let cell = row[i].trim();
            let next = row.get(i + 1).map(|c| c.trim());

            if let Some(next) = next {
                if code_cell_pattern().is_match(cell) && thickness_cell_pattern().is_match(next) {
                    merged_row.push(format!("{} {}", cell, next));
                    i += 2;
                    continue;
                }
            }

            merged_row.push(cell.to_string());
            i += 1;
        }
        merged_table.push(merged_row);
    }

    merged_table
}

/// Flattens all tables of a crop into one row grid, merging split cells first.
pub fn build_grid(tables: &[Vec<Vec<String>>]) -> Vec<Vec<String>> {
    let mut grid = Vec::new();
    for table in tables {
        grid.extend(merge_split_cells(table));
    }
    grid
}

/// Scans the grid row-major for a cell containing any keyword and returns the
/// first usable value to its right.
///
/// Matching strips all whitespace and lower-cases both sides, so `DWG NO.`
/// matches a cell holding `DWG\nNO.`. For each keyword cell, up to
/// `search_range` cells to the right are inspected and the first non-empty
/// value not in `ignore` (case-insensitive) is recorded. Across all keyword
/// cells in the grid, the match from the largest row index wins: later rows
/// in a title block override earlier ones. Returns an empty string when
/// nothing matches.
pub fn find_in_grid(
    grid: &[Vec<String>],
    keywords: &[&str],
    search_range: usize,
    ignore: &[&str],
) -> String {
    let cleaned_keywords: Vec<String> = keywords.iter().map(|k| clean(k)).collect();
    let ignore_lower: Vec<String> = ignore.iter().map(|v| v.to_lowercase()).collect();

    let mut best: Option<(String, usize)> = None;

    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let clean_cell = clean(cell);
            if !cleaned_keywords
                .iter()
                .any(|k| !k.is_empty() && clean_cell.contains(k.as_str()))
            {
                continue;
            }

            for offset in 1..=search_range {
                let Some(candidate) = row.get(c + offset) else {
                    break;
                };
                let value = candidate.trim();
                if value.is_empty() || ignore_lower.contains(&value.to_lowercase()) {
                    continue;
                }

                // Strictly-greater keeps the first-found value on row ties.
                if best.as_ref().map(|(_, br)| r > *br).unwrap_or(true) {
                    best = Some((value.to_string(), r));
                }
                break;
            }
        }
    }

    best.map(|(value, _)| value).unwrap_or_default()
}

fn clean(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
