use std::collections::HashMap;

use log::debug;

use super::RegisterRow;

/// Multi-key lookup over a register snapshot: exact-match buckets by name,
/// spec, the `name|spec` composite, and title. Built once per comparison run
/// and never mutated; each bucket keeps original row order so downstream
/// tie-breaking is deterministic.
#[derive(Debug, Default)]
pub struct RegisterIndex {
    by_name: HashMap<String, Vec<usize>>,
    by_spec: HashMap<String, Vec<usize>>,
    by_name_spec: HashMap<String, Vec<usize>>,
    by_title: HashMap<String, Vec<usize>>,
    rows: Vec<RegisterRow>,
}

impl RegisterIndex {
    /// Builds all four mappings in a single pass over the snapshot.
    pub fn build(rows: Vec<RegisterRow>) -> Self {
        let mut index = Self {
            rows,
            ..Self::default()
        };

        for (i, row) in index.rows.iter().enumerate() {
            let name = row.name.trim();
            let spec = row.spec.trim();
            let title = row.title.trim();

            if !name.is_empty() {
                index.by_name.entry(name.to_string()).or_default().push(i);
            }
            if !spec.is_empty() {
                index.by_spec.entry(spec.to_string()).or_default().push(i);
            }
            if !name.is_empty() && !spec.is_empty() {
                index
                    .by_name_spec
                    .entry(composite_key(name, spec))
                    .or_default()
                    .push(i);
            }
            if !title.is_empty() {
                index.by_title.entry(title.to_string()).or_default().push(i);
            }
        }

        debug!(
            "Indexed {} register rows ({} names, {} specs, {} titles)",
            index.rows.len(),
            index.by_name.len(),
            index.by_spec.len(),
            index.by_title.len()
        );
        index
    }

    pub fn rows(&self) -> &[RegisterRow] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &RegisterRow {
        &self.rows[i]
    }

    pub fn by_name(&self, name: &str) -> &[usize] {
        lookup(&self.by_name, name)
    }

    pub fn by_spec(&self, spec: &str) -> &[usize] {
        lookup(&self.by_spec, spec)
    }

    pub fn by_name_spec(&self, name: &str, spec: &str) -> &[usize] {
        lookup(&self.by_name_spec, &composite_key(name, spec))
    }

    pub fn by_title(&self, title: &str) -> &[usize] {
        lookup(&self.by_title, title)
    }
}

fn composite_key(name: &str, spec: &str) -> String {
    format!("{}|{}", name, spec)
}

fn lookup<'a>(map: &'a HashMap<String, Vec<usize>>, key: &str) -> &'a [usize] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}
