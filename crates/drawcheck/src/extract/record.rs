/// Structured title-block fields derived from one drawing document.
/// Created once per document by the extractor and immutable afterwards;
/// an empty string means the field could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRecord {
    pub name: String,
    pub drawing_no: String,
    pub processing: String,
    pub material: String,
    pub color: String,
    pub surface: String,
    pub version: String,
    pub title: String,
    pub page_count: usize,
}

impl DocumentRecord {
    /// Record for a document with no pages: all fields unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field was extracted at all.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.drawing_no.is_empty()
            && self.processing.is_empty()
            && self.material.is_empty()
            && self.color.is_empty()
            && self.surface.is_empty()
            && self.version.is_empty()
            && self.title.is_empty()
    }
}
