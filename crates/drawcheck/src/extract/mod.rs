pub mod extractor;
pub mod grid;
pub mod record;
pub mod rules;

pub use extractor::RecordExtractor;
pub use record::DocumentRecord;
