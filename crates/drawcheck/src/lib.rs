pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod matching;
pub mod normalize;
pub mod register;
pub mod report;
pub mod source;

pub use batch::{BatchJob, BatchProcessor, BatchSummary, JobStatus, WorkerPool};
pub use config::{load_layout, RegisterLayout};
pub use error::{
    ConfigError, DrawcheckError, ExtractError, RegisterError, Result, SourceError, WorkerError,
};
pub use extract::{DocumentRecord, RecordExtractor};
pub use matching::{MatchEngine, MatchLevel, MatchResult};
pub use register::{ColumnRole, RegisterIndex, RegisterRow, RegisterSink};
pub use report::ReportBuilder;
pub use source::{CropContent, CropRect, DocumentProvider, DocumentSource, PageGeometry};
