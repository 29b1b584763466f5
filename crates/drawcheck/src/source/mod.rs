pub mod scanner;

pub use scanner::DirectoryScanner;

use std::path::Path;

use crate::error::{ExtractError, SourceError};

/// Pixel dimensions of a decoded page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// Rectangular crop in page coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// What the decoding collaborator yields for a crop: the tables found inside
/// it (each a list of rows of cell strings) and a raw text dump.
#[derive(Debug, Clone, Default)]
pub struct CropContent {
    pub tables: Vec<Vec<Vec<String>>>,
    pub text: String,
}

/// One decoded drawing document. Implemented by the external document-decoding
/// collaborator; the core never touches document bytes itself.
pub trait DocumentSource {
    fn page_count(&self) -> Result<usize, ExtractError>;

    /// Geometry of a page, 0-based.
    fn page_geometry(&self, page: usize) -> Result<PageGeometry, ExtractError>;

    /// Tables and raw text for a rectangular crop of a page.
    fn crop(&self, page: usize, rect: CropRect) -> Result<CropContent, ExtractError>;
}

/// Opens documents by path for the batch driver. Shared across workers.
pub trait DocumentProvider: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn DocumentSource>, SourceError>;
}

/// Crop covering the title block. Title blocks conventionally occupy the
/// lower-right quadrant: x in [0.3*width, width], y in [0.6*height, height].
pub fn title_block_rect(geometry: PageGeometry) -> CropRect {
    CropRect {
        x0: geometry.width * 0.3,
        y0: geometry.height * 0.6,
        x1: geometry.width,
        y1: geometry.height,
    }
}
