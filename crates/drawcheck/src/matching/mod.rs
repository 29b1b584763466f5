pub mod engine;
pub mod result;

pub use engine::MatchEngine;
pub use result::{MatchLevel, MatchResult};
