use serde::{Deserialize, Serialize};

/// Descriptive metadata for one movie or show
///
/// Every field may be missing; formatting substitutes placeholders instead
/// of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Enrichment {
    pub overview: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    /// 0-10 average, 0 when the provider had no votes
    pub vote_average: f64,
    pub vote_count: u64,
    pub poster_path: Option<String>,
    pub genres: Vec<String>,
}
