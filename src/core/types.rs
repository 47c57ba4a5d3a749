use serde::{Deserialize, Serialize};

/// Status tag assigned at add time, immutable until removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i32,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: i32, relevance: f64, rating: i32) -> Self {
        Document {
            id,
            relevance,
            rating,
        }
    }
}

/// Scheduling tag for operations that exist in both a serial and a
/// rayon-parallel rendition. Both renditions return identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}
