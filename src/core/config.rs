/// Result vectors are truncated to this many documents.
pub const MAX_RESULT_COUNT: usize = 5;

/// Two relevance values closer than this are ranked by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Bucket count of the sharded accumulator used by the parallel ranker.
pub const RELEVANCE_BUCKET_COUNT: usize = 120;

/// Size of the rolling request-history window (minutes in a day).
pub const REQUEST_WINDOW: usize = 1440;
