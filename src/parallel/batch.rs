use rayon::prelude::*;

use crate::core::error::Result;
use crate::core::types::Document;
use crate::search::engine::SearchEngine;

/// Run every query through the engine's default search, fanning out
/// across queries with rayon. The outer vector preserves input order.
/// A failing query fails the whole batch.
pub fn process_queries<S: AsRef<str> + Sync>(
    engine: &SearchEngine,
    queries: &[S],
) -> Result<Vec<Vec<Document>>> {
    queries
        .par_iter()
        .map(|raw_query| engine.find_top_documents(raw_query.as_ref()))
        .collect()
}

/// Like [`process_queries`] but with the per-query result lists
/// concatenated in the same outer order. No re-ranking across queries.
pub fn process_queries_joined<S: AsRef<str> + Sync>(
    engine: &SearchEngine,
    queries: &[S],
) -> Result<Vec<Document>> {
    Ok(process_queries(engine, queries)?.into_iter().flatten().collect())
}
