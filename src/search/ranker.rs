use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::core::config::{RELEVANCE_BUCKET_COUNT, RELEVANCE_EPSILON};
use crate::core::types::{Document, DocumentStatus, ExecutionPolicy};
use crate::index::inverted::InvertedIndex;
use crate::parallel::sharded_map::ShardedMap;
use crate::query::parser::Query;

/// TF-IDF scoring and ranking over an index snapshot.
///
/// The serial and parallel paths produce byte-identical result vectors:
/// per-document score accumulation is serialized (single thread, or one
/// shard lock per key), and both sorts are stable over the same
/// ascending-id candidate order.
pub struct Ranker<'a> {
    index: &'a InvertedIndex,
}

impl<'a> Ranker<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Ranker { index }
    }

    /// Score, filter, sort, and truncate to the best `k` documents.
    pub fn find_top_documents<P>(
        &self,
        policy: ExecutionPolicy,
        query: &Query,
        predicate: P,
        k: usize,
    ) -> Vec<Document>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance = match policy {
            ExecutionPolicy::Sequential => self.find_all_documents(query, &predicate),
            ExecutionPolicy::Parallel => self.find_all_documents_par(query, &predicate),
        };

        let mut matched: Vec<Document> = document_to_relevance
            .into_iter()
            .filter_map(|(document_id, relevance)| {
                self.index
                    .meta(document_id)
                    .map(|meta| Document::new(document_id, relevance, meta.rating))
            })
            .collect();

        match policy {
            ExecutionPolicy::Sequential => matched.sort_by(compare_by_relevance),
            ExecutionPolicy::Parallel => matched.par_sort_by(compare_by_relevance),
        }
        matched.truncate(k);
        matched
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: &P) -> BTreeMap<i32, f64>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<i32, f64> = BTreeMap::new();

        for word in &query.plus_words {
            let Some(postings) = self.index.postings(word) else {
                continue;
            };
            let Some(inverse_document_freq) = self.index.inverse_document_freq(word) else {
                continue;
            };
            for (&document_id, &term_freq) in postings {
                let Some(meta) = self.index.meta(document_id) else {
                    continue;
                };
                if predicate(document_id, meta.status, meta.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) +=
                        term_freq * inverse_document_freq;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.index.postings(word) else {
                continue;
            };
            for &document_id in postings.keys() {
                document_to_relevance.remove(&document_id);
            }
        }

        document_to_relevance
    }

    fn find_all_documents_par<P>(&self, query: &Query, predicate: &P) -> BTreeMap<i32, f64>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance_map: ShardedMap<i32, f64> = ShardedMap::new(RELEVANCE_BUCKET_COUNT);

        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.index.postings(word) else {
                return;
            };
            let Some(inverse_document_freq) = self.index.inverse_document_freq(word) else {
                return;
            };
            for (&document_id, &term_freq) in postings {
                let Some(meta) = self.index.meta(document_id) else {
                    continue;
                };
                if predicate(document_id, meta.status, meta.rating) {
                    relevance_map.with_value(document_id, |relevance| {
                        *relevance += term_freq * inverse_document_freq;
                    });
                }
            }
        });

        let mut document_to_relevance = relevance_map.into_sorted_map();

        let excluded: Vec<i32> = query
            .minus_words
            .par_iter()
            .flat_map_iter(|word| {
                self.index
                    .postings(word)
                    .into_iter()
                    .flat_map(|postings| postings.keys().copied())
            })
            .collect();
        for document_id in excluded {
            document_to_relevance.remove(&document_id);
        }

        document_to_relevance
    }
}

/// Relevance descending; ratings break near-ties, ascending id order
/// survives full ties through sort stability.
fn compare_by_relevance(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        rhs.rating.cmp(&lhs.rating)
    } else {
        rhs.relevance
            .partial_cmp(&lhs.relevance)
            .unwrap_or(Ordering::Equal)
    }
}
