use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::analysis::stopword::StopWordSet;
use crate::core::config::MAX_RESULT_COUNT;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Document, DocumentStatus, ExecutionPolicy};
use crate::index::inverted::InvertedIndex;
use crate::query::parser::QueryParser;
use crate::search::ranker::Ranker;

/// The externally addressable search facade.
///
/// Owns the stop-word set and the inverted index. Any number of
/// readers may query concurrently; writers (`add_document`,
/// `remove_document`) take `&mut self` and are therefore exclusive.
#[derive(Debug)]
pub struct SearchEngine {
    index: InvertedIndex,
}

impl SearchEngine {
    /// Construct from a whitespace-delimited stop-word string.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(SearchEngine {
            index: InvertedIndex::new(StopWordSet::from_text(stop_words_text)?),
        })
    }

    /// Construct from a container of stop words.
    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SearchEngine {
            index: InvertedIndex::new(StopWordSet::from_words(stop_words)?),
        })
    }

    /// Register a document body under `document_id`. All-or-nothing:
    /// a rejected id or an invalid word leaves the engine untouched.
    pub fn add_document(
        &mut self,
        document_id: i32,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.index.add_document(document_id, text, status, ratings)
    }

    /// Top documents for `raw_query` among those with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query)
    }

    pub fn find_top_documents_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with(policy, raw_query, DocumentStatus::Actual)
    }

    /// Top documents among those carrying the given status.
    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_status_with(ExecutionPolicy::Sequential, raw_query, status)
    }

    pub fn find_top_documents_by_status_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_filtered_with(
            policy,
            raw_query,
            move |_, document_status, _| document_status == status,
        )
    }

    /// Top documents accepted by an arbitrary predicate over
    /// (id, status, rating). The predicate must be pure; the parallel
    /// policy may invoke it from several threads.
    pub fn find_top_documents_filtered<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_filtered_with(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_filtered_with<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool + Sync,
    {
        let query = QueryParser::new(self.index.stop_words()).parse(raw_query, true)?;
        Ok(Ranker::new(&self.index).find_top_documents(policy, &query, predicate, MAX_RESULT_COUNT))
    }

    /// Which plus-terms of `raw_query` occur in the document, along
    /// with its status. Any minus-term hit empties the word list. The
    /// returned words are distinct and ascending.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: i32,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, document_id)
    }

    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        document_id: i32,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let meta = self.index.meta(document_id).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownDocumentId,
                format!("no document with id {}", document_id),
            )
        })?;
        let query = QueryParser::new(self.index.stop_words()).parse(raw_query, true)?;

        let matched_words = match policy {
            ExecutionPolicy::Sequential => {
                if query
                    .minus_words
                    .iter()
                    .any(|word| meta.words.contains(word))
                {
                    Vec::new()
                } else {
                    // Strict parsing sorted the plus-words, so the
                    // filtered list comes out ascending.
                    query
                        .plus_words
                        .iter()
                        .filter(|word| meta.words.contains(*word))
                        .cloned()
                        .collect()
                }
            }
            ExecutionPolicy::Parallel => {
                let word_freqs = self.index.word_frequencies(document_id);
                if query
                    .minus_words
                    .par_iter()
                    .any(|word| word_freqs.contains_key(word))
                {
                    Vec::new()
                } else {
                    let mut matched: Vec<String> = word_freqs
                        .par_iter()
                        .filter(|(word, _)| query.plus_words.binary_search(*word).is_ok())
                        .map(|(word, _)| word.clone())
                        .collect();
                    matched.par_sort_unstable();
                    matched
                }
            }
        };

        Ok((matched_words, meta.status))
    }

    /// Remove a document; unknown ids are a silent no-op.
    pub fn remove_document(&mut self, document_id: i32) {
        self.remove_document_with(ExecutionPolicy::Sequential, document_id);
    }

    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, document_id: i32) {
        self.index.remove_document(policy, document_id);
    }

    /// Term → tf map of one document, ascending by term; empty for
    /// unknown ids.
    pub fn get_word_frequencies(&self, document_id: i32) -> &BTreeMap<String, f64> {
        self.index.word_frequencies(document_id)
    }

    pub fn get_document_count(&self) -> i32 {
        self.index.document_count() as i32
    }

    /// Registered document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.index.document_ids()
    }
}
