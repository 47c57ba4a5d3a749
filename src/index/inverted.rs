use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::{is_valid_word, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocumentStatus, ExecutionPolicy};

static EMPTY_FREQS: BTreeMap<String, f64> = BTreeMap::new();

/// Per-document record created once at add time. Fields never change
/// until the document is removed wholesale.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub rating: i32,
    pub status: DocumentStatus,
    /// Original body, owned so term views stay alive with the record.
    pub text: String,
    /// Distinct retained terms, for ordered-set match lookups.
    pub words: BTreeSet<String>,
}

/// Dual inverted index over short text documents.
///
/// Keeps four structures in step: term → (doc → tf), doc → (term → tf),
/// doc → meta, and the ordered id set used for stable enumeration.
/// Between any two public calls a document is either present in all
/// doc-axis structures or in none of them, and the two term maps mirror
/// each other entry for entry.
#[derive(Debug)]
pub struct InvertedIndex {
    stop_words: StopWordSet,
    word_to_document_freqs: BTreeMap<String, BTreeMap<i32, f64>>,
    document_to_word_freqs: BTreeMap<i32, BTreeMap<String, f64>>,
    documents: BTreeMap<i32, DocumentMeta>,
    document_ids: BTreeSet<i32>,
}

impl InvertedIndex {
    pub fn new(stop_words: StopWordSet) -> Self {
        InvertedIndex {
            stop_words,
            word_to_document_freqs: BTreeMap::new(),
            document_to_word_freqs: BTreeMap::new(),
            documents: BTreeMap::new(),
            document_ids: BTreeSet::new(),
        }
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    /// Register a document. The id must be non-negative and unused.
    /// Tokenization and validation happen before any structure is
    /// touched, so a failed add leaves the index unchanged.
    pub fn add_document(
        &mut self,
        document_id: i32,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 || self.documents.contains_key(&document_id) {
            return Err(Error::new(
                ErrorKind::InvalidDocumentId,
                format!("invalid document id {}", document_id),
            ));
        }

        let words = self.split_into_words_no_stop(text)?;

        let mut word_freqs: BTreeMap<String, f64> = BTreeMap::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in &words {
                *word_freqs.entry(word.clone()).or_insert(0.0) += inv_word_count;
            }
        }

        for (word, freq) in &word_freqs {
            self.word_to_document_freqs
                .entry(word.clone())
                .or_default()
                .insert(document_id, *freq);
        }

        self.documents.insert(
            document_id,
            DocumentMeta {
                rating: compute_average_rating(ratings),
                status,
                text: text.to_string(),
                words: word_freqs.keys().cloned().collect(),
            },
        );
        self.document_to_word_freqs.insert(document_id, word_freqs);
        self.document_ids.insert(document_id);

        debug!(document_id, "document added");
        Ok(())
    }

    /// Remove a document entirely. Unknown ids are a silent no-op. The
    /// parallel policy fans the affected-term gathering across rayon;
    /// the map surgery itself is serial either way, so both policies
    /// leave identical state.
    pub fn remove_document(&mut self, policy: ExecutionPolicy, document_id: i32) {
        let Some(word_freqs) = self.document_to_word_freqs.get(&document_id) else {
            return;
        };

        let words: Vec<String> = match policy {
            ExecutionPolicy::Sequential => word_freqs.keys().cloned().collect(),
            ExecutionPolicy::Parallel => {
                word_freqs.par_iter().map(|(word, _)| word.clone()).collect()
            }
        };

        for word in &words {
            if let Some(postings) = self.word_to_document_freqs.get_mut(word) {
                postings.remove(&document_id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(word);
                }
            }
        }

        self.documents.remove(&document_id);
        self.document_to_word_freqs.remove(&document_id);
        self.document_ids.remove(&document_id);

        debug!(document_id, "document removed");
    }

    /// Term frequencies of one document, keyed by term in ascending
    /// order. Unknown ids get the empty map.
    pub fn word_frequencies(&self, document_id: i32) -> &BTreeMap<String, f64> {
        self.document_to_word_freqs
            .get(&document_id)
            .unwrap_or(&EMPTY_FREQS)
    }

    pub fn contains(&self, document_id: i32) -> bool {
        self.documents.contains_key(&document_id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Ascending iteration over registered ids.
    pub fn document_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.document_ids.iter().copied()
    }

    pub fn meta(&self, document_id: i32) -> Option<&DocumentMeta> {
        self.documents.get(&document_id)
    }

    /// (doc → tf) postings of one term, if the term is indexed.
    pub fn postings(&self, word: &str) -> Option<&BTreeMap<i32, f64>> {
        self.word_to_document_freqs.get(word)
    }

    /// `ln(N / df)` for an indexed term. Absent terms have no defined
    /// idf and yield `None`.
    pub fn inverse_document_freq(&self, word: &str) -> Option<f64> {
        self.word_to_document_freqs
            .get(word)
            .map(|postings| (self.documents.len() as f64 / postings.len() as f64).ln())
    }

    fn split_into_words_no_stop(&self, text: &str) -> Result<Vec<String>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::new(
                    ErrorKind::InvalidWord,
                    format!("word {:?} is invalid", word),
                ));
            }
            if !self.stop_words.contains(word) {
                words.push(word.to_string());
            }
        }
        Ok(words)
    }
}

fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_fixture() -> InvertedIndex {
        InvertedIndex::new(StopWordSet::from_text("и в на").unwrap())
    }

    #[test]
    fn term_frequencies_sum_to_one() {
        let mut index = index_fixture();
        index
            .add_document(
                1,
                "пушистый кот пушистый хвост",
                DocumentStatus::Actual,
                &[7, 2, 7],
            )
            .unwrap();

        let freqs = index.word_frequencies(1);
        assert_eq!(freqs.len(), 3);
        assert!((freqs["пушистый"] - 0.5).abs() < 1e-9);
        assert!((freqs["кот"] - 0.25).abs() < 1e-9);
        let total: f64 = freqs.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn forward_and_reverse_maps_mirror_each_other() {
        let mut index = index_fixture();
        index
            .add_document(0, "белый кот и модный ошейник", DocumentStatus::Actual, &[])
            .unwrap();
        index
            .add_document(1, "пушистый кот пушистый хвост", DocumentStatus::Actual, &[])
            .unwrap();

        for id in [0, 1] {
            for (word, freq) in index.word_frequencies(id) {
                let postings = index.postings(word).unwrap();
                assert_eq!(postings[&id], *freq);
            }
        }
        for (word, postings) in &index.word_to_document_freqs {
            for (&id, freq) in postings {
                assert_eq!(index.word_frequencies(id)[word], *freq);
            }
        }
    }

    #[test]
    fn stop_words_are_never_indexed() {
        let mut index = index_fixture();
        index
            .add_document(0, "кот и хвост", DocumentStatus::Actual, &[])
            .unwrap();
        assert!(index.postings("и").is_none());
        assert!(!index.word_frequencies(0).contains_key("и"));
    }

    #[test]
    fn rejects_negative_and_duplicate_ids() {
        let mut index = index_fixture();
        let err = index
            .add_document(-1, "кот", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDocumentId);

        index.add_document(3, "кот", DocumentStatus::Actual, &[]).unwrap();
        let err = index
            .add_document(3, "пёс", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDocumentId);
    }

    #[test]
    fn failed_add_leaves_index_unchanged() {
        let mut index = index_fixture();
        index.add_document(1, "кот", DocumentStatus::Actual, &[]).unwrap();

        let err = index
            .add_document(2, "хвост ло\u{3}мано", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidWord);

        assert_eq!(index.document_count(), 1);
        assert!(!index.contains(2));
        assert!(index.postings("хвост").is_none());
    }

    #[test]
    fn empty_body_registers_with_empty_term_set() {
        let mut index = index_fixture();
        index.add_document(7, "", DocumentStatus::Actual, &[1]).unwrap();
        assert!(index.contains(7));
        assert!(index.word_frequencies(7).is_empty());
        assert!(index.meta(7).unwrap().words.is_empty());
    }

    #[test]
    fn all_stop_word_body_registers_with_empty_term_set() {
        let mut index = index_fixture();
        index.add_document(7, "и в на", DocumentStatus::Actual, &[]).unwrap();
        assert!(index.contains(7));
        assert!(index.word_frequencies(7).is_empty());
    }

    #[test]
    fn removal_restores_pristine_state() {
        let mut index = index_fixture();
        index
            .add_document(0, "белый кот и модный ошейник", DocumentStatus::Actual, &[8])
            .unwrap();
        index
            .add_document(1, "пушистый кот пушистый хвост", DocumentStatus::Actual, &[7])
            .unwrap();

        index.remove_document(ExecutionPolicy::Sequential, 1);

        assert_eq!(index.document_count(), 1);
        assert!(!index.contains(1));
        assert!(index.word_frequencies(1).is_empty());
        assert!(index.postings("пушистый").is_none());
        assert!(index.postings("хвост").is_none());
        // Shared term keeps the other document's posting only.
        let postings = index.postings("кот").unwrap();
        assert_eq!(postings.len(), 1);
        assert!(postings.contains_key(&0));
    }

    #[test]
    fn parallel_removal_matches_sequential() {
        let mut seq = index_fixture();
        let mut par = index_fixture();
        for index in [&mut seq, &mut par] {
            index
                .add_document(0, "белый кот и модный ошейник", DocumentStatus::Actual, &[])
                .unwrap();
            index
                .add_document(1, "пушистый кот пушистый хвост", DocumentStatus::Actual, &[])
                .unwrap();
        }

        seq.remove_document(ExecutionPolicy::Sequential, 0);
        par.remove_document(ExecutionPolicy::Parallel, 0);

        assert_eq!(seq.document_count(), par.document_count());
        assert_eq!(
            seq.word_to_document_freqs.keys().collect::<Vec<_>>(),
            par.word_to_document_freqs.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut index = index_fixture();
        index.add_document(0, "кот", DocumentStatus::Actual, &[]).unwrap();
        index.remove_document(ExecutionPolicy::Sequential, 42);
        assert_eq!(index.document_count(), 1);
    }

    #[test]
    fn readding_a_removed_id_is_legal() {
        let mut index = index_fixture();
        index.add_document(5, "кот", DocumentStatus::Actual, &[]).unwrap();
        index.remove_document(ExecutionPolicy::Sequential, 5);
        index.add_document(5, "пёс", DocumentStatus::Banned, &[1]).unwrap();
        assert_eq!(index.meta(5).unwrap().status, DocumentStatus::Banned);
    }

    #[test]
    fn average_rating_truncates_toward_zero() {
        assert_eq!(compute_average_rating(&[]), 0);
        assert_eq!(compute_average_rating(&[7, 2, 7]), 5);
        assert_eq!(compute_average_rating(&[-5, -12, 2, 1, 55, -100]), -9);
        assert_eq!(compute_average_rating(&[-1, -1, 1]), 0);
    }

    #[test]
    fn idf_is_defined_only_for_indexed_terms() {
        let mut index = index_fixture();
        index.add_document(0, "кот", DocumentStatus::Actual, &[]).unwrap();
        index.add_document(1, "пёс", DocumentStatus::Actual, &[]).unwrap();

        let idf = index.inverse_document_freq("кот").unwrap();
        assert!((idf - 2.0_f64.ln()).abs() < 1e-12);
        assert!(index.inverse_document_freq("скворец").is_none());
    }

    #[test]
    fn document_ids_iterate_ascending() {
        let mut index = index_fixture();
        for id in [9, 3, 7, 1] {
            index.add_document(id, "кот", DocumentStatus::Actual, &[]).unwrap();
        }
        let ids: Vec<i32> = index.document_ids().collect();
        assert_eq!(ids, vec![1, 3, 7, 9]);
    }
}
