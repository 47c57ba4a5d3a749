use std::collections::BTreeSet;

use tracing::info;

use crate::search::engine::SearchEngine;

/// Remove every document whose distinct term set repeats an
/// earlier-added (lower-id) document. Returns the removed ids in
/// ascending order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<i32> {
    let mut seen_term_sets: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut duplicates = Vec::new();

    for document_id in engine.document_ids() {
        let term_set: Vec<String> = engine
            .get_word_frequencies(document_id)
            .keys()
            .cloned()
            .collect();
        if !seen_term_sets.insert(term_set) {
            duplicates.push(document_id);
        }
    }

    for &document_id in &duplicates {
        info!(document_id, "removing duplicate document");
        engine.remove_document(document_id);
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocumentStatus;

    #[test]
    fn duplicate_term_sets_collapse_to_the_lowest_id() {
        let mut engine = SearchEngine::new("и в на").unwrap();
        engine
            .add_document(1, "пушистый кот и хвост", DocumentStatus::Actual, &[])
            .unwrap();
        // Same bag of distinct terms, different multiplicities.
        engine
            .add_document(2, "кот хвост пушистый пушистый", DocumentStatus::Actual, &[])
            .unwrap();
        engine
            .add_document(3, "хвост кот", DocumentStatus::Actual, &[])
            .unwrap();
        engine
            .add_document(4, "кот хвост в на", DocumentStatus::Actual, &[])
            .unwrap();

        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![2, 4]);
        assert_eq!(engine.get_document_count(), 2);
        let ids: Vec<i32> = engine.document_ids().collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn distinct_corpora_lose_nothing() {
        let mut engine = SearchEngine::new("").unwrap();
        engine.add_document(0, "кот", DocumentStatus::Actual, &[]).unwrap();
        engine.add_document(1, "пёс", DocumentStatus::Actual, &[]).unwrap();

        assert!(remove_duplicates(&mut engine).is_empty());
        assert_eq!(engine.get_document_count(), 2);
    }

    #[test]
    fn empty_documents_are_duplicates_of_each_other() {
        let mut engine = SearchEngine::new("и").unwrap();
        engine.add_document(0, "", DocumentStatus::Actual, &[]).unwrap();
        engine.add_document(1, "и и и", DocumentStatus::Actual, &[]).unwrap();

        let removed = remove_duplicates(&mut engine);
        assert_eq!(removed, vec![1]);
    }
}
