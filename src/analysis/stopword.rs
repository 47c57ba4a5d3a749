use std::collections::BTreeSet;

use crate::analysis::tokenizer::{is_valid_word, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};

/// Unique, non-empty set of stop words. Entries are validated at
/// construction; membership is an ordered-set lookup.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build from a whitespace-delimited string of stop words.
    pub fn from_text(text: &str) -> Result<Self> {
        StopWordSet::from_words(split_into_words(text))
    }

    /// Build from a container of candidate stop words. Duplicates are
    /// collapsed and empty strings dropped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(Error::new(
                    ErrorKind::InvalidStopWord,
                    format!("stop word {:?} contains control bytes", word),
                ));
            }
            set.insert(word.to_string());
        }
        Ok(StopWordSet { words: set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
