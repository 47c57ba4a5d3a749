use crate::analysis::stopword::StopWordSet;
use crate::analysis::tokenizer::{is_valid_word, split_into_words};
use crate::core::error::{Error, ErrorKind, Result};

/// A parsed query: required terms and forbidden terms, stop words
/// removed. With strict parsing both lists are sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: Vec<String>,
    pub minus_words: Vec<String>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

/// Turns raw query strings into `Query` values against a stop-word set.
pub struct QueryParser<'a> {
    stop_words: &'a StopWordSet,
}

impl<'a> QueryParser<'a> {
    pub fn new(stop_words: &'a StopWordSet) -> Self {
        QueryParser { stop_words }
    }

    /// Parse a raw query. An empty input yields an empty query. With
    /// `strict` both term lists are sorted and deduplicated; otherwise
    /// insertion order and duplicates are kept.
    pub fn parse(&self, text: &str, strict: bool) -> Result<Query> {
        let mut query = Query::default();

        for word in split_into_words(text) {
            let parsed = self.parse_query_word(word)?;
            if parsed.is_stop {
                continue;
            }
            if parsed.is_minus {
                query.minus_words.push(parsed.data.to_string());
            } else {
                query.plus_words.push(parsed.data.to_string());
            }
        }

        if strict {
            dedupe_words(&mut query.plus_words);
            dedupe_words(&mut query.minus_words);
        }

        Ok(query)
    }

    fn parse_query_word<'b>(&self, text: &'b str) -> Result<QueryWord<'b>> {
        let mut word = text;
        let mut is_minus = false;
        if let Some(stripped) = word.strip_prefix('-') {
            is_minus = true;
            word = stripped;
        }

        if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
            return Err(Error::new(
                ErrorKind::InvalidQuery,
                format!("query word {:?} is invalid", text),
            ));
        }

        Ok(QueryWord {
            data: word,
            is_minus,
            is_stop: self.stop_words.contains(word),
        })
    }
}

fn dedupe_words(words: &mut Vec<String>) {
    words.sort_unstable();
    words.dedup();
}
