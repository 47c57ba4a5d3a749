use std::collections::VecDeque;

use crate::core::config::REQUEST_WINDOW;
use crate::core::error::Result;
use crate::core::types::{Document, DocumentStatus};
use crate::search::engine::SearchEngine;

struct QueryResult {
    found_docs: usize,
}

/// Rolling window over the most recent search requests, tracking how
/// many of them came back empty. Holds the last [`REQUEST_WINDOW`]
/// requests; older entries fall off the front.
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryResult>,
}

impl<'a> RequestQueue<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        RequestQueue {
            engine,
            requests: VecDeque::new(),
        }
    }

    /// Search with an arbitrary predicate and record the outcome.
    pub fn add_find_request_filtered<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(i32, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.engine.find_top_documents_filtered(raw_query, predicate)?;
        self.record(result.len());
        Ok(result)
    }

    /// Search within one status and record the outcome.
    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self.engine.find_top_documents_by_status(raw_query, status)?;
        self.record(result.len());
        Ok(result)
    }

    /// Default search (status `Actual`) and record the outcome.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.engine.find_top_documents(raw_query)?;
        self.record(result.len());
        Ok(result)
    }

    /// How many requests inside the window found nothing.
    pub fn no_result_requests(&self) -> usize {
        self.requests
            .iter()
            .filter(|request| request.found_docs == 0)
            .count()
    }

    fn record(&mut self, found_docs: usize) {
        self.requests.push_back(QueryResult { found_docs });
        if self.requests.len() > REQUEST_WINDOW {
            self.requests.pop_front();
        }
    }
}
