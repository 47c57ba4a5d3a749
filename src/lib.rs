//! In-memory TF-IDF full-text search engine.
//!
//! Documents carry an id, a body, a status tag, and integer ratings;
//! queries support required and forbidden terms, stop-word elimination,
//! and per-result predicates. Every search, match, and removal
//! operation exists in a serial and a rayon-parallel rendition with
//! identical results.

pub mod analysis;
pub mod core;
pub mod index;
pub mod parallel;
pub mod query;
pub mod search;

pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{Document, DocumentStatus, ExecutionPolicy};
pub use crate::parallel::batch::{process_queries, process_queries_joined};
pub use crate::search::dedup::remove_duplicates;
pub use crate::search::engine::SearchEngine;
pub use crate::search::paginate::{paginate, Paginator};
pub use crate::search::request_queue::RequestQueue;
