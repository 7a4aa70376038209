//! Thin per-resource calls built on the dispatch core.
//!
//! Each call is one request build, one dispatched round trip and one decode;
//! everything interesting happens in [`crate::dispatch`], [`crate::issue`]
//! and [`crate::meta`].

mod issues;
mod projects;
mod search;
mod system;

pub use issues::IssueCreated;
pub use search::SearchResult;
