//! JQL search.

use serde::Deserialize;

use crate::dispatch::PendingOperation;
use crate::issue::{DecodedIssue, IssueDecoder, RawIssue};
use crate::jql::JqlSearch;
use crate::session::JiraClient;
use crate::transport::expect_json;

#[derive(Debug, Deserialize)]
struct RawSearchResult {
    #[serde(rename = "startAt", default)]
    start_at: u64,
    #[serde(rename = "maxResults", default)]
    max_results: u64,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

/// One page of search hits, each decoded like a fetched issue.
#[derive(Debug)]
pub struct SearchResult {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
    pub issues: Vec<DecodedIssue>,
}

impl JiraClient {
    /// POST a JQL search and decode every hit against the session's field
    /// schemas.
    pub fn search(&self, search: &JqlSearch) -> PendingOperation<SearchResult> {
        let state = self.state.clone();
        let search = search.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["search"])?;
            let body = serde_json::to_value(&search)?;
            let raw = state.transport.post(url, body).await?;
            let result: RawSearchResult = expect_json(raw)?;
            let decoder = IssueDecoder::new(&state.registry);
            let issues = result
                .issues
                .into_iter()
                .map(|issue| decoder.decode(issue))
                .collect();
            Ok(SearchResult {
                start_at: result.start_at,
                max_results: result.max_results,
                total: result.total,
                issues,
            })
        })
    }
}
