//! Issue resource calls.

use serde::Deserialize;
use serde_json::json;

use crate::dispatch::PendingOperation;
use crate::issue::{DecodedIssue, IssueDecoder, NewIssue, RawIssue};
use crate::models::Transition;
use crate::session::JiraClient;
use crate::transport::{expect_json, expect_success};

/// Server acknowledgement of a created issue.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCreated {
    pub id: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<Transition>,
}

impl JiraClient {
    /// Fetch one issue by key, decoded against the session's field schemas.
    pub fn get_issue(&self, key: &str) -> PendingOperation<DecodedIssue> {
        let state = self.state.clone();
        let key = key.to_string();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["issue", &key])?;
            let raw = state.transport.get(url).await?;
            let document: RawIssue = expect_json(raw)?;
            Ok(IssueDecoder::new(&state.registry).decode(document))
        })
    }

    /// Create an issue from its standard fields.
    pub fn create_issue(&self, new_issue: &NewIssue) -> PendingOperation<IssueCreated> {
        let state = self.state.clone();
        let body = new_issue.to_json();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["issue"])?;
            let raw = state.transport.post(url, body).await?;
            expect_json(raw)
        })
    }

    /// Transitions currently available for an issue.
    pub fn get_transitions(&self, key: &str) -> PendingOperation<Vec<Transition>> {
        let state = self.state.clone();
        let key = key.to_string();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["issue", &key, "transitions"])?;
            let raw = state.transport.get(url).await?;
            let response: TransitionsResponse = expect_json(raw)?;
            Ok(response.transitions)
        })
    }

    /// Execute a workflow transition. Success is a 204.
    pub fn transition_issue(&self, key: &str, transition_id: &str) -> PendingOperation<()> {
        let state = self.state.clone();
        let key = key.to_string();
        let body = json!({ "transition": { "id": transition_id } });
        self.state.dispatcher.submit(async move {
            let url = state.url(&["issue", &key, "transitions"])?;
            let raw = state.transport.post(url, body).await?;
            expect_success(raw)
        })
    }
}
