//! Project resource calls.

use crate::dispatch::PendingOperation;
use crate::models::{Project, Version};
use crate::session::JiraClient;
use crate::transport::expect_json;

impl JiraClient {
    /// All projects visible to the session user.
    pub fn get_projects(&self) -> PendingOperation<Vec<Project>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["project"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    /// One project by key.
    pub fn get_project(&self, key: &str) -> PendingOperation<Project> {
        let state = self.state.clone();
        let key = key.to_string();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["project", &key])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    /// Versions declared on a project.
    pub fn get_project_versions(&self, key: &str) -> PendingOperation<Vec<Version>> {
        let state = self.state.clone();
        let key = key.to_string();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["project", &key, "versions"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }
}
