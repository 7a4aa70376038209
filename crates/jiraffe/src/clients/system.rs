//! System-level calls: field listings, enumerations, create metadata.

use crate::dispatch::PendingOperation;
use crate::meta::{decode_create_meta, CreateMeta, RawCreateMeta};
use crate::models::{IssueType, Priority, Status};
use crate::schema::FieldDescriptor;
use crate::session::JiraClient;
use crate::transport::expect_json;

impl JiraClient {
    /// Every field the server knows, built-in and custom.
    pub fn get_all_fields(&self) -> PendingOperation<Vec<FieldDescriptor>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["field"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    /// The custom subset of the field listing. This is the same call the
    /// session bootstrap uses to populate its registry.
    pub fn get_all_custom_fields(&self) -> PendingOperation<Vec<FieldDescriptor>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["field"])?;
            let raw = state.transport.get(url).await?;
            let fields: Vec<FieldDescriptor> = expect_json(raw)?;
            Ok(fields.into_iter().filter(|field| field.custom).collect())
        })
    }

    pub fn get_issue_types(&self) -> PendingOperation<Vec<IssueType>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["issuetype"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    pub fn get_priorities(&self) -> PendingOperation<Vec<Priority>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["priority"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    pub fn get_statuses(&self) -> PendingOperation<Vec<Status>> {
        let state = self.state.clone();
        self.state.dispatcher.submit(async move {
            let url = state.url(&["status"])?;
            let raw = state.transport.get(url).await?;
            expect_json(raw)
        })
    }

    /// Create metadata for the given projects, decoded into the
    /// issue-type → field → metadata mapping.
    pub fn get_create_meta(&self, project_keys: &[&str]) -> PendingOperation<CreateMeta> {
        let state = self.state.clone();
        let keys = project_keys.join(",");
        self.state.dispatcher.submit(async move {
            let mut url = state.url(&["issue", "createmeta"])?;
            {
                let mut query = url.query_pairs_mut();
                if !keys.is_empty() {
                    query.append_pair("projectKeys", &keys);
                }
                query.append_pair("expand", "projects.issuetypes.fields");
            }
            let raw = state.transport.get(url).await?;
            let document: RawCreateMeta = expect_json(raw)?;
            Ok(decode_create_meta(document))
        })
    }
}
