//! Jiraffe
//!
//! Typed async client for Jira-style ticket trackers.
//!
//! The tracker's issue schema is only partially fixed: next to the built-in
//! fields, administrators define custom fields with their own value shapes.
//! [`JiraClient::connect`] authenticates, fetches the server's field listing
//! once and freezes it into a [`FieldSchemaRegistry`]; every subsequent
//! decode resolves custom-field values through that snapshot, keeping
//! unrecognized values as raw JSON instead of dropping them. Calls run on a
//! bounded worker pool and return [`PendingOperation`] handles.

pub mod auth;
pub mod clients;
pub mod dispatch;
pub mod error;
pub mod issue;
pub mod jql;
pub mod meta;
pub mod models;
pub mod schema;
pub mod session;
pub mod transport;

pub use auth::Credentials;
pub use clients::{IssueCreated, SearchResult};
pub use dispatch::{Dispatcher, PendingOperation};
pub use error::{Error, ErrorBody, FieldDecodeError, RestError, Result, SchemaBuildError};
pub use issue::{
    CascadingValue, CustomFieldValue, DecodedIssue, Issue, IssueDecoder, NewIssue, RawIssue,
};
pub use jql::{JqlSearch, SortOrder};
pub use meta::{decode_create_meta, AllowedValues, CascadingOption, CreateMeta, FieldMeta};
pub use schema::{
    resolve, DecodeStrategy, FieldDescriptor, FieldSchemaRegistry, ScalarKind, SchemaInfo,
};
pub use session::{ClientConfig, JiraClient};
