//! Create-metadata decoding.
//!
//! The create metadata tells a caller which fields each issue type accepts
//! and which values are allowed. The allowed-value domain is polymorphic and
//! is selected by the field's declared schema through the same resolver the
//! issue decoder uses. An unknown schema degrades to the base node with no
//! allowed values instead of failing the whole decode.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::{IssueType, Project, Version};
use crate::schema::{resolve, DecodeStrategy, FieldDescriptor, SchemaInfo};

/// Raw create-metadata response: projects, each with issue types, each with
/// a map of field metadata keyed by field id.
#[derive(Debug, Deserialize)]
pub struct RawCreateMeta {
    #[serde(default)]
    pub projects: Vec<RawProjectMeta>,
}

#[derive(Debug, Deserialize)]
pub struct RawProjectMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub issuetypes: Vec<RawIssueTypeMeta>,
}

#[derive(Debug, Deserialize)]
pub struct RawIssueTypeMeta {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One node of a cascading option tree. Terminates where `children` is
/// missing or empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CascadingOption {
    pub id: Option<String>,
    pub value: Option<String>,
    pub children: Vec<CascadingOption>,
}

impl CascadingOption {
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CascadingOption::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Allowed-value domain of a field, scoped by its schema. Exactly one
/// variant applies per node.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedValues {
    None,
    Projects(Vec<Project>),
    Versions(Vec<Version>),
    IssueTypes(Vec<IssueType>),
    Tree(Vec<CascadingOption>),
}

impl AllowedValues {
    pub fn is_empty(&self) -> bool {
        match self {
            AllowedValues::None => true,
            AllowedValues::Projects(values) => values.is_empty(),
            AllowedValues::Versions(values) => values.is_empty(),
            AllowedValues::IssueTypes(values) => values.is_empty(),
            AllowedValues::Tree(values) => values.is_empty(),
        }
    }
}

/// Field metadata node: the base attributes every field carries plus its
/// allowed-value domain.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    pub id: String,
    pub name: Option<String>,
    pub required: bool,
    pub schema: Option<SchemaInfo>,
    pub auto_complete_url: Option<String>,
    pub operations: Vec<String>,
    pub allowed: AllowedValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFieldMeta {
    name: Option<String>,
    required: bool,
    schema: Option<SchemaInfo>,
    auto_complete_url: Option<String>,
    operations: Vec<String>,
    allowed_values: Option<Value>,
}

/// Field metadata per issue type: issue-type id → field id → node.
pub type CreateMeta = BTreeMap<String, BTreeMap<String, FieldMeta>>;

/// Decode a raw create-metadata document.
pub fn decode_create_meta(raw: RawCreateMeta) -> CreateMeta {
    let mut by_issue_type: CreateMeta = BTreeMap::new();
    for project in raw.projects {
        for issue_type in project.issuetypes {
            let entry = by_issue_type.entry(issue_type.id.clone()).or_default();
            for (id, value) in issue_type.fields {
                match decode_field_meta(&id, value) {
                    Some(meta) => {
                        entry.insert(id, meta);
                    }
                    None => debug!(field = %id, "skipping malformed field metadata entry"),
                }
            }
        }
    }
    by_issue_type
}

/// Decode one field's metadata: base node first, then the allowed-value
/// variant picked via the schema resolver.
pub fn decode_field_meta(id: &str, value: Value) -> Option<FieldMeta> {
    let raw: RawFieldMeta = serde_json::from_value(value).ok()?;
    let descriptor = FieldDescriptor {
        id: id.to_string(),
        custom: id.starts_with("customfield_"),
        schema: raw.schema.clone(),
        ..FieldDescriptor::default()
    };
    let strategy = resolve(&descriptor);
    let allowed = match raw.allowed_values {
        None => AllowedValues::None,
        Some(values) => decode_allowed(id, strategy, raw.schema.as_ref(), values),
    };
    Some(FieldMeta {
        id: id.to_string(),
        name: raw.name,
        required: raw.required,
        schema: raw.schema,
        auto_complete_url: raw.auto_complete_url,
        operations: raw.operations,
        allowed,
    })
}

fn decode_allowed(
    id: &str,
    strategy: DecodeStrategy,
    schema: Option<&SchemaInfo>,
    values: Value,
) -> AllowedValues {
    match strategy {
        DecodeStrategy::Cascading => AllowedValues::Tree(decode_elements(id, values)),
        DecodeStrategy::VersionList => AllowedValues::Versions(decode_elements(id, values)),
        DecodeStrategy::ProjectList => AllowedValues::Projects(decode_elements(id, values)),
        DecodeStrategy::IssueTypeList => AllowedValues::IssueTypes(decode_elements(id, values)),
        _ => {
            // System fields carry no custom tag; go by the declared type.
            let kind = schema
                .map(|info| {
                    if info.base == "array" {
                        info.items.clone().unwrap_or_default()
                    } else {
                        info.base.clone()
                    }
                })
                .unwrap_or_default();
            match kind.as_str() {
                "project" => AllowedValues::Projects(decode_elements(id, values)),
                "version" => AllowedValues::Versions(decode_elements(id, values)),
                "issuetype" => AllowedValues::IssueTypes(decode_elements(id, values)),
                // Flat option lists decode as childless tree nodes.
                "option" => AllowedValues::Tree(decode_elements(id, values)),
                _ => AllowedValues::None,
            }
        }
    }
}

/// Decode an allowed-values array element by element. A malformed element is
/// dropped with a warning; the rest of the domain survives. A payload that
/// is not an array at all degrades to an empty domain, also warned.
fn decode_elements<T: DeserializeOwned>(field: &str, values: Value) -> Vec<T> {
    let Value::Array(entries) = values else {
        warn!(field = %field, "allowed values are not an array, dropping the domain");
        return Vec::new();
    };
    let total = entries.len();
    let decoded: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    let dropped = total - decoded.len();
    if dropped > 0 {
        warn!(field = %field, dropped, "skipping malformed allowed-value entries");
    }
    decoded
}
