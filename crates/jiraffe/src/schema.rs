//! Field schema discovery: descriptors from the server's field listing, the
//! per-session registry, and the strategy resolver that decides how each
//! custom field's value is decoded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SchemaBuildError;

/// Declared shape of a field's value, as reported by the field listing and
/// by create metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaInfo {
    /// Base type tag: `string`, `number`, `date`, `user`, `array`, ...
    #[serde(rename = "type")]
    pub base: String,
    /// Custom-type tag, e.g. `com.atlassian.jira.plugin.system.customfieldtypes:multiversion`.
    pub custom: Option<String>,
    /// Item type for array-shaped fields.
    pub items: Option<String>,
}

/// One entry of the field listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    pub custom: bool,
    pub orderable: bool,
    pub navigable: bool,
    pub searchable: bool,
    pub clause_names: Vec<String>,
    pub schema: Option<SchemaInfo>,
}

/// Snapshot of the server's custom-field schemas.
///
/// Built exactly once per session, after the handshake, and read-only from
/// then on; concurrent decode operations share it behind an `Arc`. A schema
/// change on the server requires a fresh session.
#[derive(Debug, Default)]
pub struct FieldSchemaRegistry {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldSchemaRegistry {
    /// Registry with no entries; every custom field decodes as opaque.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the listing. Duplicate ids are an aliasing quirk of the
    /// server: the first occurrence wins, the duplicate is dropped and
    /// reported, and the build still succeeds.
    pub fn build(
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> (Self, Vec<SchemaBuildError>) {
        let mut fields: HashMap<String, FieldDescriptor> = HashMap::new();
        let mut dropped = Vec::new();
        for descriptor in descriptors {
            if fields.contains_key(&descriptor.id) {
                warn!(id = %descriptor.id, "duplicate field id in listing, keeping first occurrence");
                dropped.push(SchemaBuildError { id: descriptor.id });
                continue;
            }
            fields.insert(descriptor.id.clone(), descriptor);
        }
        (Self { fields }, dropped)
    }

    /// Absence is normal, not an error: a field created on the server after
    /// bootstrap is simply unknown to this session.
    pub fn lookup(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.get(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Scalar shapes that pass through without reference decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
}

/// How a field's value is decoded, resolved from its declared schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Hierarchical value tree (cascading selects).
    Cascading,
    VersionList,
    ProjectList,
    IssueTypeList,
    /// Array of a known reference kind, decoded as generic named references.
    ReferenceList,
    Scalar(ScalarKind),
    /// No rule matched: keep the raw JSON and flag the field unresolved.
    Opaque,
}

/// Array item types decoded as generic reference lists.
const REFERENCE_ITEMS: &[&str] = &[
    "version",
    "project",
    "issuetype",
    "user",
    "group",
    "component",
    "option",
];

/// Resolve the decode strategy for a descriptor.
///
/// Pure and deterministic. Rules are evaluated in order, first match wins,
/// so the specific custom-type tags are checked before the base-type
/// fallbacks. A descriptor that matches no rule resolves to
/// [`DecodeStrategy::Opaque`] rather than being dropped.
pub fn resolve(descriptor: &FieldDescriptor) -> DecodeStrategy {
    let Some(schema) = descriptor.schema.as_ref() else {
        return DecodeStrategy::Opaque;
    };
    if let Some(custom) = schema.custom.as_deref() {
        // The semantic kind is the suffix after the plugin prefix.
        let kind = custom.rsplit(':').next().unwrap_or(custom);
        if kind.contains("cascading") {
            return DecodeStrategy::Cascading;
        }
        if kind.contains("version") {
            return DecodeStrategy::VersionList;
        }
        if kind.contains("project") {
            return DecodeStrategy::ProjectList;
        }
        if kind.contains("issuetype") {
            return DecodeStrategy::IssueTypeList;
        }
    }
    match schema.base.as_str() {
        "array" => {
            let items = schema.items.as_deref().unwrap_or_default();
            if REFERENCE_ITEMS.contains(&items) {
                DecodeStrategy::ReferenceList
            } else {
                DecodeStrategy::Opaque
            }
        }
        "string" => DecodeStrategy::Scalar(ScalarKind::String),
        "number" => DecodeStrategy::Scalar(ScalarKind::Number),
        "boolean" => DecodeStrategy::Scalar(ScalarKind::Boolean),
        "date" => DecodeStrategy::Scalar(ScalarKind::Date),
        "datetime" => DecodeStrategy::Scalar(ScalarKind::DateTime),
        _ => DecodeStrategy::Opaque,
    }
}
