//! Issue decoding and create-encoding.
//!
//! Built-in fields follow a fixed, server-stable shape and decode by name,
//! each through its own sub-decode. Everything left over in the `fields` map
//! is a custom field and goes through the schema registry: lookup, strategy
//! resolution, then the strategy's decode. One bad field never hides the
//! rest of the ticket; failures are collected and returned alongside the
//! partially decoded issue.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::FieldDecodeError;
use crate::models::{
    parse_date, parse_date_time, Attachment, Changelog, CommentPage, Component, IssueLink,
    IssueType, LinkedIssue, Priority, Progress, Project, Reference, Resolution, Status,
    TimeTracking, Transition, User, Version, Votes, Watches, WorklogSummary, DATE_FORMAT,
};
use crate::schema::{resolve, DecodeStrategy, FieldSchemaRegistry, ScalarKind};

/// Issue document as it arrives: envelope typed, `fields` kept raw so the
/// decoder can walk it per name.
#[derive(Debug, Deserialize)]
pub struct RawIssue {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub expand: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, rename = "renderedFields")]
    pub rendered_fields: Map<String, Value>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

/// Cascading select value: a label plus its ordered children. The wire shape
/// is a `value`/`child` chain; a `children` array is accepted too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadingValue {
    pub value: Option<String>,
    pub children: Vec<CascadingValue>,
}

impl CascadingValue {
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CascadingValue::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Decoded value of one custom field.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomFieldValue {
    Cascading(CascadingValue),
    Versions(Vec<Version>),
    Projects(Vec<Project>),
    IssueTypes(Vec<IssueType>),
    References(Vec<Reference>),
    Text(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// Raw JSON kept for fields whose schema was unknown or unregistered.
    Opaque(Value),
}

impl CustomFieldValue {
    /// True when a decode strategy matched. `Opaque` values were kept raw
    /// because no strategy applied; nothing was lost either way.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CustomFieldValue::Opaque(_))
    }
}

/// Fully decoded issue: the built-in fixed fields plus the custom-field map.
#[derive(Debug, Clone, Default)]
pub struct Issue {
    pub id: Option<String>,
    pub key: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub environment: Option<String>,
    pub status: Option<Status>,
    pub issue_type: Option<IssueType>,
    pub project: Option<Project>,
    pub priority: Option<Priority>,
    pub resolution: Option<Resolution>,
    pub assignee: Option<User>,
    pub reporter: Option<User>,
    pub created: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub resolution_date: Option<DateTime<FixedOffset>>,
    pub due_date: Option<NaiveDate>,
    pub labels: Vec<String>,
    pub components: Vec<Component>,
    pub versions: Vec<Version>,
    pub fix_versions: Vec<Version>,
    pub issue_links: Vec<IssueLink>,
    pub subtasks: Vec<LinkedIssue>,
    pub parent: Option<LinkedIssue>,
    pub attachments: Vec<Attachment>,
    pub comments: Option<CommentPage>,
    pub worklog: Option<WorklogSummary>,
    pub watches: Option<Watches>,
    pub votes: Option<Votes>,
    pub time_tracking: Option<TimeTracking>,
    pub progress: Option<Progress>,
    pub transitions: Vec<Transition>,
    pub rendered_fields: BTreeMap<String, Value>,
    pub changelog: Option<Changelog>,
    pub custom: BTreeMap<String, CustomFieldValue>,
}

/// Result of a decode: the issue, possibly partial, plus every field-level
/// failure encountered on the way.
#[derive(Debug)]
pub struct DecodedIssue {
    pub issue: Issue,
    pub errors: Vec<FieldDecodeError>,
}

/// Decodes raw issue documents against a field-schema snapshot.
pub struct IssueDecoder<'a> {
    registry: &'a FieldSchemaRegistry,
}

impl<'a> IssueDecoder<'a> {
    pub fn new(registry: &'a FieldSchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn decode(&self, raw: RawIssue) -> DecodedIssue {
        let mut errors = Vec::new();
        let mut fields = raw.fields;

        let mut issue = Issue {
            id: raw.id,
            key: raw.key,
            transitions: raw.transitions,
            changelog: raw.changelog,
            rendered_fields: raw.rendered_fields.into_iter().collect(),
            ..Issue::default()
        };

        issue.summary = take(&mut fields, "summary", "a string", &mut errors);
        issue.description = take(&mut fields, "description", "a string", &mut errors);
        issue.environment = take(&mut fields, "environment", "a string", &mut errors);
        issue.status = take(&mut fields, "status", "a status object", &mut errors);
        issue.issue_type = take(&mut fields, "issuetype", "an issue type object", &mut errors);
        issue.project = take(&mut fields, "project", "a project object", &mut errors);
        issue.priority = take(&mut fields, "priority", "a priority object", &mut errors);
        issue.resolution = take(&mut fields, "resolution", "a resolution object", &mut errors);
        issue.assignee = take(&mut fields, "assignee", "a user object", &mut errors);
        issue.reporter = take(&mut fields, "reporter", "a user object", &mut errors);
        issue.created = take_date_time(&mut fields, "created", &mut errors);
        issue.updated = take_date_time(&mut fields, "updated", &mut errors);
        issue.resolution_date = take_date_time(&mut fields, "resolutiondate", &mut errors);
        issue.due_date = take_date(&mut fields, "duedate", &mut errors);
        issue.labels =
            take(&mut fields, "labels", "an array of strings", &mut errors).unwrap_or_default();
        issue.components = take(
            &mut fields,
            "components",
            "an array of component objects",
            &mut errors,
        )
        .unwrap_or_default();
        issue.versions = take(
            &mut fields,
            "versions",
            "an array of version objects",
            &mut errors,
        )
        .unwrap_or_default();
        issue.fix_versions = take(
            &mut fields,
            "fixVersions",
            "an array of version objects",
            &mut errors,
        )
        .unwrap_or_default();
        issue.issue_links = take(
            &mut fields,
            "issuelinks",
            "an array of issue link objects",
            &mut errors,
        )
        .unwrap_or_default();
        issue.subtasks = take(
            &mut fields,
            "subtasks",
            "an array of issue references",
            &mut errors,
        )
        .unwrap_or_default();
        issue.parent = take(&mut fields, "parent", "an issue reference", &mut errors);
        issue.attachments = take(
            &mut fields,
            "attachment",
            "an array of attachment objects",
            &mut errors,
        )
        .unwrap_or_default();
        issue.comments = take(&mut fields, "comment", "a comment page object", &mut errors);
        issue.worklog = take(&mut fields, "worklog", "a worklog summary object", &mut errors);
        issue.watches = take(&mut fields, "watches", "a watches object", &mut errors);
        issue.votes = take(&mut fields, "votes", "a votes object", &mut errors);
        issue.time_tracking = take(
            &mut fields,
            "timetracking",
            "a time tracking object",
            &mut errors,
        );
        issue.progress = take(&mut fields, "progress", "a progress object", &mut errors);

        // Everything still in the map is a custom field.
        for (id, value) in fields {
            if value.is_null() {
                continue;
            }
            match self.decode_custom(&id, value) {
                Ok(decoded) => {
                    issue.custom.insert(id, decoded);
                }
                Err(error) => errors.push(error),
            }
        }

        DecodedIssue { issue, errors }
    }

    fn decode_custom(
        &self,
        id: &str,
        value: Value,
    ) -> Result<CustomFieldValue, FieldDecodeError> {
        let strategy = match self.registry.lookup(id) {
            Some(descriptor) => resolve(descriptor),
            None => {
                debug!(field = id, "field not in schema registry, keeping raw value");
                DecodeStrategy::Opaque
            }
        };
        decode_with_strategy(id, strategy, value)
    }
}

/// Apply a resolved strategy to one field value. Wrong shapes become a
/// [`FieldDecodeError`] naming the field and the expected shape.
pub fn decode_with_strategy(
    id: &str,
    strategy: DecodeStrategy,
    value: Value,
) -> Result<CustomFieldValue, FieldDecodeError> {
    let fail = |expected: &'static str| FieldDecodeError {
        field: id.to_string(),
        expected,
    };
    match strategy {
        DecodeStrategy::Cascading => decode_cascading(&value)
            .map(CustomFieldValue::Cascading)
            .ok_or_else(|| fail("a cascading value object")),
        DecodeStrategy::VersionList => one_or_many::<Version>(value)
            .map(CustomFieldValue::Versions)
            .ok_or_else(|| fail("a list of version objects")),
        DecodeStrategy::ProjectList => one_or_many::<Project>(value)
            .map(CustomFieldValue::Projects)
            .ok_or_else(|| fail("a list of project objects")),
        DecodeStrategy::IssueTypeList => one_or_many::<IssueType>(value)
            .map(CustomFieldValue::IssueTypes)
            .ok_or_else(|| fail("a list of issue type objects")),
        DecodeStrategy::ReferenceList => one_or_many::<Reference>(value)
            .map(CustomFieldValue::References)
            .ok_or_else(|| fail("a list of reference objects")),
        DecodeStrategy::Scalar(ScalarKind::String) => value
            .as_str()
            .map(|text| CustomFieldValue::Text(text.to_string()))
            .ok_or_else(|| fail("a string")),
        DecodeStrategy::Scalar(ScalarKind::Number) => value
            .as_f64()
            .map(CustomFieldValue::Number)
            .ok_or_else(|| fail("a number")),
        DecodeStrategy::Scalar(ScalarKind::Boolean) => value
            .as_bool()
            .map(CustomFieldValue::Flag)
            .ok_or_else(|| fail("a boolean")),
        DecodeStrategy::Scalar(ScalarKind::Date) => value
            .as_str()
            .and_then(parse_date)
            .map(CustomFieldValue::Date)
            .ok_or_else(|| fail("a yyyy-mm-dd date string")),
        DecodeStrategy::Scalar(ScalarKind::DateTime) => value
            .as_str()
            .and_then(parse_date_time)
            .map(CustomFieldValue::DateTime)
            .ok_or_else(|| fail("a date-time string with offset")),
        DecodeStrategy::Opaque => Ok(CustomFieldValue::Opaque(value)),
    }
}

fn decode_cascading(value: &Value) -> Option<CascadingValue> {
    let object = value.as_object()?;
    let label = object
        .get("value")
        .and_then(Value::as_str)
        .map(str::to_string);
    let mut children = Vec::new();
    if let Some(child) = object.get("child").and_then(decode_cascading_opt) {
        children.push(child);
    }
    if let Some(nested) = object.get("children").and_then(Value::as_array) {
        children.extend(nested.iter().filter_map(decode_cascading_opt));
    }
    Some(CascadingValue {
        value: label,
        children,
    })
}

fn decode_cascading_opt(value: &Value) -> Option<CascadingValue> {
    if value.is_null() {
        return None;
    }
    decode_cascading(value)
}

/// A list-shaped field; a lone object is tolerated as a one-element list
/// (single-pickers share the custom tag with their multi variants).
fn one_or_many<T: DeserializeOwned>(value: Value) -> Option<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).ok(),
        Value::Object(_) => serde_json::from_value::<T>(value).ok().map(|one| vec![one]),
        _ => None,
    }
}

/// Remove a fixed field by name and decode it. Absent and null keys are
/// simply unset; a wrong shape is recorded and the field left unset.
fn take<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    name: &str,
    expected: &'static str,
    errors: &mut Vec<FieldDecodeError>,
) -> Option<T> {
    let value = fields.remove(name)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(_) => {
            errors.push(FieldDecodeError {
                field: name.to_string(),
                expected,
            });
            None
        }
    }
}

fn take_date_time(
    fields: &mut Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldDecodeError>,
) -> Option<DateTime<FixedOffset>> {
    let raw: String = take(fields, name, "a date-time string with offset", errors)?;
    match parse_date_time(&raw) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(FieldDecodeError {
                field: name.to_string(),
                expected: "a date-time string with offset",
            });
            None
        }
    }
}

fn take_date(
    fields: &mut Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldDecodeError>,
) -> Option<NaiveDate> {
    let raw: String = take(fields, name, "a yyyy-mm-dd date string", errors)?;
    match parse_date(&raw) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(FieldDecodeError {
                field: name.to_string(),
                expected: "a yyyy-mm-dd date string",
            });
            None
        }
    }
}

/// Fields for issue creation, encoded under `{"fields": {...}}` the way the
/// server expects them back.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    pub description: Option<String>,
    pub environment: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub versions: Vec<String>,
    pub fix_versions: Vec<String>,
    pub original_estimate_seconds: Option<u64>,
}

impl NewIssue {
    pub fn new(
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            issue_type: issue_type.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Request body for `POST /issue`.
    pub fn to_json(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("issuetype".into(), json!({ "name": self.issue_type }));
        fields.insert("summary".into(), Value::String(self.summary.clone()));
        if let Some(description) = &self.description {
            fields.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(environment) = &self.environment {
            fields.insert("environment".into(), Value::String(environment.clone()));
        }
        if let Some(priority) = &self.priority {
            fields.insert("priority".into(), json!({ "name": priority }));
        }
        if let Some(assignee) = &self.assignee {
            fields.insert("assignee".into(), json!({ "name": assignee }));
        }
        if let Some(reporter) = &self.reporter {
            fields.insert("reporter".into(), json!({ "name": reporter }));
        }
        if let Some(due_date) = &self.due_date {
            fields.insert(
                "duedate".into(),
                Value::String(due_date.format(DATE_FORMAT).to_string()),
            );
        }
        if !self.labels.is_empty() {
            fields.insert("labels".into(), json!(self.labels));
        }
        if !self.components.is_empty() {
            let components: Vec<Value> = self
                .components
                .iter()
                .map(|name| json!({ "name": name }))
                .collect();
            fields.insert("components".into(), Value::Array(components));
        }
        if !self.versions.is_empty() {
            let versions: Vec<Value> = self
                .versions
                .iter()
                .map(|name| json!({ "name": name }))
                .collect();
            fields.insert("versions".into(), Value::Array(versions));
        }
        if !self.fix_versions.is_empty() {
            let versions: Vec<Value> = self
                .fix_versions
                .iter()
                .map(|name| json!({ "name": name }))
                .collect();
            fields.insert("fixVersions".into(), Value::Array(versions));
        }
        if let Some(seconds) = self.original_estimate_seconds {
            fields.insert(
                "timetracking".into(),
                json!({ "originalEstimateSeconds": seconds }),
            );
        }
        json!({ "fields": fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, SchemaInfo};

    fn registry_with(descriptors: Vec<FieldDescriptor>) -> FieldSchemaRegistry {
        let (registry, dropped) = FieldSchemaRegistry::build(descriptors);
        assert!(dropped.is_empty());
        registry
    }

    fn multiversion_descriptor(id: &str) -> FieldDescriptor {
        FieldDescriptor {
            id: id.to_string(),
            name: "Affected builds".to_string(),
            custom: true,
            schema: Some(SchemaInfo {
                base: "array".to_string(),
                custom: Some("com.example:multiversion".to_string()),
                ..SchemaInfo::default()
            }),
            ..FieldDescriptor::default()
        }
    }

    fn raw_issue(document: Value) -> RawIssue {
        serde_json::from_value(document).unwrap()
    }

    #[test]
    fn fixed_fields_decode_by_name() {
        let registry = FieldSchemaRegistry::empty();
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "id": "10002",
            "key": "TEST-1",
            "fields": {
                "summary": "Printer stopped printing",
                "status": {"id": "3", "name": "In Progress"},
                "assignee": {"name": "fred", "displayName": "Fred Flintstone"},
                "labels": ["hardware", "urgent"],
                "created": "2014-08-01T09:28:00.000+0200",
                "duedate": "2014-08-15",
                "components": [{"name": "Print queue"}],
                "comment": {"total": 1, "comments": [{"body": "still broken"}]},
                "watches": {"watchCount": 3, "isWatching": false}
            }
        })));

        assert!(decoded.errors.is_empty());
        let issue = decoded.issue;
        assert_eq!(issue.key, "TEST-1");
        assert_eq!(issue.summary.as_deref(), Some("Printer stopped printing"));
        assert_eq!(
            issue.status.as_ref().and_then(|s| s.name.as_deref()),
            Some("In Progress")
        );
        assert_eq!(issue.labels, vec!["hardware", "urgent"]);
        assert_eq!(issue.created.unwrap().to_rfc3339(), "2014-08-01T09:28:00+02:00");
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2014, 8, 15));
        assert_eq!(issue.components.len(), 1);
        assert_eq!(issue.comments.as_ref().map(|c| c.total), Some(1));
        assert_eq!(issue.watches.as_ref().map(|w| w.watch_count), Some(3));
        assert!(issue.custom.is_empty());
    }

    #[test]
    fn registered_multiversion_field_decodes_as_versions() {
        let registry = registry_with(vec![multiversion_descriptor("customfield_10001")]);
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "key": "TEST-2",
            "fields": {
                "customfield_10001": [{"name": "1.0"}, {"name": "2.0"}]
            }
        })));

        assert!(decoded.errors.is_empty());
        match decoded.issue.custom.get("customfield_10001") {
            Some(CustomFieldValue::Versions(versions)) => {
                let names: Vec<_> = versions.iter().filter_map(|v| v.name.as_deref()).collect();
                assert_eq!(names, vec!["1.0", "2.0"]);
            }
            other => panic!("expected a version list, got {other:?}"),
        }
    }

    #[test]
    fn no_custom_field_entry_is_ever_lost() {
        let registry = registry_with(vec![multiversion_descriptor("customfield_10001")]);
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "key": "TEST-3",
            "fields": {
                "summary": "Mixed custom fields",
                "customfield_10001": [{"name": "1.0"}],
                "customfield_20000": "free text nobody registered",
                "customfield_20001": {"some": ["arbitrary", "shape"]}
            }
        })));

        assert!(decoded.errors.is_empty());
        let custom = &decoded.issue.custom;
        assert_eq!(custom.len(), 3);
        assert!(custom.get("customfield_10001").unwrap().is_resolved());
        assert!(!custom.get("customfield_20000").unwrap().is_resolved());
        assert!(!custom.get("customfield_20001").unwrap().is_resolved());
    }

    #[test]
    fn malformed_custom_value_is_collected_not_fatal() {
        let registry = registry_with(vec![multiversion_descriptor("customfield_10001")]);
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "key": "TEST-4",
            "fields": {
                "summary": "Still decodes",
                "customfield_10001": "not a version list"
            }
        })));

        assert_eq!(decoded.issue.summary.as_deref(), Some("Still decodes"));
        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(decoded.errors[0].field, "customfield_10001");
        assert!(!decoded.issue.custom.contains_key("customfield_10001"));
    }

    #[test]
    fn unparseable_dates_are_field_level_errors() {
        let registry = FieldSchemaRegistry::empty();
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "key": "TEST-5",
            "fields": {
                "summary": "Bad dates",
                "created": "last tuesday",
                "duedate": "2014-08-15"
            }
        })));

        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(decoded.errors[0].field, "created");
        assert!(decoded.issue.created.is_none());
        assert_eq!(decoded.issue.due_date, NaiveDate::from_ymd_opt(2014, 8, 15));
    }

    #[test]
    fn cascading_values_decode_to_a_tree() {
        let descriptor = FieldDescriptor {
            id: "customfield_10010".to_string(),
            custom: true,
            schema: Some(SchemaInfo {
                base: "option-with-child".to_string(),
                custom: Some("com.example:cascadingselect".to_string()),
                ..SchemaInfo::default()
            }),
            ..FieldDescriptor::default()
        };
        let registry = registry_with(vec![descriptor]);
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
            "key": "TEST-6",
            "fields": {
                "customfield_10010": {"value": "Europe", "child": {"value": "Sweden"}}
            }
        })));

        assert!(decoded.errors.is_empty());
        match decoded.issue.custom.get("customfield_10010") {
            Some(CustomFieldValue::Cascading(tree)) => {
                assert_eq!(tree.value.as_deref(), Some("Europe"));
                assert_eq!(tree.depth(), 2);
                assert_eq!(tree.children[0].value.as_deref(), Some("Sweden"));
            }
            other => panic!("expected a cascading value, got {other:?}"),
        }
    }

    #[test]
    fn scalar_strategies_pass_through() {
        for (base, value, expect_resolved) in [
            ("number", json!(12.5), true),
            ("string", json!("plain"), true),
            ("boolean", json!(true), true),
            ("date", json!("2020-02-02"), true),
            ("datetime", json!("2020-02-02T10:00:00.000+0000"), true),
            ("number", json!("12.5"), false),
        ] {
            let descriptor = FieldDescriptor {
                id: "customfield_30000".to_string(),
                custom: true,
                schema: Some(SchemaInfo {
                    base: base.to_string(),
                    ..SchemaInfo::default()
                }),
                ..FieldDescriptor::default()
            };
            let registry = registry_with(vec![descriptor]);
            let decoded = IssueDecoder::new(&registry).decode(raw_issue(json!({
                "key": "TEST-7",
                "fields": {"customfield_30000": value}
            })));
            if expect_resolved {
                assert!(decoded.errors.is_empty(), "base {base} should decode");
                assert!(decoded.issue.custom["customfield_30000"].is_resolved());
            } else {
                assert_eq!(decoded.errors.len(), 1);
            }
        }
    }

    #[test]
    fn create_encode_then_decode_round_trips_standard_fields() {
        let mut new_issue = NewIssue::new("DEMO", "Task", "Install the new printer");
        new_issue.description = Some("Second floor, next to the kitchen".to_string());
        new_issue.priority = Some("Major".to_string());
        new_issue.assignee = Some("fred".to_string());
        new_issue.due_date = NaiveDate::from_ymd_opt(2014, 9, 1);
        new_issue.labels = vec!["hardware".to_string()];
        new_issue.components = vec!["Facilities".to_string()];
        new_issue.fix_versions = vec!["2.0".to_string()];

        // A server echo of the created issue carries the same fields back.
        let echo = json!({
            "key": "DEMO-42",
            "fields": new_issue.to_json()["fields"]
        });
        let registry = FieldSchemaRegistry::empty();
        let decoded = IssueDecoder::new(&registry).decode(raw_issue(echo));

        assert!(decoded.errors.is_empty());
        let issue = decoded.issue;
        assert_eq!(issue.summary.as_deref(), Some("Install the new printer"));
        assert_eq!(
            issue.description.as_deref(),
            Some("Second floor, next to the kitchen")
        );
        assert_eq!(
            issue.project.as_ref().and_then(|p| p.key.as_deref()),
            Some("DEMO")
        );
        assert_eq!(
            issue.issue_type.as_ref().and_then(|t| t.name.as_deref()),
            Some("Task")
        );
        assert_eq!(
            issue.priority.as_ref().and_then(|p| p.name.as_deref()),
            Some("Major")
        );
        assert_eq!(
            issue.assignee.as_ref().and_then(|u| u.name.as_deref()),
            Some("fred")
        );
        assert_eq!(issue.due_date, new_issue.due_date);
        assert_eq!(issue.labels, new_issue.labels);
        assert_eq!(
            issue.components[0].name.as_deref(),
            Some("Facilities")
        );
        assert_eq!(issue.fix_versions[0].name.as_deref(), Some("2.0"));
    }
}
