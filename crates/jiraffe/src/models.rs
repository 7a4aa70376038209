//! Serde beans for the server's stable shapes.
//!
//! Unknown keys are ignored and missing keys fall back to defaults, so these
//! stay tolerant of minor server-side additions.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date-time with offset, e.g. `2014-08-01T09:28:00.000+0200`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
/// Date-only, e.g. `2014-08-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date-time in one of the accepted wire formats.
pub fn parse_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, DATE_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Parse a date-only value.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Status {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Priority {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Resolution {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueType {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub subtask: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Option<String>,
    pub key: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Version {
    pub id: Option<String>,
    pub name: Option<String>,
    pub archived: bool,
    pub released: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Component {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Generic named reference, used for custom fields whose array item type is
/// known but has no dedicated bean (users, groups, options, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub id: Option<String>,
    pub key: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub author: Option<User>,
    pub created: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: Option<String>,
    pub author: Option<User>,
    pub body: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentPage {
    pub total: u64,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorklogEntry {
    pub id: Option<String>,
    pub author: Option<User>,
    pub comment: Option<String>,
    pub started: Option<String>,
    pub time_spent_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorklogSummary {
    pub total: u64,
    pub worklogs: Vec<WorklogEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Watches {
    pub watch_count: u64,
    pub is_watching: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Votes {
    pub votes: u64,
    pub has_voted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeTracking {
    pub original_estimate: Option<String>,
    pub remaining_estimate: Option<String>,
    pub time_spent: Option<String>,
    pub original_estimate_seconds: Option<u64>,
    pub remaining_estimate_seconds: Option<u64>,
    pub time_spent_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    pub progress: u64,
    pub total: u64,
    pub percent: Option<u64>,
}

/// Key-level reference to another issue (parent, subtask, link target).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedIssue {
    pub id: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueLinkType {
    pub id: Option<String>,
    pub name: Option<String>,
    pub inward: Option<String>,
    pub outward: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueLink {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<IssueLinkType>,
    pub inward_issue: Option<LinkedIssue>,
    pub outward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Transition {
    pub id: Option<String>,
    pub name: Option<String>,
    pub to: Option<Status>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeItem {
    pub field: Option<String>,
    pub field_type: Option<String>,
    pub from: Option<String>,
    pub from_string: Option<String>,
    pub to: Option<String>,
    pub to_string: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeHistory {
    pub id: Option<String>,
    pub author: Option<User>,
    pub created: Option<String>,
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Changelog {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
    pub histories: Vec<ChangeHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_date_time_shapes_parse() {
        assert!(parse_date_time("2014-08-01T09:28:00.000+0200").is_some());
        assert!(parse_date_time("2014-08-01T09:28:00+02:00").is_some());
        assert!(parse_date_time("not a date").is_none());
    }

    #[test]
    fn date_only_parses() {
        assert_eq!(
            parse_date("2014-08-01"),
            NaiveDate::from_ymd_opt(2014, 8, 1)
        );
        assert!(parse_date("01.08.2014").is_none());
    }

    #[test]
    fn beans_tolerate_missing_and_extra_keys() {
        let user: User = serde_json::from_str(
            r#"{"displayName":"Fred Flintstone","self":"https://example/rest/api/2/user?username=fred"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Fred Flintstone"));
        assert!(user.name.is_none());
        assert!(!user.active);
    }
}
