//! Registration domain types and payload validation

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::utils::serde_ext::double_option;

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Review status of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Selected,
    NotSelected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Selected => "selected",
            RegistrationStatus::NotSelected => "not_selected",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "selected" => Ok(RegistrationStatus::Selected),
            "not_selected" => Ok(RegistrationStatus::NotSelected),
            other => Err(DomainError::Validation(format!(
                "status: unknown status '{}'",
                other
            ))),
        }
    }
}

/// A team registration as submitted by the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRegistration {
    pub team_name: String,
    pub leader_name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub leader_dept: String,
    pub member2_name: String,
    pub member2_email: String,
    pub member2_dept: String,
    #[serde(default)]
    pub member3_name: Option<String>,
    #[serde(default)]
    pub member3_email: Option<String>,
    #[serde(default)]
    pub member3_dept: Option<String>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub git_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RegistrationStatus>,
}

/// A persisted registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub team_name: String,
    pub leader_name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub leader_dept: String,
    pub member2_name: String,
    pub member2_email: String,
    pub member2_dept: String,
    #[serde(default)]
    pub member3_name: Option<String>,
    #[serde(default)]
    pub member3_email: Option<String>,
    #[serde(default)]
    pub member3_dept: Option<String>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub git_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Registration {
    /// Build a record from a payload once an id and timestamp are known
    pub fn from_new(id: i64, created_at: String, new: NewRegistration) -> Self {
        Self {
            id,
            team_name: new.team_name,
            leader_name: new.leader_name,
            email: new.email,
            mobile: new.mobile,
            college: new.college,
            leader_dept: new.leader_dept,
            member2_name: new.member2_name,
            member2_email: new.member2_email,
            member2_dept: new.member2_dept,
            member3_name: new.member3_name,
            member3_email: new.member3_email,
            member3_dept: new.member3_dept,
            project_title: new.project_title,
            project_description: new.project_description,
            git_link: new.git_link,
            notes: new.notes,
            status: new.status.unwrap_or_default(),
            created_at,
            updated_at: None,
        }
    }

    /// Apply a partial update in place. Does not touch `updated_at`.
    pub fn apply(&mut self, changes: &RegistrationChanges) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = &changes.$field {
                    self.$field = v.clone();
                })*
            };
        }
        set!(
            team_name,
            leader_name,
            email,
            mobile,
            college,
            leader_dept,
            member2_name,
            member2_email,
            member2_dept,
            member3_name,
            member3_email,
            member3_dept,
            project_title,
            project_description,
            git_link,
            notes
        );
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    /// Case-insensitive match of an already lowercased term
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.team_name.to_lowercase().contains(needle)
            || self.leader_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

impl From<Registration> for NewRegistration {
    fn from(r: Registration) -> Self {
        Self {
            team_name: r.team_name,
            leader_name: r.leader_name,
            email: r.email,
            mobile: r.mobile,
            college: r.college,
            leader_dept: r.leader_dept,
            member2_name: r.member2_name,
            member2_email: r.member2_email,
            member2_dept: r.member2_dept,
            member3_name: r.member3_name,
            member3_email: r.member3_email,
            member3_dept: r.member3_dept,
            project_title: r.project_title,
            project_description: r.project_description,
            git_link: r.git_link,
            notes: r.notes,
            status: Some(r.status),
        }
    }
}

/// Partial update. Nullable columns take `Some(None)` to clear the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_dept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member2_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member2_dept: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub member3_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub member3_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub member3_dept: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub project_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub project_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub git_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RegistrationStatus>,
}

impl RegistrationChanges {
    pub fn status(status: RegistrationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filter criteria for registration queries
#[derive(Debug, Default, Clone)]
pub struct RegistrationFilter {
    pub search: Option<String>,
    pub dept: Option<String>,
}

impl RegistrationFilter {
    pub fn new(search: impl Into<String>, dept: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            dept: Some(dept.into()),
        }
    }

    /// Trimmed search term, `None` when empty
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Department to match exactly; empty and "All" mean no filter
    pub fn department(&self) -> Option<&str> {
        self.dept
            .as_deref()
            .filter(|d| !d.is_empty() && *d != "All")
    }

    pub fn matches(&self, record: &Registration) -> bool {
        let needle = self.search_term().unwrap_or("").to_lowercase();
        let dept_ok = match self.department() {
            Some(dept) => record.leader_dept == dept,
            None => true,
        };
        record.matches_search(&needle) && dept_ok
    }
}

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationStats {
    pub total: u64,
    pub pending: u64,
    pub selected: u64,
    pub rejected: u64,
    #[serde(rename = "byDept")]
    pub by_dept: std::collections::BTreeMap<String, u64>,
}

impl RegistrationStats {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut stats = Self::default();
        for (status, dept) in rows {
            stats.total += 1;
            match status {
                "pending" => stats.pending += 1,
                "selected" => stats.selected += 1,
                "not_selected" => stats.rejected += 1,
                _ => {}
            }
            *stats.by_dept.entry(dept.to_string()).or_insert(0) += 1;
        }
        stats
    }
}

impl NewRegistration {
    /// Default the status to pending
    pub fn normalized(mut self) -> Self {
        self.status = Some(self.status.unwrap_or_default());
        self
    }

    /// Check mandatory fields and formats, collecting every failure
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors: Vec<String> = Vec::new();

        check_len(&mut errors, "team_name", &self.team_name, 2, 50);
        check_len(&mut errors, "leader_name", &self.leader_name, 2, 100);
        check_email(&mut errors, "email", &self.email);
        if !MOBILE_RE.is_match(self.mobile.trim()) {
            errors.push("mobile: Please enter a valid 10-digit mobile number".to_string());
        }
        check_len(&mut errors, "college", &self.college, 2, 200);
        check_required(&mut errors, "leader_dept", &self.leader_dept);
        check_len(&mut errors, "member2_name", &self.member2_name, 2, 100);
        check_email(&mut errors, "member2_email", &self.member2_email);
        check_required(&mut errors, "member2_dept", &self.member2_dept);

        if let Some(email) = self.member3_email.as_deref().filter(|e| !e.trim().is_empty()) {
            check_email(&mut errors, "member3_email", email);
        }
        if let Some(link) = self.git_link.as_deref().filter(|l| !l.trim().is_empty())
            && url::Url::parse(link.trim()).is_err()
        {
            errors.push("git_link: must be an absolute URL".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors.join("; ")))
        }
    }
}

fn check_required(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{}: is required", field));
    }
}

fn check_len(errors: &mut Vec<String>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len < min {
        errors.push(format!("{}: must be at least {} characters", field, min));
    } else if len > max {
        errors.push(format!("{}: must be less than {} characters", field, max));
    }
}

fn check_email(errors: &mut Vec<String>, field: &str, value: &str) {
    let value = value.trim();
    if !EMAIL_RE.is_match(value) {
        errors.push(format!("{}: Please enter a valid email address", field));
    } else if value.len() > 255 {
        errors.push(format!("{}: must be less than 255 characters", field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewRegistration {
        NewRegistration {
            team_name: "Byte Busters".into(),
            leader_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            mobile: "9876543210".into(),
            college: "City Engineering College".into(),
            leader_dept: "CS".into(),
            member2_name: "Ravi Kumar".into(),
            member2_email: "ravi@example.com".into(),
            member2_dept: "CS".into(),
            member3_name: None,
            member3_email: None,
            member3_dept: None,
            project_title: None,
            project_description: None,
            git_link: None,
            notes: None,
            status: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn collects_field_messages() {
        let mut p = payload();
        p.team_name = "B".into();
        p.mobile = "12345".into();
        p.member2_email = "not-an-email".into();

        let err = p.validate().unwrap_err().to_string();
        assert!(err.contains("team_name"));
        assert!(err.contains("mobile"));
        assert!(err.contains("member2_email"));
        assert!(!err.contains("leader_name"));
    }

    #[test]
    fn member3_is_independent() {
        let mut p = payload();
        p.member3_name = Some("Only A Name".into());
        assert!(p.validate().is_ok());

        p.member3_email = Some("broken".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn normalized_defaults_to_pending() {
        assert_eq!(payload().normalized().status, Some(RegistrationStatus::Pending));

        let mut p = payload();
        p.status = Some(RegistrationStatus::Selected);
        assert_eq!(p.normalized().status, Some(RegistrationStatus::Selected));
    }

    #[test]
    fn changes_distinguish_null_from_absent() {
        let changes: RegistrationChanges =
            serde_json::from_str(r#"{"notes": null, "team_name": "New"}"#).unwrap();
        assert_eq!(changes.notes, Some(None));
        assert_eq!(changes.project_title, None);
        assert_eq!(changes.team_name.as_deref(), Some("New"));
    }

    #[test]
    fn filter_treats_all_as_no_department() {
        let record = Registration::from_new(1, "2026-01-01T00:00:00.000Z".into(), payload());
        assert!(RegistrationFilter::new("", "All").matches(&record));
        assert!(RegistrationFilter::new("BYTE", "").matches(&record));
        assert!(RegistrationFilter::new("asha@", "CS").matches(&record));
        assert!(!RegistrationFilter::new("", "AIML").matches(&record));
        assert!(!RegistrationFilter::new("zeta", "All").matches(&record));
    }

    #[test]
    fn stats_count_not_selected_as_rejected() {
        let rows = vec![("pending", "CS"), ("not_selected", "IT"), ("selected", "CS")];
        let stats = RegistrationStats::from_rows(rows.iter().map(|(s, d)| (*s, *d)));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.by_dept.get("CS"), Some(&2));
    }
}
