use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Headteacher,
    Director,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Headteacher => "headteacher",
            Role::Director => "director",
            Role::Admin => "admin",
        }
    }

    /// Roles allowed to review reports and leave comments.
    pub fn can_review(self) -> bool {
        !matches!(self, Role::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "headteacher" => Ok(Role::Headteacher),
            "director" => Ok(Role::Director),
            "admin" => Ok(Role::Admin),
            other => anyhow::bail!("unknown role '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn is_flagged(self) -> bool {
        self >= Severity::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => anyhow::bail!("unknown severity '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingStatus {
    Full,
    Partial,
    None,
    NotApplicable,
}

impl FeedingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedingStatus::Full => "full",
            FeedingStatus::Partial => "partial",
            FeedingStatus::None => "none",
            FeedingStatus::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for FeedingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedingStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "full" => Ok(FeedingStatus::Full),
            "partial" => Ok(FeedingStatus::Partial),
            "none" => Ok(FeedingStatus::None),
            "not_applicable" | "n/a" | "na" => Ok(FeedingStatus::NotApplicable),
            other => anyhow::bail!("unknown feeding status '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Health,
    Discipline,
}

impl IncidentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentKind::Health => "health",
            IncidentKind::Discipline => "discipline",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(IncidentKind::Health),
            "discipline" => Ok(IncidentKind::Discipline),
            other => anyhow::bail!("unknown incident kind '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: Uuid,
    pub grade: String,
    pub stream: String,
    pub active: bool,
}

impl Class {
    pub fn label(&self) -> String {
        format!("{} {}", self.grade, self.stream)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub class_id: Uuid,
    pub class_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: Uuid,
    pub report_date: NaiveDate,
    pub class_id: Uuid,
    pub teacher_id: Uuid,
    pub total_learners: i32,
    pub present_learners: i32,
    pub absentees: String,
    pub health_incident: bool,
    pub health_severity: Option<Severity>,
    pub health_details: Option<String>,
    pub discipline_issue: bool,
    pub discipline_severity: Option<Severity>,
    pub discipline_details: Option<String>,
    pub feeding_status: FeedingStatus,
    pub lessons_covered: String,
    pub literacy_topic: Option<String>,
    pub parent_communication: bool,
    pub parent_communication_details: Option<String>,
    pub challenges: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub report_id: Uuid,
    pub class_id: Uuid,
    pub incident_date: NaiveDate,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadComment {
    pub id: Uuid,
    pub report_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolSettings {
    pub academic_year: String,
    pub current_term: String,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub notify_missing_reports: bool,
    pub reminder_time: Option<String>,
    pub notification_email: Option<String>,
    pub absentee_threshold: i32,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            academic_year: String::new(),
            current_term: String::new(),
            term_start: None,
            term_end: None,
            notify_missing_reports: false,
            reminder_time: None,
            notification_email: None,
            absentee_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassCompliance {
    pub class_id: Uuid,
    pub class_label: String,
    pub expected: usize,
    pub submitted: usize,
    pub missing_dates: Vec<NaiveDate>,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub school_days: usize,
    pub expected: usize,
    pub submitted: usize,
    pub rate: f64,
    pub classes: Vec<ClassCompliance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbsenteeTally {
    pub class_id: Uuid,
    pub class_label: String,
    pub learner_name: String,
    pub days_absent: usize,
    pub days_reported: usize,
    pub absence_rate: f64,
    pub first_absent: NaiveDate,
    pub last_absent: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceBucket {
    pub period: String,
    pub period_start: NaiveDate,
    pub class_id: Option<Uuid>,
    pub class_label: String,
    pub report_count: usize,
    pub total_learners: i64,
    pub present_learners: i64,
    pub attendance_rate: f64,
    pub health_incidents: usize,
    pub discipline_issues: usize,
    pub parent_communications: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentSummary {
    pub kind: IncidentKind,
    pub severity: Severity,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_store_text() {
        assert_eq!("Headteacher".parse::<Role>().unwrap(), Role::Headteacher);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(
            "not applicable".parse::<FeedingStatus>().unwrap(),
            FeedingStatus::NotApplicable
        );
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn only_high_and_critical_are_flagged() {
        assert!(!Severity::Low.is_flagged());
        assert!(!Severity::Medium.is_flagged());
        assert!(Severity::High.is_flagged());
        assert!(Severity::Critical.is_flagged());
    }

    #[test]
    fn teachers_cannot_review() {
        assert!(!Role::Teacher.can_review());
        assert!(Role::Headteacher.can_review());
        assert!(Role::Director.can_review());
        assert!(Role::Admin.can_review());
    }
}
