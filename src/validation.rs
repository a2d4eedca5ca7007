use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DailyReport;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportValidationError {
    #[error("total learners must be positive, got {0}")]
    NoLearners(i32),
    #[error("present learners ({present}) must be between 0 and total learners ({total})")]
    PresentOutOfRange { present: i32, total: i32 },
    #[error("report date {date} is in the future (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },
    #[error("{0} incident is flagged but has no severity")]
    MissingSeverity(&'static str),
    #[error("{0} incident is flagged but has no details")]
    MissingDetails(&'static str),
    #[error("lessons covered must not be empty")]
    NoLessons,
    #[error("parent communication is flagged but has no details")]
    MissingParentDetails,
}

fn is_blank(value: Option<&String>) -> bool {
    value.map(|text| text.trim().is_empty()).unwrap_or(true)
}

/// Checks a report before it is sent to the store.
pub fn validate_report(
    report: &DailyReport,
    today: NaiveDate,
) -> Result<(), ReportValidationError> {
    if report.total_learners <= 0 {
        return Err(ReportValidationError::NoLearners(report.total_learners));
    }
    if report.present_learners < 0 || report.present_learners > report.total_learners {
        return Err(ReportValidationError::PresentOutOfRange {
            present: report.present_learners,
            total: report.total_learners,
        });
    }
    if report.report_date > today {
        return Err(ReportValidationError::FutureDate {
            date: report.report_date,
            today,
        });
    }
    if report.health_incident {
        if report.health_severity.is_none() {
            return Err(ReportValidationError::MissingSeverity("health"));
        }
        if is_blank(report.health_details.as_ref()) {
            return Err(ReportValidationError::MissingDetails("health"));
        }
    }
    if report.discipline_issue {
        if report.discipline_severity.is_none() {
            return Err(ReportValidationError::MissingSeverity("discipline"));
        }
        if is_blank(report.discipline_details.as_ref()) {
            return Err(ReportValidationError::MissingDetails("discipline"));
        }
    }
    if report.lessons_covered.trim().is_empty() {
        return Err(ReportValidationError::NoLessons);
    }
    if report.parent_communication && is_blank(report.parent_communication_details.as_ref()) {
        return Err(ReportValidationError::MissingParentDetails);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{FeedingStatus, Severity};
    use uuid::Uuid;

    pub(crate) fn sample_report(report_date: NaiveDate) -> DailyReport {
        DailyReport {
            id: Uuid::new_v4(),
            report_date,
            class_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            total_learners: 40,
            present_learners: 37,
            absentees: "Amina Otieno, Brian Kip, Cynthia Wanjiru".to_string(),
            health_incident: false,
            health_severity: None,
            health_details: None,
            discipline_issue: false,
            discipline_severity: None,
            discipline_details: None,
            feeding_status: FeedingStatus::Full,
            lessons_covered: "Maths: fractions".to_string(),
            literacy_topic: Some("Phonics".to_string()),
            parent_communication: false,
            parent_communication_details: None,
            challenges: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn accepts_complete_report() {
        assert_eq!(validate_report(&sample_report(day(2)), day(2)), Ok(()));
    }

    #[test]
    fn rejects_more_present_than_enrolled() {
        let mut report = sample_report(day(2));
        report.present_learners = 41;
        assert_eq!(
            validate_report(&report, day(2)),
            Err(ReportValidationError::PresentOutOfRange {
                present: 41,
                total: 40
            })
        );
    }

    #[test]
    fn rejects_future_dates() {
        let report = sample_report(day(5));
        assert!(matches!(
            validate_report(&report, day(4)),
            Err(ReportValidationError::FutureDate { .. })
        ));
    }

    #[test]
    fn flagged_incidents_need_severity_and_details() {
        let mut report = sample_report(day(2));
        report.health_incident = true;
        assert_eq!(
            validate_report(&report, day(2)),
            Err(ReportValidationError::MissingSeverity("health"))
        );

        report.health_severity = Some(Severity::High);
        report.health_details = Some("   ".to_string());
        assert_eq!(
            validate_report(&report, day(2)),
            Err(ReportValidationError::MissingDetails("health"))
        );

        report.health_details = Some("Fever, sent home".to_string());
        assert_eq!(validate_report(&report, day(2)), Ok(()));
    }

    #[test]
    fn parent_communication_needs_details() {
        let mut report = sample_report(day(2));
        report.parent_communication = true;
        assert_eq!(
            validate_report(&report, day(2)),
            Err(ReportValidationError::MissingParentDetails)
        );
    }
}
