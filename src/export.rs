use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AbsenteeTally, AttendanceBucket, ComplianceSummary, DailyReport};

#[derive(Serialize)]
struct ComplianceRow<'a> {
    class_id: Uuid,
    class: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    expected: usize,
    submitted: usize,
    rate: String,
    missing_dates: String,
}

pub fn write_compliance<W: Write>(out: W, summary: &ComplianceSummary) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for class in &summary.classes {
        writer.serialize(ComplianceRow {
            class_id: class.class_id,
            class: &class.class_label,
            start: summary.start,
            end: summary.end,
            expected: class.expected,
            submitted: class.submitted,
            rate: format!("{:.1}", class.rate),
            missing_dates: class
                .missing_dates
                .iter()
                .map(NaiveDate::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct AbsenteeRow<'a> {
    class_id: Uuid,
    class: &'a str,
    learner: &'a str,
    days_absent: usize,
    days_reported: usize,
    absence_rate: String,
    first_absent: NaiveDate,
    last_absent: NaiveDate,
}

pub fn write_absentees<W: Write>(out: W, tallies: &[AbsenteeTally]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for tally in tallies {
        writer.serialize(AbsenteeRow {
            class_id: tally.class_id,
            class: &tally.class_label,
            learner: &tally.learner_name,
            days_absent: tally.days_absent,
            days_reported: tally.days_reported,
            absence_rate: format!("{:.1}", tally.absence_rate),
            first_absent: tally.first_absent,
            last_absent: tally.last_absent,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct AttendanceRow<'a> {
    period: &'a str,
    class_id: Option<Uuid>,
    class: &'a str,
    reports: usize,
    total_learners: i64,
    present_learners: i64,
    attendance_rate: String,
    health_incidents: usize,
    discipline_issues: usize,
    parent_communications: usize,
}

pub fn write_attendance<W: Write>(out: W, buckets: &[AttendanceBucket]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for bucket in buckets {
        writer.serialize(AttendanceRow {
            period: &bucket.period,
            class_id: bucket.class_id,
            class: &bucket.class_label,
            reports: bucket.report_count,
            total_learners: bucket.total_learners,
            present_learners: bucket.present_learners,
            attendance_rate: format!("{:.1}", bucket.attendance_rate),
            health_incidents: bucket.health_incidents,
            discipline_issues: bucket.discipline_issues,
            parent_communications: bucket.parent_communications,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ReportRow<'a> {
    report_date: NaiveDate,
    class: &'a str,
    total_learners: i32,
    present_learners: i32,
    absentees: &'a str,
    health_severity: &'a str,
    discipline_severity: &'a str,
    feeding_status: &'a str,
    lessons_covered: &'a str,
    literacy_topic: &'a str,
    parent_communication: bool,
    challenges: &'a str,
}

/// Raw reports, one row each; `class_label` resolves a class id to its display name.
pub fn write_reports<W, F>(out: W, reports: &[DailyReport], class_label: F) -> anyhow::Result<()>
where
    W: Write,
    F: Fn(&DailyReport) -> String,
{
    let mut writer = csv::Writer::from_writer(out);
    for report in reports {
        let class = class_label(report);
        writer.serialize(ReportRow {
            report_date: report.report_date,
            class: &class,
            total_learners: report.total_learners,
            present_learners: report.present_learners,
            absentees: report.absentees.trim(),
            health_severity: report.health_severity.map(|s| s.as_str()).unwrap_or(""),
            discipline_severity: report.discipline_severity.map(|s| s.as_str()).unwrap_or(""),
            feeding_status: report.feeding_status.as_str(),
            lessons_covered: &report.lessons_covered,
            literacy_topic: report.literacy_topic.as_deref().unwrap_or(""),
            parent_communication: report.parent_communication,
            challenges: report.challenges.as_deref().unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::calculate_compliance;
    use crate::models::Class;
    use crate::validation::tests::sample_report;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn compliance_csv_lists_missing_dates() {
        let class = Class {
            id: Uuid::new_v4(),
            grade: "Grade 7".to_string(),
            stream: "South".to_string(),
            active: true,
        };
        let mut report = sample_report(date(2));
        report.class_id = class.id;
        let class_id = class.id;
        let summary = calculate_compliance(&[class], &[report], date(2), date(4));

        let mut buffer = Vec::new();
        write_compliance(&mut buffer, &summary).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("class_id,class,start,end,expected,submitted,rate,missing_dates")
        );
        let expected = format!(
            "{class_id},Grade 7 South,2026-03-02,2026-03-04,3,1,33.3,2026-03-03 2026-03-04"
        );
        assert_eq!(lines.next(), Some(expected.as_str()));
    }

    #[test]
    fn report_csv_quotes_multiline_absentees() {
        let mut report = sample_report(date(2));
        report.absentees = "Amina\nBrian".to_string();
        let mut buffer = Vec::new();
        write_reports(&mut buffer, &[report], |_| "Grade 1 East".to_string()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("report_date,class,total_learners"));
        assert!(text.contains("\"Amina\nBrian\""));
        assert!(text.contains("Grade 1 East"));
    }
}
