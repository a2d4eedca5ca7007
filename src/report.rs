use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::absentees;
use crate::attendance;
use crate::compliance;
use crate::incidents;
use crate::models::{Class, DailyReport, Incident};

pub struct ReportInput<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub term_label: Option<&'a str>,
    pub classes: &'a [Class],
    pub reports: &'a [DailyReport],
    pub incidents: &'a [Incident],
    pub absentee_threshold: usize,
}

pub fn build_report(input: &ReportInput<'_>) -> String {
    let compliance =
        compliance::calculate_compliance(input.classes, input.reports, input.start, input.end);
    let weeks =
        attendance::merge_classes(&attendance::weekly_rollup(input.reports, input.classes));
    let tallies = absentees::tally_absentees(input.reports, input.classes);
    let chronic = absentees::chronic_absentees(&tallies, input.absentee_threshold);
    let incident_summary = incidents::summarize_incidents(input.incidents);
    let labels: HashMap<Uuid, String> = input.classes.iter().map(|c| (c.id, c.label())).collect();
    let label_for = |id: &Uuid| labels.get(id).cloned().unwrap_or_else(|| id.to_string());

    let mut output = String::new();

    let _ = writeln!(output, "# School Daily Reports Summary");
    let _ = writeln!(
        output,
        "Covering {} to {}{}",
        input.start,
        input.end,
        input
            .term_label
            .map(|term| format!(" ({term})"))
            .unwrap_or_default()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Report Compliance");
    let _ = writeln!(
        output,
        "{} of {} expected reports submitted across {} school days ({:.1}%).",
        compliance.submitted, compliance.expected, compliance.school_days, compliance.rate
    );

    if compliance.classes.is_empty() {
        let _ = writeln!(output, "No active classes.");
    } else {
        let _ = writeln!(output);
        let _ = writeln!(output, "| Class | Submitted | Expected | Rate | Missing |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for class in &compliance.classes {
            let missing = if class.missing_dates.is_empty() {
                "-".to_string()
            } else {
                class
                    .missing_dates
                    .iter()
                    .map(|d| d.format("%b %d").to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.1}% | {} |",
                class.class_label, class.submitted, class.expected, class.rate, missing
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Attendance");

    if weeks.is_empty() {
        let _ = writeln!(output, "No reports submitted in this window.");
    } else {
        for week in &weeks {
            let _ = writeln!(
                output,
                "- {}: {:.1}% present ({} of {} learners over {} reports)",
                week.period,
                week.attendance_rate,
                week.present_learners,
                week.total_learners,
                week.report_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Chronic Absentees (absent {} or more days)",
        input.absentee_threshold
    );

    if chronic.is_empty() {
        let _ = writeln!(output, "No learners crossed the threshold.");
    } else {
        for tally in chronic.iter().take(20) {
            let _ = writeln!(
                output,
                "- {} ({}): {} of {} days, last absent {}",
                tally.learner_name,
                tally.class_label,
                tally.days_absent,
                tally.days_reported,
                tally.last_absent
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Incidents");

    if incident_summary.is_empty() {
        let _ = writeln!(output, "No high or critical incidents recorded.");
    } else {
        for summary in &incident_summary {
            let _ = writeln!(
                output,
                "- {} / {}: {}",
                summary.kind, summary.severity, summary.count
            );
        }
        let mut recent = input.incidents.to_vec();
        recent.sort_by(|a, b| b.incident_date.cmp(&a.incident_date));
        let _ = writeln!(output);
        for incident in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} {} ({} {}): {}",
                incident.incident_date,
                label_for(&incident.class_id),
                incident.severity,
                incident.kind,
                incident.details
            );
        }
    }

    let mut challenges: Vec<&DailyReport> = input
        .reports
        .iter()
        .filter(|r| r.challenges.as_deref().is_some_and(|c| !c.trim().is_empty()))
        .collect();
    challenges.sort_by(|a, b| b.report_date.cmp(&a.report_date));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Challenges");

    if challenges.is_empty() {
        let _ = writeln!(output, "No challenges reported.");
    } else {
        for report in challenges.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} {}: {}",
                report.report_date,
                label_for(&report.class_id),
                report.challenges.as_deref().unwrap_or_default().trim()
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::sample_report;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn empty_window_renders_placeholders() {
        let output = build_report(&ReportInput {
            start: date(2),
            end: date(6),
            term_label: None,
            classes: &[],
            reports: &[],
            incidents: &[],
            absentee_threshold: 3,
        });
        assert!(output.starts_with("# School Daily Reports Summary"));
        assert!(output.contains("No active classes."));
        assert!(output.contains("No reports submitted in this window."));
        assert!(output.contains("No learners crossed the threshold."));
        assert!(output.contains("No challenges reported."));
    }

    #[test]
    fn sections_reflect_reports() {
        let class = Class {
            id: Uuid::new_v4(),
            grade: "Grade 2".to_string(),
            stream: "Red".to_string(),
            active: true,
        };
        let mut reports = Vec::new();
        for d in [2, 3, 4] {
            let mut report = sample_report(date(d));
            report.class_id = class.id;
            report.absentees = "Amina Otieno".to_string();
            reports.push(report);
        }
        reports[2].challenges = Some("Rain flooded the classroom".to_string());

        let output = build_report(&ReportInput {
            start: date(2),
            end: date(6),
            term_label: Some("Term 1 2026"),
            classes: &[class],
            reports: &reports,
            incidents: &[],
            absentee_threshold: 3,
        });
        assert!(output.contains("(Term 1 2026)"));
        assert!(output.contains("3 of 5 expected reports"));
        assert!(output.contains("| Grade 2 Red | 3 | 5 | 60.0% | Mar 05, Mar 06 |"));
        assert!(output.contains("- Amina Otieno (Grade 2 Red): 3 of 3 days"));
        assert!(output.contains("Grade 2 Red: Rain flooded the classroom"));
    }

    #[test]
    fn deactivated_classes_keep_their_labels() {
        let active = Class {
            id: Uuid::new_v4(),
            grade: "Grade 3".to_string(),
            stream: "Blue".to_string(),
            active: true,
        };
        let closed = Class {
            id: Uuid::new_v4(),
            grade: "Grade 8".to_string(),
            stream: "West".to_string(),
            active: false,
        };
        let mut report = sample_report(date(3));
        report.class_id = closed.id;
        report.absentees = "Peter Mwangi".to_string();
        report.challenges = Some("Class merged into Grade 8 East".to_string());

        let output = build_report(&ReportInput {
            start: date(2),
            end: date(6),
            term_label: None,
            classes: &[active, closed.clone()],
            reports: &[report],
            incidents: &[],
            absentee_threshold: 1,
        });
        assert!(output.contains("0 of 5 expected reports"));
        assert!(!output.contains("| Grade 8 West |"));
        assert!(output.contains("- Peter Mwangi (Grade 8 West): 1 of 1 days"));
        assert!(output.contains("Grade 8 West: Class merged into Grade 8 East"));
        assert!(!output.contains(&closed.id.to_string()));
    }
}
