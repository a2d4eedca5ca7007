use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::models::{Class, ClassCompliance, ComplianceSummary, DailyReport, SchoolSettings};

pub fn is_school_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Clamps a requested window to the configured term and to today.
pub fn effective_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    settings: Option<&SchoolSettings>,
) -> (NaiveDate, NaiveDate) {
    let mut start = start;
    let mut end = end.min(today);

    if let Some(settings) = settings {
        if let Some(term_start) = settings.term_start {
            start = start.max(term_start);
        }
        if let Some(term_end) = settings.term_end {
            end = end.min(term_end);
        }
    }

    (start, end)
}

pub fn school_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| is_school_day(*date))
        .collect()
}

pub fn rate(submitted: usize, expected: usize) -> f64 {
    if expected == 0 {
        100.0
    } else {
        submitted as f64 / expected as f64 * 100.0
    }
}

pub fn calculate_compliance(
    classes: &[Class],
    reports: &[DailyReport],
    start: NaiveDate,
    end: NaiveDate,
) -> ComplianceSummary {
    let days = school_days(start, end);
    let expected_days: BTreeSet<NaiveDate> = days.iter().copied().collect();

    let mut submitted_by_class: HashMap<Uuid, BTreeSet<NaiveDate>> = HashMap::new();
    for report in reports {
        if expected_days.contains(&report.report_date) {
            submitted_by_class
                .entry(report.class_id)
                .or_default()
                .insert(report.report_date);
        }
    }

    let mut rows: Vec<ClassCompliance> = classes
        .iter()
        .filter(|class| class.active)
        .map(|class| {
            let submitted = submitted_by_class.get(&class.id);
            let missing_dates: Vec<NaiveDate> = days
                .iter()
                .copied()
                .filter(|date| submitted.map(|set| !set.contains(date)).unwrap_or(true))
                .collect();
            let submitted_count = submitted.map(BTreeSet::len).unwrap_or(0);
            ClassCompliance {
                class_id: class.id,
                class_label: class.label(),
                expected: days.len(),
                submitted: submitted_count,
                missing_dates,
                rate: rate(submitted_count, days.len()),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.rate
            .partial_cmp(&b.rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.class_label.cmp(&b.class_label))
    });

    let expected: usize = rows.iter().map(|row| row.expected).sum();
    let submitted: usize = rows.iter().map(|row| row.submitted).sum();

    ComplianceSummary {
        start,
        end,
        school_days: days.len(),
        expected,
        submitted,
        rate: rate(submitted, expected),
        classes: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::sample_report;

    fn date(d: u32) -> NaiveDate {
        // March 2026: the 2nd is a Monday.
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn class(grade: &str, stream: &str, active: bool) -> Class {
        Class {
            id: Uuid::new_v4(),
            grade: grade.to_string(),
            stream: stream.to_string(),
            active,
        }
    }

    fn report_for(class: &Class, d: u32) -> DailyReport {
        let mut report = sample_report(date(d));
        report.class_id = class.id;
        report
    }

    #[test]
    fn school_days_skip_weekends() {
        let days = school_days(date(2), date(15));
        assert_eq!(days.len(), 10);
        assert!(days.iter().all(|d| is_school_day(*d)));
    }

    #[test]
    fn window_is_clamped_to_term_and_today() {
        let settings = SchoolSettings {
            term_start: Some(date(4)),
            term_end: Some(date(20)),
            ..SchoolSettings::default()
        };
        let (start, end) = effective_window(date(1), date(31), date(12), Some(&settings));
        assert_eq!(start, date(4));
        assert_eq!(end, date(12));
    }

    #[test]
    fn counts_distinct_school_day_reports() {
        let grade_one = class("Grade 1", "East", true);
        let grade_two = class("Grade 2", "West", true);
        let reports = vec![
            report_for(&grade_one, 2),
            report_for(&grade_one, 2),
            report_for(&grade_one, 3),
            report_for(&grade_one, 7),
            report_for(&grade_two, 2),
            report_for(&grade_two, 3),
            report_for(&grade_two, 4),
            report_for(&grade_two, 5),
            report_for(&grade_two, 6),
        ];

        let classes = [grade_one.clone(), grade_two];
        let summary = calculate_compliance(&classes, &reports, date(2), date(6));
        assert_eq!(summary.school_days, 5);
        assert_eq!(summary.expected, 10);
        assert_eq!(summary.submitted, 7);
        assert!((summary.rate - 70.0).abs() < 0.001);

        let first = &summary.classes[0];
        assert_eq!(first.class_id, grade_one.id);
        assert_eq!(first.submitted, 2);
        assert_eq!(first.missing_dates, vec![date(4), date(5), date(6)]);
        assert!((first.rate - 40.0).abs() < 0.001);
        assert!((summary.classes[1].rate - 100.0).abs() < 0.001);
    }

    #[test]
    fn inactive_classes_are_not_expected() {
        let retired = class("Grade 8", "North", false);
        let summary = calculate_compliance(&[retired], &[], date(2), date(6));
        assert!(summary.classes.is_empty());
        assert_eq!(summary.expected, 0);
        assert!((summary.rate - 100.0).abs() < 0.001);
    }

    #[test]
    fn weekend_only_window_owes_nothing() {
        let grade_one = class("Grade 1", "East", true);
        let summary = calculate_compliance(&[grade_one], &[], date(7), date(8));
        assert_eq!(summary.classes[0].expected, 0);
        assert!((summary.classes[0].rate - 100.0).abs() < 0.001);
    }
}
