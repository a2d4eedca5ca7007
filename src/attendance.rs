use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::models::{AttendanceBucket, Class, DailyReport};

pub fn attendance_rate(present: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        present as f64 / total as f64 * 100.0
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[derive(Default)]
struct Accumulator {
    report_count: usize,
    total_learners: i64,
    present_learners: i64,
    health_incidents: usize,
    discipline_issues: usize,
    parent_communications: usize,
}

impl Accumulator {
    fn add(&mut self, report: &DailyReport) {
        self.report_count += 1;
        self.total_learners += report.total_learners as i64;
        self.present_learners += report.present_learners as i64;
        if report.health_incident {
            self.health_incidents += 1;
        }
        if report.discipline_issue {
            self.discipline_issues += 1;
        }
        if report.parent_communication {
            self.parent_communications += 1;
        }
    }

    fn into_bucket(
        self,
        period: String,
        period_start: NaiveDate,
        class_id: Option<Uuid>,
        class_label: String,
    ) -> AttendanceBucket {
        AttendanceBucket {
            period,
            period_start,
            class_id,
            class_label,
            report_count: self.report_count,
            total_learners: self.total_learners,
            present_learners: self.present_learners,
            attendance_rate: attendance_rate(self.present_learners, self.total_learners),
            health_incidents: self.health_incidents,
            discipline_issues: self.discipline_issues,
            parent_communications: self.parent_communications,
        }
    }
}

fn rollup<F, L>(
    reports: &[DailyReport],
    classes: &[Class],
    period_of: F,
    label_of: L,
) -> Vec<AttendanceBucket>
where
    F: Fn(NaiveDate) -> NaiveDate,
    L: Fn(NaiveDate) -> String,
{
    let labels: HashMap<Uuid, String> = classes.iter().map(|c| (c.id, c.label())).collect();
    let mut buckets: BTreeMap<(NaiveDate, String, Uuid), Accumulator> = BTreeMap::new();

    for report in reports {
        let label = labels
            .get(&report.class_id)
            .cloned()
            .unwrap_or_else(|| report.class_id.to_string());
        buckets
            .entry((period_of(report.report_date), label, report.class_id))
            .or_default()
            .add(report);
    }

    buckets
        .into_iter()
        .map(|((start, label, class_id), acc)| {
            acc.into_bucket(label_of(start), start, Some(class_id), label)
        })
        .collect()
}

/// Per-class buckets for weeks starting on Monday.
pub fn weekly_rollup(reports: &[DailyReport], classes: &[Class]) -> Vec<AttendanceBucket> {
    rollup(reports, classes, week_start, |start| {
        format!("week of {}", start.format("%Y-%m-%d"))
    })
}

pub fn monthly_rollup(reports: &[DailyReport], classes: &[Class]) -> Vec<AttendanceBucket> {
    rollup(reports, classes, month_start, |start| {
        start.format("%Y-%m").to_string()
    })
}

/// Whole-school totals per reporting day.
pub fn school_totals(reports: &[DailyReport]) -> Vec<AttendanceBucket> {
    let mut days: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for report in reports {
        days.entry(report.report_date).or_default().add(report);
    }

    days.into_iter()
        .map(|(date, acc)| {
            acc.into_bucket(
                date.format("%Y-%m-%d").to_string(),
                date,
                None,
                "whole school".to_string(),
            )
        })
        .collect()
}

/// Collapses per-class buckets into one whole-school bucket per period.
pub fn merge_classes(buckets: &[AttendanceBucket]) -> Vec<AttendanceBucket> {
    let mut merged: BTreeMap<NaiveDate, AttendanceBucket> = BTreeMap::new();
    for bucket in buckets {
        let entry = merged
            .entry(bucket.period_start)
            .or_insert_with(|| AttendanceBucket {
                period: bucket.period.clone(),
                period_start: bucket.period_start,
                class_id: None,
                class_label: "whole school".to_string(),
                report_count: 0,
                total_learners: 0,
                present_learners: 0,
                attendance_rate: 0.0,
                health_incidents: 0,
                discipline_issues: 0,
                parent_communications: 0,
            });
        entry.report_count += bucket.report_count;
        entry.total_learners += bucket.total_learners;
        entry.present_learners += bucket.present_learners;
        entry.health_incidents += bucket.health_incidents;
        entry.discipline_issues += bucket.discipline_issues;
        entry.parent_communications += bucket.parent_communications;
    }

    merged
        .into_values()
        .map(|mut bucket| {
            bucket.attendance_rate =
                attendance_rate(bucket.present_learners, bucket.total_learners);
            bucket
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::sample_report;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn class(grade: &str) -> Class {
        Class {
            id: Uuid::new_v4(),
            grade: grade.to_string(),
            stream: "A".to_string(),
            active: true,
        }
    }

    fn report(class: &Class, on: NaiveDate, total: i32, present: i32) -> DailyReport {
        let mut report = sample_report(on);
        report.class_id = class.id;
        report.total_learners = total;
        report.present_learners = present;
        report
    }

    #[test]
    fn rate_handles_empty_totals() {
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert!((attendance_rate(45, 50) - 90.0).abs() < 0.001);
    }

    #[test]
    fn weeks_start_on_monday() {
        assert_eq!(week_start(date(3, 5)), date(3, 2));
        assert_eq!(week_start(date(3, 2)), date(3, 2));
        assert_eq!(week_start(date(3, 8)), date(3, 2));
        assert_eq!(month_start(date(3, 17)), date(3, 1));
    }

    #[test]
    fn weekly_rollup_groups_by_class_and_week() {
        let first = class("Grade 1");
        let second = class("Grade 2");
        let mut flagged = report(&first, date(3, 3), 40, 36);
        flagged.health_incident = true;
        let reports = vec![
            report(&first, date(3, 2), 40, 38),
            flagged,
            report(&first, date(3, 9), 40, 40),
            report(&second, date(3, 4), 30, 15),
        ];

        let weeks = weekly_rollup(&reports, &[first, second]);
        assert_eq!(weeks.len(), 3);

        let week_one = &weeks[0];
        assert_eq!(week_one.class_label, "Grade 1 A");
        assert_eq!(week_one.period, "week of 2026-03-02");
        assert_eq!(week_one.report_count, 2);
        assert_eq!(week_one.total_learners, 80);
        assert_eq!(week_one.present_learners, 74);
        assert_eq!(week_one.health_incidents, 1);
        assert!((week_one.attendance_rate - 92.5).abs() < 0.001);

        assert_eq!(weeks[1].class_label, "Grade 2 A");
        assert!((weeks[1].attendance_rate - 50.0).abs() < 0.001);
        assert_eq!(weeks[2].period_start, date(3, 9));

        let school = merge_classes(&weeks);
        assert_eq!(school.len(), 2);
        assert_eq!(school[0].total_learners, 110);
        assert_eq!(school[0].present_learners, 89);
    }

    #[test]
    fn monthly_rollup_spans_month_boundaries() {
        let first = class("Grade 4");
        let reports = vec![
            report(&first, date(2, 27), 20, 18),
            report(&first, date(3, 2), 20, 20),
            report(&first, date(3, 3), 20, 19),
        ];
        let months = monthly_rollup(&reports, &[first]);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].period, "2026-02");
        assert_eq!(months[1].period, "2026-03");
        assert_eq!(months[1].present_learners, 39);
    }

    #[test]
    fn school_totals_sum_per_day() {
        let first = class("Grade 5");
        let second = class("Grade 6");
        let reports = vec![
            report(&first, date(3, 2), 20, 10),
            report(&second, date(3, 2), 30, 30),
        ];
        let totals = school_totals(&reports);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].report_count, 2);
        assert!((totals[0].attendance_rate - 80.0).abs() < 0.001);
    }
}
