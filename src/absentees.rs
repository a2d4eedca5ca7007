use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{AbsenteeTally, Class, DailyReport};

const PLACEHOLDERS: &[&str] = &["none", "nil", "n/a", "na", "-", "nobody", "all present"];

fn strip_list_marker(entry: &str) -> &str {
    let trimmed = entry.trim_start();
    if let Some(rest) = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('*'))
        .or_else(|| trimmed.strip_prefix('•'))
    {
        return rest.trim_start();
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }

    trimmed
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn normalize_name(raw: &str) -> Option<String> {
    let stripped = strip_list_marker(raw);
    let name = stripped
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() || PLACEHOLDERS.contains(&name.to_lowercase().as_str()) {
        None
    } else {
        Some(name)
    }
}

/// Splits the free-text absentee field into normalized, de-duplicated names.
pub fn parse_absentees(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();

    for chunk in text.split([',', ';', '\n', '\r']) {
        let mut pending: Vec<&str> = Vec::new();
        let mut parts: Vec<String> = Vec::new();
        for word in chunk.split_whitespace() {
            if word.eq_ignore_ascii_case("and") || word == "&" {
                parts.push(pending.join(" "));
                pending.clear();
            } else {
                pending.push(word);
            }
        }
        parts.push(pending.join(" "));

        for part in parts {
            if let Some(name) = normalize_name(&part) {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
    }

    names
}

pub fn tally_absentees(reports: &[DailyReport], classes: &[Class]) -> Vec<AbsenteeTally> {
    let labels: HashMap<Uuid, String> = classes.iter().map(|c| (c.id, c.label())).collect();

    let mut reported_days: HashMap<Uuid, BTreeSet<NaiveDate>> = HashMap::new();
    let mut absences: HashMap<(Uuid, String), BTreeSet<NaiveDate>> = HashMap::new();

    for report in reports {
        reported_days
            .entry(report.class_id)
            .or_default()
            .insert(report.report_date);

        for name in parse_absentees(&report.absentees) {
            absences
                .entry((report.class_id, name))
                .or_default()
                .insert(report.report_date);
        }
    }

    let mut tallies: Vec<AbsenteeTally> = absences
        .into_iter()
        .filter_map(|((class_id, learner_name), dates)| {
            let first_absent = *dates.first()?;
            let last_absent = *dates.last()?;
            let days_reported = reported_days
                .get(&class_id)
                .map(BTreeSet::len)
                .unwrap_or(0);
            let days_absent = dates.len();
            Some(AbsenteeTally {
                class_id,
                class_label: labels
                    .get(&class_id)
                    .cloned()
                    .unwrap_or_else(|| class_id.to_string()),
                learner_name,
                days_absent,
                days_reported,
                absence_rate: if days_reported == 0 {
                    0.0
                } else {
                    days_absent as f64 / days_reported as f64 * 100.0
                },
                first_absent,
                last_absent,
            })
        })
        .collect();

    sort_tallies(&mut tallies);
    tallies
}

fn sort_tallies(tallies: &mut [AbsenteeTally]) {
    tallies.sort_by(|a, b| {
        b.days_absent
            .cmp(&a.days_absent)
            .then_with(|| a.learner_name.cmp(&b.learner_name))
            .then_with(|| a.class_label.cmp(&b.class_label))
    });
}

/// Learners absent on at least `threshold` reported days.
pub fn chronic_absentees(tallies: &[AbsenteeTally], threshold: usize) -> Vec<AbsenteeTally> {
    let mut chronic: Vec<AbsenteeTally> = tallies
        .iter()
        .filter(|tally| tally.days_absent >= threshold.max(1))
        .cloned()
        .collect();
    sort_tallies(&mut chronic);
    chronic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::sample_report;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn splits_on_separators_and_conjunctions() {
        let names = parse_absentees("amina otieno, BRIAN kip; Cynthia\nDavid and Esther & faith");
        assert_eq!(
            names,
            vec!["Amina Otieno", "Brian Kip", "Cynthia", "David", "Esther", "Faith"]
        );
    }

    #[test]
    fn strips_bullets_and_numbering() {
        let names = parse_absentees("1. Amina Otieno\n2) Brian Kip\n- Cynthia\n• David");
        assert_eq!(names, vec!["Amina Otieno", "Brian Kip", "Cynthia", "David"]);
    }

    #[test]
    fn placeholders_and_duplicates_are_dropped() {
        assert!(parse_absentees("None").is_empty());
        assert!(parse_absentees(" n/a ").is_empty());
        assert!(parse_absentees("").is_empty());
        assert_eq!(parse_absentees("Amina,  amina , AMINA"), vec!["Amina"]);
    }

    #[test]
    fn names_containing_and_survive() {
        assert_eq!(parse_absentees("Andrew Sandoval"), vec!["Andrew Sandoval"]);
    }

    #[test]
    fn tallies_count_days_per_class() {
        let class = Class {
            id: Uuid::new_v4(),
            grade: "Grade 3".to_string(),
            stream: "Blue".to_string(),
            active: true,
        };
        let mut reports = Vec::new();
        for (d, absentees) in [
            (2, "Amina Otieno, Brian Kip"),
            (3, "amina otieno"),
            (4, "None"),
            (5, "Amina Otieno"),
        ] {
            let mut report = sample_report(date(d));
            report.class_id = class.id;
            report.absentees = absentees.to_string();
            reports.push(report);
        }

        let tallies = tally_absentees(&reports, &[class]);
        assert_eq!(tallies.len(), 2);
        let amina = &tallies[0];
        assert_eq!(amina.learner_name, "Amina Otieno");
        assert_eq!(amina.class_label, "Grade 3 Blue");
        assert_eq!(amina.days_absent, 3);
        assert_eq!(amina.days_reported, 4);
        assert!((amina.absence_rate - 75.0).abs() < 0.001);
        assert_eq!(amina.first_absent, date(2));
        assert_eq!(amina.last_absent, date(5));

        let chronic = chronic_absentees(&tallies, 3);
        assert_eq!(chronic.len(), 1);
        assert_eq!(chronic[0].learner_name, "Amina Otieno");
    }

    #[test]
    fn same_name_in_two_classes_is_two_learners() {
        let mut first = sample_report(date(2));
        first.absentees = "Brian Kip".to_string();
        let mut second = sample_report(date(2));
        second.absentees = "Brian Kip".to_string();

        let tallies = tally_absentees(&[first, second], &[]);
        assert_eq!(tallies.len(), 2);
        assert!(tallies.iter().all(|t| t.days_absent == 1));
    }
}
