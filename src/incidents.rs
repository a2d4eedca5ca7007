use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{DailyReport, Incident, IncidentKind, IncidentSummary, Severity};

/// Incidents implied by a report: health first, then discipline, each only
/// when flagged at high or critical severity.
pub fn derive_incidents(report: &DailyReport) -> Vec<Incident> {
    let candidates = [
        (
            IncidentKind::Health,
            report.health_incident,
            report.health_severity,
            report.health_details.as_deref(),
        ),
        (
            IncidentKind::Discipline,
            report.discipline_issue,
            report.discipline_severity,
            report.discipline_details.as_deref(),
        ),
    ];

    candidates
        .into_iter()
        .filter_map(|(kind, flagged, severity, details)| {
            let severity = severity.filter(|s| flagged && s.is_flagged())?;
            Some(Incident {
                id: Uuid::new_v4(),
                report_id: report.id,
                class_id: report.class_id,
                incident_date: report.report_date,
                kind,
                severity,
                details: details.unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

pub fn summarize_incidents(incidents: &[Incident]) -> Vec<IncidentSummary> {
    let mut map: HashMap<(IncidentKind, Severity), usize> = HashMap::new();

    for incident in incidents {
        *map.entry((incident.kind, incident.severity)).or_insert(0) += 1;
    }

    let mut summaries: Vec<IncidentSummary> = map
        .into_iter()
        .map(|((kind, severity), count)| IncidentSummary {
            kind,
            severity,
            count,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::tests::sample_report;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn low_severity_does_not_create_incident() {
        let mut report = sample_report(day());
        report.health_incident = true;
        report.health_severity = Some(Severity::Medium);
        report.health_details = Some("Headache".to_string());
        assert!(derive_incidents(&report).is_empty());
    }

    #[test]
    fn flagged_health_and_discipline_both_recorded() {
        let mut report = sample_report(day());
        report.health_incident = true;
        report.health_severity = Some(Severity::Critical);
        report.health_details = Some(" Asthma attack ".to_string());
        report.discipline_issue = true;
        report.discipline_severity = Some(Severity::High);
        report.discipline_details = Some("Fight at break".to_string());

        let incidents = derive_incidents(&report);
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].kind, IncidentKind::Health);
        assert_eq!(incidents[0].details, "Asthma attack");
        assert_eq!(incidents[1].kind, IncidentKind::Discipline);
        assert_eq!(incidents[1].report_id, report.id);
        assert_eq!(incidents[1].incident_date, day());
    }

    #[test]
    fn severity_without_flag_is_ignored() {
        let mut report = sample_report(day());
        report.discipline_severity = Some(Severity::Critical);
        assert!(derive_incidents(&report).is_empty());
    }

    #[test]
    fn summary_orders_by_severity() {
        let mut report = sample_report(day());
        report.health_incident = true;
        report.health_severity = Some(Severity::High);
        report.discipline_issue = true;
        report.discipline_severity = Some(Severity::Critical);
        let mut incidents = derive_incidents(&report);
        incidents.extend(derive_incidents(&report));

        let summary = summarize_incidents(&incidents);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].severity, Severity::Critical);
        assert_eq!(summary[0].kind, IncidentKind::Discipline);
        assert_eq!(summary[0].count, 2);
    }
}
