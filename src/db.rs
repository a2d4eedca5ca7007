use std::collections::HashMap;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::compliance;
use crate::incidents;
use crate::models::{
    Class, DailyReport, FeedingStatus, HeadComment, Incident, Profile, Role, SchoolSettings,
    Severity, TeacherAssignment,
};
use crate::validation;

const REPORT_COLUMNS: &str = "r.id, r.report_date, r.class_id, r.teacher_id, r.total_learners, \
     r.present_learners, r.absentees, r.health_incident, r.health_severity, r.health_details, \
     r.discipline_issue, r.discipline_severity, r.discipline_details, r.feeding_status, \
     r.lessons_covered, r.literacy_topic, r.parent_communication, \
     r.parent_communication_details, r.challenges";

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn optional_severity(row: &PgRow, column: &str) -> anyhow::Result<Option<Severity>> {
    row.get::<Option<String>, _>(column)
        .map(|value| value.parse())
        .transpose()
}

fn report_from_row(row: &PgRow) -> anyhow::Result<DailyReport> {
    Ok(DailyReport {
        id: row.get("id"),
        report_date: row.get("report_date"),
        class_id: row.get("class_id"),
        teacher_id: row.get("teacher_id"),
        total_learners: row.get("total_learners"),
        present_learners: row.get("present_learners"),
        absentees: row.get("absentees"),
        health_incident: row.get("health_incident"),
        health_severity: optional_severity(row, "health_severity")?,
        health_details: row.get("health_details"),
        discipline_issue: row.get("discipline_issue"),
        discipline_severity: optional_severity(row, "discipline_severity")?,
        discipline_details: row.get("discipline_details"),
        feeding_status: row.get::<String, _>("feeding_status").parse()?,
        lessons_covered: row.get("lessons_covered"),
        literacy_topic: row.get("literacy_topic"),
        parent_communication: row.get("parent_communication"),
        parent_communication_details: row.get("parent_communication_details"),
        challenges: row.get("challenges"),
    })
}

fn profile_from_row(row: &PgRow) -> anyhow::Result<Profile> {
    Ok(Profile {
        id: row.get("id"),
        full_name: row.get("full_name"),
        role: row.get::<String, _>("role").parse()?,
    })
}

fn class_from_row(row: &PgRow) -> Class {
    Class {
        id: row.get("id"),
        grade: row.get("grade"),
        stream: row.get("stream"),
        active: row.get("active"),
    }
}

pub async fn create_profile(pool: &PgPool, full_name: &str, role: Role) -> anyhow::Result<Profile> {
    let row = sqlx::query(
        r#"
        INSERT INTO school_reports.profiles (id, full_name, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (full_name) DO UPDATE SET role = EXCLUDED.role
        RETURNING id, full_name, role
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name.trim())
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .context("failed to save profile")?;

    profile_from_row(&row)
}

pub async fn list_profiles(pool: &PgPool, role: Option<Role>) -> anyhow::Result<Vec<Profile>> {
    let rows = match role {
        Some(role) => {
            sqlx::query(
                "SELECT id, full_name, role FROM school_reports.profiles \
                 WHERE role = $1 ORDER BY full_name",
            )
            .bind(role.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                "SELECT id, full_name, role FROM school_reports.profiles ORDER BY full_name",
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(profile_from_row).collect()
}

pub async fn fetch_profile(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query("SELECT id, full_name, role FROM school_reports.profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(profile_from_row).transpose()
}

async fn find_profile_by_name(
    conn: &mut PgConnection,
    full_name: &str,
) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query(
        "SELECT id, full_name, role FROM school_reports.profiles \
         WHERE lower(full_name) = lower($1)",
    )
    .bind(full_name.trim())
    .fetch_optional(&mut *conn)
    .await?;
    row.as_ref().map(profile_from_row).transpose()
}

pub async fn create_class(pool: &PgPool, grade: &str, stream: &str) -> anyhow::Result<Class> {
    let row = sqlx::query(
        r#"
        INSERT INTO school_reports.classes (id, grade, stream, active)
        VALUES ($1, $2, $3, TRUE)
        ON CONFLICT (grade, stream) DO UPDATE SET active = TRUE
        RETURNING id, grade, stream, active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(grade.trim())
    .bind(stream.trim())
    .fetch_one(pool)
    .await
    .context("failed to save class")?;

    Ok(class_from_row(&row))
}

pub async fn list_classes(pool: &PgPool, active_only: bool) -> anyhow::Result<Vec<Class>> {
    let rows = sqlx::query(
        "SELECT id, grade, stream, active FROM school_reports.classes \
         WHERE active OR NOT $1 ORDER BY grade, stream",
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(class_from_row).collect())
}

pub async fn set_class_active(pool: &PgPool, class_id: Uuid, active: bool) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE school_reports.classes SET active = $2 WHERE id = $1")
        .bind(class_id)
        .bind(active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn find_class(
    conn: &mut PgConnection,
    grade: &str,
    stream: &str,
) -> anyhow::Result<Option<Class>> {
    let row = sqlx::query(
        "SELECT id, grade, stream, active FROM school_reports.classes \
         WHERE lower(grade) = lower($1) AND lower(stream) = lower($2)",
    )
    .bind(grade.trim())
    .bind(stream.trim())
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.as_ref().map(class_from_row))
}

/// Makes `class_id` the teacher's only active assignment.
pub async fn assign_teacher(pool: &PgPool, teacher_id: Uuid, class_id: Uuid) -> anyhow::Result<()> {
    let teacher = fetch_profile(pool, teacher_id)
        .await?
        .with_context(|| format!("no profile with id {teacher_id}"))?;
    if teacher.role != Role::Teacher {
        anyhow::bail!(
            "{} is a {}, only teachers can be assigned to classes",
            teacher.full_name,
            teacher.role
        );
    }

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE school_reports.teacher_classes SET active = FALSE WHERE teacher_id = $1")
        .bind(teacher_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r#"
        INSERT INTO school_reports.teacher_classes (teacher_id, class_id, active)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (teacher_id, class_id) DO UPDATE SET active = TRUE, assigned_at = now()
        "#,
    )
    .bind(teacher_id)
    .bind(class_id)
    .execute(&mut *tx)
    .await
    .context("failed to assign teacher")?;
    tx.commit().await?;

    info!(%teacher_id, %class_id, "teacher assigned");
    Ok(())
}

pub async fn list_assignments(pool: &PgPool) -> anyhow::Result<Vec<TeacherAssignment>> {
    let rows = sqlx::query(
        "SELECT p.id AS teacher_id, p.full_name, c.id AS class_id, c.grade, c.stream \
         FROM school_reports.teacher_classes tc \
         JOIN school_reports.profiles p ON p.id = tc.teacher_id \
         JOIN school_reports.classes c ON c.id = tc.class_id \
         WHERE tc.active \
         ORDER BY c.grade, c.stream",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TeacherAssignment {
            teacher_id: row.get("teacher_id"),
            teacher_name: row.get("full_name"),
            class_id: row.get("class_id"),
            class_label: format!(
                "{} {}",
                row.get::<String, _>("grade"),
                row.get::<String, _>("stream")
            ),
        })
        .collect())
}

/// Inserts a report and its derived incidents. Returns `None` when the
/// class already has a report for that date.
async fn insert_report(
    conn: &mut PgConnection,
    report: &DailyReport,
) -> anyhow::Result<Option<Vec<Incident>>> {
    let result = sqlx::query(
        r#"
        INSERT INTO school_reports.daily_reports
        (id, report_date, class_id, teacher_id, total_learners, present_learners, absentees,
         health_incident, health_severity, health_details,
         discipline_issue, discipline_severity, discipline_details,
         feeding_status, lessons_covered, literacy_topic,
         parent_communication, parent_communication_details, challenges)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19)
        ON CONFLICT (class_id, report_date) DO NOTHING
        "#,
    )
    .bind(report.id)
    .bind(report.report_date)
    .bind(report.class_id)
    .bind(report.teacher_id)
    .bind(report.total_learners)
    .bind(report.present_learners)
    .bind(&report.absentees)
    .bind(report.health_incident)
    .bind(report.health_severity.map(Severity::as_str))
    .bind(&report.health_details)
    .bind(report.discipline_issue)
    .bind(report.discipline_severity.map(Severity::as_str))
    .bind(&report.discipline_details)
    .bind(report.feeding_status.as_str())
    .bind(&report.lessons_covered)
    .bind(&report.literacy_topic)
    .bind(report.parent_communication)
    .bind(&report.parent_communication_details)
    .bind(&report.challenges)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let derived = incidents::derive_incidents(report);
    for incident in &derived {
        sqlx::query(
            r#"
            INSERT INTO school_reports.incidents
            (id, report_id, class_id, incident_date, kind, severity, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(incident.id)
        .bind(incident.report_id)
        .bind(incident.class_id)
        .bind(incident.incident_date)
        .bind(incident.kind.as_str())
        .bind(incident.severity.as_str())
        .bind(&incident.details)
        .execute(&mut *conn)
        .await?;
    }

    Ok(Some(derived))
}

pub async fn submit_report(pool: &PgPool, report: &DailyReport) -> anyhow::Result<Vec<Incident>> {
    validation::validate_report(report, Utc::now().date_naive())?;

    let mut tx = pool.begin().await?;
    let Some(created) = insert_report(&mut tx, report).await? else {
        anyhow::bail!(
            "class {} already has a report for {}",
            report.class_id,
            report.report_date
        );
    };
    tx.commit().await.context("failed to commit daily report")?;

    info!(
        report_id = %report.id,
        class_id = %report.class_id,
        date = %report.report_date,
        incidents = created.len(),
        "daily report submitted"
    );
    Ok(created)
}

pub async fn delete_report(pool: &PgPool, report_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM school_reports.daily_reports WHERE id = $1")
        .bind(report_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_report(pool: &PgPool, report_id: Uuid) -> anyhow::Result<Option<DailyReport>> {
    let query =
        format!("SELECT {REPORT_COLUMNS} FROM school_reports.daily_reports r WHERE r.id = $1");
    let row = sqlx::query(&query)
        .bind(report_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(report_from_row).transpose()
}

pub async fn fetch_reports(
    pool: &PgPool,
    since: NaiveDate,
    until: NaiveDate,
    class_id: Option<Uuid>,
) -> anyhow::Result<Vec<DailyReport>> {
    let mut query = format!(
        "SELECT {REPORT_COLUMNS} FROM school_reports.daily_reports r \
         WHERE r.report_date >= $1 AND r.report_date <= $2"
    );
    if class_id.is_some() {
        query.push_str(" AND r.class_id = $3");
    }
    query.push_str(" ORDER BY r.report_date, r.class_id");

    let mut rows = sqlx::query(&query).bind(since).bind(until);
    if let Some(value) = class_id {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    debug!(count = records.len(), %since, %until, "fetched daily reports");
    records.iter().map(report_from_row).collect()
}

pub async fn fetch_incidents(
    pool: &PgPool,
    since: NaiveDate,
    until: NaiveDate,
) -> anyhow::Result<Vec<Incident>> {
    let rows = sqlx::query(
        "SELECT id, report_id, class_id, incident_date, kind, severity, details \
         FROM school_reports.incidents \
         WHERE incident_date >= $1 AND incident_date <= $2 \
         ORDER BY incident_date DESC",
    )
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> anyhow::Result<Incident> {
            Ok(Incident {
                id: row.get("id"),
                report_id: row.get("report_id"),
                class_id: row.get("class_id"),
                incident_date: row.get("incident_date"),
                kind: row.get::<String, _>("kind").parse()?,
                severity: row.get::<String, _>("severity").parse()?,
                details: row.get("details"),
            })
        })
        .collect()
}

pub async fn add_comment(
    pool: &PgPool,
    report_id: Uuid,
    author_id: Uuid,
    comment: &str,
) -> anyhow::Result<HeadComment> {
    let author = fetch_profile(pool, author_id)
        .await?
        .with_context(|| format!("no profile with id {author_id}"))?;
    if !author.role.can_review() {
        anyhow::bail!("{} is a {} and cannot comment on reports", author.full_name, author.role);
    }
    if comment.trim().is_empty() {
        anyhow::bail!("comment must not be empty");
    }

    let row = sqlx::query(
        r#"
        INSERT INTO school_reports.head_comments (id, report_id, author_id, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(report_id)
    .bind(author_id)
    .bind(comment.trim())
    .fetch_one(pool)
    .await
    .context("failed to save comment")?;

    Ok(HeadComment {
        id: row.get("id"),
        report_id,
        author_id,
        author_name: author.full_name,
        comment: comment.trim().to_string(),
        created_at: row.get("created_at"),
    })
}

pub async fn list_comments(pool: &PgPool, report_id: Uuid) -> anyhow::Result<Vec<HeadComment>> {
    let rows = sqlx::query(
        "SELECT hc.id, hc.report_id, hc.author_id, p.full_name, hc.comment, hc.created_at \
         FROM school_reports.head_comments hc \
         JOIN school_reports.profiles p ON p.id = hc.author_id \
         WHERE hc.report_id = $1 \
         ORDER BY hc.created_at",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| HeadComment {
            id: row.get("id"),
            report_id: row.get("report_id"),
            author_id: row.get("author_id"),
            author_name: row.get("full_name"),
            comment: row.get("comment"),
            created_at: row.get("created_at"),
        })
        .collect())
}

pub async fn fetch_settings(pool: &PgPool) -> anyhow::Result<SchoolSettings> {
    let row = sqlx::query(
        "SELECT academic_year, current_term, term_start, term_end, notify_missing_reports, \
         reminder_time, notification_email, absentee_threshold \
         FROM school_reports.school_settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(row) => SchoolSettings {
            academic_year: row.get("academic_year"),
            current_term: row.get("current_term"),
            term_start: row.get("term_start"),
            term_end: row.get("term_end"),
            notify_missing_reports: row.get("notify_missing_reports"),
            reminder_time: row.get("reminder_time"),
            notification_email: row.get("notification_email"),
            absentee_threshold: row.get("absentee_threshold"),
        },
        None => SchoolSettings::default(),
    })
}

pub async fn update_settings(pool: &PgPool, settings: &SchoolSettings) -> anyhow::Result<()> {
    if let (Some(start), Some(end)) = (settings.term_start, settings.term_end) {
        if start > end {
            anyhow::bail!("term start {start} is after term end {end}");
        }
    }
    if settings.absentee_threshold < 1 {
        anyhow::bail!("absentee threshold must be at least 1");
    }

    sqlx::query(
        r#"
        INSERT INTO school_reports.school_settings
        (id, academic_year, current_term, term_start, term_end, notify_missing_reports,
         reminder_time, notification_email, absentee_threshold)
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            academic_year = EXCLUDED.academic_year,
            current_term = EXCLUDED.current_term,
            term_start = EXCLUDED.term_start,
            term_end = EXCLUDED.term_end,
            notify_missing_reports = EXCLUDED.notify_missing_reports,
            reminder_time = EXCLUDED.reminder_time,
            notification_email = EXCLUDED.notification_email,
            absentee_threshold = EXCLUDED.absentee_threshold
        "#,
    )
    .bind(&settings.academic_year)
    .bind(&settings.current_term)
    .bind(settings.term_start)
    .bind(settings.term_end)
    .bind(settings.notify_missing_reports)
    .bind(&settings.reminder_time)
    .bind(&settings.notification_email)
    .bind(settings.absentee_threshold)
    .execute(pool)
    .await
    .context("failed to save school settings")?;

    info!(year = %settings.academic_year, term = %settings.current_term, "school settings updated");
    Ok(())
}

#[derive(serde::Deserialize)]
struct CsvReportRow {
    report_date: NaiveDate,
    grade: String,
    stream: String,
    teacher_name: String,
    total_learners: i32,
    present_learners: i32,
    #[serde(default)]
    absentees: String,
    health_severity: Option<String>,
    health_details: Option<String>,
    discipline_severity: Option<String>,
    discipline_details: Option<String>,
    feeding_status: Option<String>,
    lessons_covered: String,
    literacy_topic: Option<String>,
    parent_communication_details: Option<String>,
    challenges: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl CsvReportRow {
    fn into_report(self, class_id: Uuid, teacher_id: Uuid) -> anyhow::Result<DailyReport> {
        let health_severity = non_blank(self.health_severity)
            .map(|value| value.parse::<Severity>())
            .transpose()?;
        let discipline_severity = non_blank(self.discipline_severity)
            .map(|value| value.parse::<Severity>())
            .transpose()?;
        let parent_communication_details = non_blank(self.parent_communication_details);

        Ok(DailyReport {
            id: Uuid::new_v4(),
            report_date: self.report_date,
            class_id,
            teacher_id,
            total_learners: self.total_learners,
            present_learners: self.present_learners,
            absentees: self.absentees,
            health_incident: health_severity.is_some(),
            health_severity,
            health_details: non_blank(self.health_details),
            discipline_issue: discipline_severity.is_some(),
            discipline_severity,
            discipline_details: non_blank(self.discipline_details),
            feeding_status: match non_blank(self.feeding_status) {
                Some(value) => value.parse()?,
                None => FeedingStatus::Full,
            },
            lessons_covered: self.lessons_covered,
            literacy_topic: non_blank(self.literacy_topic),
            parent_communication: parent_communication_details.is_some(),
            parent_communication_details,
            challenges: non_blank(self.challenges),
        })
    }
}

/// Loads reports from CSV; rows whose class already reported that day are skipped.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let today = Utc::now().date_naive();
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for (index, result) in reader.deserialize::<CsvReportRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("malformed CSV row at line {line}"))?;

        let class = find_class(&mut tx, &row.grade, &row.stream)
            .await?
            .with_context(|| format!("line {line}: unknown class {} {}", row.grade, row.stream))?;
        let teacher = find_profile_by_name(&mut tx, &row.teacher_name)
            .await?
            .with_context(|| format!("line {line}: unknown teacher {}", row.teacher_name))?;

        let report = row.into_report(class.id, teacher.id)?;
        validation::validate_report(&report, today)
            .with_context(|| format!("line {line}"))?;

        match insert_report(&mut tx, &report).await? {
            Some(_) => inserted += 1,
            None => warn!(
                line,
                class = %class.label(),
                date = %report.report_date,
                "report already exists, skipping"
            ),
        }
    }

    tx.commit().await.context("failed to commit import")?;
    Ok(inserted)
}

const SEED_PROFILES: &[(&str, Role)] = &[
    ("Grace Wambui", Role::Headteacher),
    ("Samuel Ochieng", Role::Director),
    ("Ruth Njeri", Role::Admin),
    ("Peter Kamau", Role::Teacher),
    ("Mercy Achieng", Role::Teacher),
    ("John Mutua", Role::Teacher),
];

/// Grade, stream, class teacher and enrolment.
const SEED_CLASSES: &[(&str, &str, &str, i32)] = &[
    ("Grade 4", "East", "Peter Kamau", 42),
    ("Grade 5", "West", "Mercy Achieng", 38),
    ("Grade 6", "North", "John Mutua", 35),
];

/// Safe to run repeatedly: profiles and classes are matched on their
/// natural keys, so rows created by hand are reused rather than duplicated.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let mut profile_ids: HashMap<&str, Uuid> = HashMap::new();
    for (name, role) in SEED_PROFILES {
        let row = sqlx::query(
            r#"
            INSERT INTO school_reports.profiles (id, full_name, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (full_name) DO UPDATE SET full_name = EXCLUDED.full_name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;
        profile_ids.insert(*name, row.get("id"));
    }

    let mut classes = Vec::new();
    for (grade, stream, teacher, enrolled) in SEED_CLASSES {
        let teacher_id = *profile_ids
            .get(teacher)
            .with_context(|| format!("seed teacher {teacher} missing"))?;
        let row = sqlx::query(
            r#"
            INSERT INTO school_reports.classes (id, grade, stream, active)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (grade, stream) DO UPDATE SET grade = EXCLUDED.grade
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*grade)
        .bind(*stream)
        .fetch_one(pool)
        .await?;
        let class_id: Uuid = row.get("id");

        sqlx::query(
            r#"
            INSERT INTO school_reports.teacher_classes (teacher_id, class_id, active)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (teacher_id, class_id) DO NOTHING
            "#,
        )
        .bind(teacher_id)
        .bind(class_id)
        .execute(pool)
        .await?;

        classes.push((class_id, teacher_id, *enrolled));
    }

    let today = Utc::now().date_naive();
    let term_start = today - Duration::days(28);
    update_settings(
        pool,
        &SchoolSettings {
            academic_year: today.format("%Y").to_string(),
            current_term: "Term 1".to_string(),
            term_start: Some(term_start),
            term_end: Some(today + Duration::days(56)),
            notify_missing_reports: true,
            reminder_time: Some("15:30".to_string()),
            notification_email: Some("office@example.school".to_string()),
            absentee_threshold: 3,
        },
    )
    .await?;

    let absentee_rotation = [
        "Amina Otieno, Brian Kip",
        "amina otieno",
        "None",
        "Brian Kip and Cynthia Wanjiru",
        "1. Amina Otieno\n2. David Mwangi",
    ];

    let days = compliance::school_days(today - Duration::days(14), today);
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for (class_index, (class_id, teacher_id, enrolled)) in classes.iter().enumerate() {
        for (day_index, date) in days.iter().enumerate() {
            // Grade 6 North skips every third day so compliance has something to show.
            if class_index == 2 && day_index % 3 == 0 {
                continue;
            }

            let rotation = (day_index + class_index) % absentee_rotation.len();
            let absentees = absentee_rotation[rotation];
            let absent = crate::absentees::parse_absentees(absentees).len() as i32;
            let critical_day = class_index == 0 && day_index == 3;
            let report = DailyReport {
                id: Uuid::new_v4(),
                report_date: *date,
                class_id: *class_id,
                teacher_id: *teacher_id,
                total_learners: *enrolled,
                present_learners: enrolled - absent,
                absentees: absentees.to_string(),
                health_incident: critical_day,
                health_severity: critical_day.then_some(Severity::High),
                health_details: critical_day
                    .then(|| "Learner fainted during assembly".to_string()),
                discipline_issue: day_index == 5,
                discipline_severity: (day_index == 5).then_some(Severity::Medium),
                discipline_details: (day_index == 5)
                    .then(|| "Argument over seating".to_string()),
                feeding_status: if day_index % 4 == 0 {
                    FeedingStatus::Partial
                } else {
                    FeedingStatus::Full
                },
                lessons_covered: "Mathematics, English, Science".to_string(),
                literacy_topic: Some("Reading comprehension".to_string()),
                parent_communication: day_index == 2,
                parent_communication_details: (day_index == 2)
                    .then(|| "Called guardian about absences".to_string()),
                challenges: (day_index % 5 == 1)
                    .then(|| "Shortage of exercise books".to_string()),
            };

            if insert_report(&mut tx, &report).await?.is_some() {
                inserted += 1;
            }
        }
    }

    tx.commit().await?;
    info!(reports = inserted, "seed data inserted");
    Ok(())
}
