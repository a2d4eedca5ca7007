use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

mod absentees;
mod attendance;
mod cache;
mod compliance;
mod config;
mod db;
mod export;
mod incidents;
mod models;
mod report;
mod validation;

use cache::ResultCache;
use config::Config;
use models::{Class, DailyReport, FeedingStatus, Role, SchoolSettings, Severity};

#[derive(Parser)]
#[command(name = "school-daily-reports")]
#[command(
    about = "Daily class reports, compliance and attendance analytics for a school",
    long_about = None
)]
struct Cli {
    /// Always query the store instead of the local result cache
    #[arg(long, global = true)]
    no_cache: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct Window {
    #[arg(long, default_value_t = 30)]
    since_days: i64,
    /// First day of the window (YYYY-MM-DD); overrides --since-days
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl Window {
    fn resolve(&self, today: NaiveDate) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        let end = self.to.unwrap_or(today);
        let start = match self.from {
            Some(from) => from,
            None => Duration::try_days(self.since_days.max(1))
                .and_then(|span| end.checked_sub_signed(span))
                .with_context(|| {
                    format!("--since-days {} reaches before the calendar", self.since_days)
                })?,
        };
        if start > end {
            anyhow::bail!("window start {start} is after window end {end}");
        }
        Ok((start, end))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Manage staff profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage classes and teacher assignments
    #[command(subcommand)]
    Class(ClassCommand),
    /// Submit a daily class report
    Submit(SubmitArgs),
    /// Delete a daily report and its incidents
    DeleteReport {
        #[arg(long)]
        id: Uuid,
    },
    /// Import daily reports from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Review comments on reports
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Show or change school settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Submitted versus expected reports per class
    Compliance {
        #[command(flatten)]
        window: Window,
    },
    /// Learners named absent most often
    Absentees {
        #[command(flatten)]
        window: Window,
        /// Minimum days absent; defaults to the school setting
        #[arg(long)]
        threshold: Option<usize>,
        #[arg(long)]
        class: Option<Uuid>,
    },
    /// Attendance rollups
    Attendance {
        #[command(flatten)]
        window: Window,
        #[arg(long, value_enum, default_value_t = Period::Weekly)]
        by: Period,
        /// Combine classes into whole-school figures
        #[arg(long)]
        school: bool,
    },
    /// High and critical incidents
    Incidents {
        #[command(flatten)]
        window: Window,
    },
    /// Generate a markdown summary report
    Report {
        #[command(flatten)]
        window: Window,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export computed figures as CSV
    Export {
        #[command(flatten)]
        window: Window,
        #[arg(long, value_enum)]
        kind: ExportKind,
        #[arg(long)]
        out: PathBuf,
    },
    /// Remove cached query results
    CacheClear,
}

#[derive(Subcommand)]
enum ProfileCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Role,
    },
    List {
        #[arg(long)]
        role: Option<Role>,
    },
}

#[derive(Subcommand)]
enum ClassCommand {
    Add {
        #[arg(long)]
        grade: String,
        #[arg(long)]
        stream: String,
    },
    List {
        /// Include inactive classes
        #[arg(long)]
        all: bool,
    },
    Activate {
        #[arg(long)]
        id: Uuid,
    },
    Deactivate {
        #[arg(long)]
        id: Uuid,
    },
    /// Give a teacher a new active class
    Assign {
        #[arg(long)]
        teacher: Uuid,
        #[arg(long)]
        class: Uuid,
    },
    Assignments,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    class: Uuid,
    #[arg(long)]
    teacher: Uuid,
    /// Defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    total: i32,
    #[arg(long)]
    present: i32,
    #[arg(long, default_value = "")]
    absentees: String,
    #[arg(long)]
    health_severity: Option<Severity>,
    #[arg(long)]
    health_details: Option<String>,
    #[arg(long)]
    discipline_severity: Option<Severity>,
    #[arg(long)]
    discipline_details: Option<String>,
    #[arg(long, default_value = "full")]
    feeding: FeedingStatus,
    #[arg(long)]
    lessons: String,
    #[arg(long)]
    literacy_topic: Option<String>,
    #[arg(long)]
    parent_details: Option<String>,
    #[arg(long)]
    challenges: Option<String>,
}

impl SubmitArgs {
    fn into_report(self, today: NaiveDate) -> DailyReport {
        DailyReport {
            id: Uuid::new_v4(),
            report_date: self.date.unwrap_or(today),
            class_id: self.class,
            teacher_id: self.teacher,
            total_learners: self.total,
            present_learners: self.present,
            absentees: self.absentees,
            health_incident: self.health_severity.is_some(),
            health_severity: self.health_severity,
            health_details: self.health_details,
            discipline_issue: self.discipline_severity.is_some(),
            discipline_severity: self.discipline_severity,
            discipline_details: self.discipline_details,
            feeding_status: self.feeding,
            lessons_covered: self.lessons,
            literacy_topic: self.literacy_topic,
            parent_communication: self.parent_details.is_some(),
            parent_communication_details: self.parent_details,
            challenges: self.challenges,
        }
    }
}

#[derive(Subcommand)]
enum CommentCommand {
    Add {
        #[arg(long)]
        report: Uuid,
        #[arg(long)]
        author: Uuid,
        #[arg(long)]
        text: String,
    },
    List {
        #[arg(long)]
        report: Uuid,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// Update only the fields given
    Set {
        #[arg(long)]
        academic_year: Option<String>,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        term_start: Option<NaiveDate>,
        #[arg(long)]
        term_end: Option<NaiveDate>,
        #[arg(long)]
        notify_missing_reports: Option<bool>,
        #[arg(long)]
        reminder_time: Option<String>,
        #[arg(long)]
        notification_email: Option<String>,
        #[arg(long)]
        absentee_threshold: Option<i32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Period {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Compliance,
    Absentees,
    Weekly,
    Monthly,
    Reports,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn reports_key(start: NaiveDate, end: NaiveDate, class: Option<Uuid>) -> String {
    match class {
        Some(id) => format!("reports-{start}-{end}-{id}"),
        None => format!("reports-{start}-{end}-all"),
    }
}

/// Reports for a window, read through the local cache when one is given.
async fn load_reports(
    pool: &PgPool,
    cache: Option<&ResultCache>,
    start: NaiveDate,
    end: NaiveDate,
    class: Option<Uuid>,
) -> anyhow::Result<Vec<DailyReport>> {
    let key = reports_key(start, end, class);
    cache::read_through(cache, &key, || db::fetch_reports(pool, start, end, class)).await
}

fn invalidate(cache: &ResultCache) -> anyhow::Result<()> {
    let removed = cache.clear()?;
    debug!(removed, "result cache invalidated");
    Ok(())
}

fn class_labels(classes: &[Class]) -> HashMap<Uuid, String> {
    classes.iter().map(|c| (c.id, c.label())).collect()
}

fn print_settings(settings: &SchoolSettings) {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let optional_date = |value: Option<NaiveDate>| {
        value
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Academic year:          {}", settings.academic_year);
    println!("Current term:           {}", settings.current_term);
    println!("Term start:             {}", optional_date(settings.term_start));
    println!("Term end:               {}", optional_date(settings.term_end));
    println!("Notify missing reports: {}", settings.notify_missing_reports);
    println!("Reminder time:          {}", optional(&settings.reminder_time));
    println!("Notification email:     {}", optional(&settings.notification_email));
    println!("Absentee threshold:     {}", settings.absentee_threshold);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let result_cache = ResultCache::new(config.cache_dir.clone(), config.cache_ttl);
    if let Commands::CacheClear = cli.command {
        let removed = result_cache.clear()?;
        println!(
            "Removed {removed} cached results from {}.",
            result_cache.dir().display()
        );
        return Ok(());
    }
    let cache = (!cli.no_cache).then_some(&result_cache);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url()?)
        .await
        .context("failed to connect to Postgres")?;
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            invalidate(&result_cache)?;
            println!("Seed data inserted.");
        }
        Commands::Profile(ProfileCommand::Add { name, role }) => {
            let profile = db::create_profile(&pool, &name, role).await?;
            println!("Saved {} ({}) as {}.", profile.full_name, profile.role, profile.id);
        }
        Commands::Profile(ProfileCommand::List { role }) => {
            let profiles = db::list_profiles(&pool, role).await?;
            if profiles.is_empty() {
                println!("No profiles found.");
            }
            for profile in profiles {
                println!("- {} {} ({})", profile.id, profile.full_name, profile.role);
            }
        }
        Commands::Class(ClassCommand::Add { grade, stream }) => {
            let class = db::create_class(&pool, &grade, &stream).await?;
            println!("Saved class {} as {}.", class.label(), class.id);
        }
        Commands::Class(ClassCommand::List { all }) => {
            let classes = db::list_classes(&pool, !all).await?;
            if classes.is_empty() {
                println!("No classes found.");
            }
            for class in classes {
                let status = if class.active { "" } else { " (inactive)" };
                println!("- {} {}{}", class.id, class.label(), status);
            }
        }
        Commands::Class(ClassCommand::Activate { id }) => {
            if db::set_class_active(&pool, id, true).await? {
                invalidate(&result_cache)?;
                println!("Class {id} activated.");
            } else {
                anyhow::bail!("no class with id {id}");
            }
        }
        Commands::Class(ClassCommand::Deactivate { id }) => {
            if db::set_class_active(&pool, id, false).await? {
                invalidate(&result_cache)?;
                println!("Class {id} deactivated.");
            } else {
                anyhow::bail!("no class with id {id}");
            }
        }
        Commands::Class(ClassCommand::Assign { teacher, class }) => {
            db::assign_teacher(&pool, teacher, class).await?;
            println!("Teacher {teacher} now reports for class {class}.");
        }
        Commands::Class(ClassCommand::Assignments) => {
            let assignments = db::list_assignments(&pool).await?;
            if assignments.is_empty() {
                println!("No active assignments.");
            }
            for assignment in assignments {
                println!(
                    "- {} ({}): {} ({})",
                    assignment.class_label,
                    assignment.class_id,
                    assignment.teacher_name,
                    assignment.teacher_id
                );
            }
        }
        Commands::Submit(args) => {
            let report = args.into_report(today);
            let incidents = db::submit_report(&pool, &report).await?;
            invalidate(&result_cache)?;
            println!("Report {} saved for {}.", report.id, report.report_date);
            for incident in incidents {
                println!(
                    "Flagged {} {} incident: {}",
                    incident.severity, incident.kind, incident.details
                );
            }
        }
        Commands::DeleteReport { id } => {
            if db::delete_report(&pool, id).await? {
                invalidate(&result_cache)?;
                println!("Report {id} deleted.");
            } else {
                anyhow::bail!("no report with id {id}");
            }
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            invalidate(&result_cache)?;
            println!("Inserted {inserted} reports from {}.", csv.display());
        }
        Commands::Comment(CommentCommand::Add { report, author, text }) => {
            let comment = db::add_comment(&pool, report, author, &text).await?;
            println!("Comment {} added by {}.", comment.id, comment.author_name);
        }
        Commands::Comment(CommentCommand::List { report }) => {
            let daily = db::fetch_report(&pool, report)
                .await?
                .with_context(|| format!("no report with id {report}"))?;
            let comments = db::list_comments(&pool, report).await?;
            println!(
                "Report {} ({}: {} of {} present)",
                daily.id, daily.report_date, daily.present_learners, daily.total_learners
            );
            if comments.is_empty() {
                println!("No comments yet.");
            }
            for comment in comments {
                println!(
                    "- {} {}: {}",
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    comment.author_name,
                    comment.comment
                );
            }
        }
        Commands::Settings(SettingsCommand::Show) => {
            print_settings(&db::fetch_settings(&pool).await?);
        }
        Commands::Settings(SettingsCommand::Set {
            academic_year,
            term,
            term_start,
            term_end,
            notify_missing_reports,
            reminder_time,
            notification_email,
            absentee_threshold,
        }) => {
            let mut settings = db::fetch_settings(&pool).await?;
            if let Some(value) = academic_year {
                settings.academic_year = value;
            }
            if let Some(value) = term {
                settings.current_term = value;
            }
            if term_start.is_some() {
                settings.term_start = term_start;
            }
            if term_end.is_some() {
                settings.term_end = term_end;
            }
            if let Some(value) = notify_missing_reports {
                settings.notify_missing_reports = value;
            }
            if reminder_time.is_some() {
                settings.reminder_time = reminder_time;
            }
            if notification_email.is_some() {
                settings.notification_email = notification_email;
            }
            if let Some(value) = absentee_threshold {
                settings.absentee_threshold = value;
            }
            db::update_settings(&pool, &settings).await?;
            invalidate(&result_cache)?;
            print_settings(&settings);
        }
        Commands::Compliance { window } => {
            let (start, end) = window.resolve(today)?;
            let settings = db::fetch_settings(&pool).await?;
            let (start, end) = compliance::effective_window(start, end, today, Some(&settings));
            let classes = db::list_classes(&pool, true).await?;
            let reports = load_reports(&pool, cache, start, end, None).await?;
            let summary = compliance::calculate_compliance(&classes, &reports, start, end);
            info!(start = %start, end = %end, rate = summary.rate, "compliance computed");

            println!(
                "Compliance {} to {}: {} of {} reports ({:.1}%) over {} school days",
                summary.start,
                summary.end,
                summary.submitted,
                summary.expected,
                summary.rate,
                summary.school_days
            );
            for class in &summary.classes {
                println!(
                    "- {}: {}/{} ({:.1}%), {} missing",
                    class.class_label,
                    class.submitted,
                    class.expected,
                    class.rate,
                    class.missing_dates.len()
                );
            }
        }
        Commands::Absentees {
            window,
            threshold,
            class,
        } => {
            let (start, end) = window.resolve(today)?;
            let threshold = match threshold {
                Some(value) => value,
                None => db::fetch_settings(&pool).await?.absentee_threshold.max(1) as usize,
            };
            let classes = db::list_classes(&pool, false).await?;
            let reports = load_reports(&pool, cache, start, end, class).await?;
            let tallies = absentees::tally_absentees(&reports, &classes);
            let chronic = absentees::chronic_absentees(&tallies, threshold);

            if chronic.is_empty() {
                println!(
                    "No learners absent {threshold} or more days between {start} and {end}."
                );
                return Ok(());
            }
            println!("Learners absent {threshold} or more days between {start} and {end}:");
            for tally in chronic {
                println!(
                    "- {} ({}) absent {} of {} days ({:.1}%), last {}",
                    tally.learner_name,
                    tally.class_label,
                    tally.days_absent,
                    tally.days_reported,
                    tally.absence_rate,
                    tally.last_absent
                );
            }
        }
        Commands::Attendance { window, by, school } => {
            let (start, end) = window.resolve(today)?;
            let classes = db::list_classes(&pool, false).await?;
            let reports = load_reports(&pool, cache, start, end, None).await?;
            let buckets = match by {
                Period::Daily => attendance::school_totals(&reports),
                Period::Weekly => attendance::weekly_rollup(&reports, &classes),
                Period::Monthly => attendance::monthly_rollup(&reports, &classes),
            };
            let buckets = if school {
                attendance::merge_classes(&buckets)
            } else {
                buckets
            };

            if buckets.is_empty() {
                println!("No reports found for this window.");
                return Ok(());
            }
            for bucket in buckets {
                println!(
                    "- {} {}: {:.1}% present ({}/{}) over {} reports",
                    bucket.period,
                    bucket.class_label,
                    bucket.attendance_rate,
                    bucket.present_learners,
                    bucket.total_learners,
                    bucket.report_count
                );
            }
        }
        Commands::Incidents { window } => {
            let (start, end) = window.resolve(today)?;
            let classes = db::list_classes(&pool, false).await?;
            let labels = class_labels(&classes);
            let found = db::fetch_incidents(&pool, start, end).await?;

            if found.is_empty() {
                println!("No high or critical incidents between {start} and {end}.");
                return Ok(());
            }
            for summary in incidents::summarize_incidents(&found) {
                println!("{} {}: {}", summary.severity, summary.kind, summary.count);
            }
            for incident in &found {
                println!(
                    "- {} {} {} {}: {}",
                    incident.incident_date,
                    labels
                        .get(&incident.class_id)
                        .map(String::as_str)
                        .unwrap_or("unknown class"),
                    incident.severity,
                    incident.kind,
                    incident.details
                );
            }
        }
        Commands::Report { window, out } => {
            let (start, end) = window.resolve(today)?;
            let settings = db::fetch_settings(&pool).await?;
            let (start, end) = compliance::effective_window(start, end, today, Some(&settings));
            // all classes: deactivated ones still label their reports
            let classes = db::list_classes(&pool, false).await?;
            let reports = load_reports(&pool, cache, start, end, None).await?;
            let found = db::fetch_incidents(&pool, start, end).await?;
            let term_label = format!("{} {}", settings.current_term, settings.academic_year);
            let term_label = term_label.trim();

            let report = report::build_report(&report::ReportInput {
                start,
                end,
                term_label: (!term_label.is_empty()).then_some(term_label),
                classes: &classes,
                reports: &reports,
                incidents: &found,
                absentee_threshold: settings.absentee_threshold.max(1) as usize,
            });
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { window, kind, out } => {
            let (start, end) = window.resolve(today)?;
            let classes = db::list_classes(&pool, false).await?;
            let reports = load_reports(&pool, cache, start, end, None).await?;
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;

            match kind {
                ExportKind::Compliance => {
                    let settings = db::fetch_settings(&pool).await?;
                    let (start, end) =
                        compliance::effective_window(start, end, today, Some(&settings));
                    let summary =
                        compliance::calculate_compliance(&classes, &reports, start, end);
                    export::write_compliance(file, &summary)?;
                }
                ExportKind::Absentees => {
                    let tallies = absentees::tally_absentees(&reports, &classes);
                    export::write_absentees(file, &tallies)?;
                }
                ExportKind::Weekly => {
                    let buckets = attendance::weekly_rollup(&reports, &classes);
                    export::write_attendance(file, &buckets)?;
                }
                ExportKind::Monthly => {
                    let buckets = attendance::monthly_rollup(&reports, &classes);
                    export::write_attendance(file, &buckets)?;
                }
                ExportKind::Reports => {
                    let labels = class_labels(&classes);
                    export::write_reports(file, &reports, |report| {
                        labels
                            .get(&report.class_id)
                            .cloned()
                            .unwrap_or_else(|| report.class_id.to_string())
                    })?;
                }
            }
            println!("Exported to {}.", out.display());
        }
        Commands::CacheClear => unreachable!("handled before connecting"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn window_defaults_to_since_days_before_today() {
        let window = Window {
            since_days: 14,
            from: None,
            to: None,
        };
        assert_eq!(window.resolve(date(20)).unwrap(), (date(6), date(20)));
    }

    #[test]
    fn window_never_collapses_below_one_day() {
        let window = Window {
            since_days: 0,
            from: None,
            to: None,
        };
        assert_eq!(window.resolve(date(20)).unwrap(), (date(19), date(20)));
    }

    #[test]
    fn window_rejects_since_days_beyond_the_calendar() {
        let window = Window {
            since_days: 1_000_000_000_000,
            from: None,
            to: None,
        };
        let err = window.resolve(date(20)).unwrap_err();
        assert!(err.to_string().contains("--since-days"));

        let window = Window {
            since_days: i64::MAX,
            from: None,
            to: None,
        };
        assert!(window.resolve(date(20)).is_err());
    }

    #[test]
    fn explicit_bounds_override_since_days() {
        let window = Window {
            since_days: 30,
            from: Some(date(2)),
            to: Some(date(13)),
        };
        assert_eq!(window.resolve(date(20)).unwrap(), (date(2), date(13)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let window = Window {
            since_days: 30,
            from: Some(date(14)),
            to: Some(date(13)),
        };
        assert!(window.resolve(date(20)).is_err());
    }

    #[test]
    fn report_keys_separate_class_filters() {
        let class = Uuid::new_v4();
        let all = reports_key(date(2), date(13), None);
        let one = reports_key(date(2), date(13), Some(class));
        assert_ne!(all, one);
        assert!(one.ends_with(&class.to_string()));
    }

    #[tokio::test]
    async fn write_commands_force_a_refetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path(), std::time::Duration::from_secs(300));
        let calls = std::cell::Cell::new(0);
        let fetch = || {
            let call = calls.get() + 1;
            calls.set(call);
            async move { Ok::<_, anyhow::Error>(vec![call]) }
        };
        let key = reports_key(date(2), date(13), None);
        let store = Some(&cache);

        let first = cache::read_through(store, &key, fetch).await.unwrap();
        let cached = cache::read_through(store, &key, fetch).await.unwrap();
        assert_eq!(first, cached);
        assert_eq!(calls.get(), 1);

        invalidate(&cache).unwrap();
        let fresh = cache::read_through(store, &key, fetch).await.unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(fresh, vec![2]);
    }

    #[test]
    fn submit_args_flag_incidents_from_severity() {
        let cli = Cli::try_parse_from([
            "school-daily-reports",
            "submit",
            "--class",
            "9c4f1d2e-1b7a-4a6e-8f0c-2d3e4f5a6b01",
            "--teacher",
            "5b0e3a43-7a51-4a58-9a1d-1f6f1b1f0a04",
            "--date",
            "2026-03-02",
            "--total",
            "42",
            "--present",
            "40",
            "--health-severity",
            "critical",
            "--health-details",
            "Allergic reaction",
            "--lessons",
            "Maths",
        ])
        .unwrap();
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        let report = args.into_report(date(20));
        assert!(report.health_incident);
        assert_eq!(report.health_severity, Some(Severity::Critical));
        assert!(!report.discipline_issue);
        assert_eq!(report.feeding_status, FeedingStatus::Full);
        assert_eq!(report.report_date, date(2));
        assert_eq!(incidents::derive_incidents(&report).len(), 1);
    }
}
