use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    database_url: Option<String>,
    pub max_connections: u32,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|value| !value.trim().is_empty());

        let max_connections = parse_or(&lookup, "SCHOOL_REPORTS_MAX_CONNECTIONS", 5u32)?;
        let ttl_secs = parse_or(&lookup, "SCHOOL_REPORTS_CACHE_TTL_SECS", 300u64)?;
        let cache_dir = lookup("SCHOOL_REPORTS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("school-daily-reports"));
        let log_json = lookup("SCHOOL_REPORTS_LOG_JSON")
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes"
                )
            })
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections: max_connections.max(1),
            cache_dir,
            cache_ttl: Duration::from_secs(ttl_secs),
            log_json,
        })
    }

    /// Only commands that talk to the store need this.
    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must point at the school's hosted Postgres instance")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
