//! Runtime configuration utilities for kegg-harvest.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

use crate::http::{rate_limit::RateLimiter, retry::RetryPolicy};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the KEGG REST API.
    pub kegg_base_url: String,
    /// Base URL of PubChem PUG-REST.
    pub pubchem_base_url: String,
    /// SQLite database holding the gene explorer tables.
    pub db_path: PathBuf,
    /// Folder for CSV exports.
    pub data_dir: PathBuf,
    /// Folder for cached molfiles.
    pub mol_dir: PathBuf,
    /// Folder for generated SQL scripts.
    pub output_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Attempts per URL before giving up.
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    pub retry_jitter_ms: u64,
    /// KEGG calls allowed per window; zero disables limiting.
    pub kegg_rate_calls: usize,
    pub kegg_rate_period_secs: u64,
    /// PubChem calls allowed per window; zero disables limiting.
    pub pubchem_rate_calls: usize,
    pub pubchem_rate_period_secs: u64,
    /// Pause between consecutive items handled by one worker.
    pub item_pause_ms: u64,
    /// Optional plain-text log file mirrored next to stdout.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kegg_base_url: "https://rest.kegg.jp".to_string(),
            pubchem_base_url: "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_string(),
            db_path: PathBuf::from("./GeneExplorer.db"),
            data_dir: PathBuf::from("./data_files"),
            mol_dir: PathBuf::from("./mol_files"),
            output_dir: PathBuf::from("./kegg_data"),
            http_timeout_secs: 30,
            max_retries: 20,
            retry_base_ms: 1_000,
            retry_max_ms: 60_000,
            retry_jitter_ms: 1_000,
            kegg_rate_calls: 50,
            kegg_rate_period_secs: 60,
            pubchem_rate_calls: 5,
            pubchem_rate_period_secs: 1,
            item_pause_ms: 500,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let settings = Self {
            kegg_base_url: env::var("KEGG_BASE_URL").unwrap_or(defaults.kegg_base_url),
            pubchem_base_url: env::var("PUBCHEM_BASE_URL").unwrap_or(defaults.pubchem_base_url),
            db_path: env::var("KEGG_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            mol_dir: env::var("MOL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.mol_dir),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            max_retries: parsed("MAX_RETRIES", defaults.max_retries),
            retry_base_ms: parsed("RETRY_BASE_MS", defaults.retry_base_ms),
            retry_max_ms: parsed("RETRY_MAX_MS", defaults.retry_max_ms),
            retry_jitter_ms: parsed("RETRY_JITTER_MS", defaults.retry_jitter_ms),
            kegg_rate_calls: parsed("KEGG_RATE_CALLS", defaults.kegg_rate_calls),
            kegg_rate_period_secs: parsed("KEGG_RATE_PERIOD_SECS", defaults.kegg_rate_period_secs),
            pubchem_rate_calls: parsed("PUBCHEM_RATE_CALLS", defaults.pubchem_rate_calls),
            pubchem_rate_period_secs: parsed(
                "PUBCHEM_RATE_PERIOD_SECS",
                defaults.pubchem_rate_period_secs,
            ),
            item_pause_ms: parsed("ITEM_PAUSE_MS", defaults.item_pause_ms),
            log_file: env::var("KEGG_LOG_FILE").ok().map(PathBuf::from),
        };

        settings.ensure_dirs()?;
        Ok(settings)
    }

    /// Create the data, cache, and output folders if missing.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&self.mol_dir).context("creating mol dir")?;
        std::fs::create_dir_all(&self.output_dir).context("creating output dir")?;
        Ok(())
    }

    /// Retry policy shared by every HTTP fetcher.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            base_delay: Duration::from_millis(self.retry_base_ms),
            max_delay: Duration::from_millis(self.retry_max_ms),
            jitter: Duration::from_millis(self.retry_jitter_ms),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn item_pause(&self) -> Duration {
        Duration::from_millis(self.item_pause_ms)
    }

    /// Sliding-window limiter for KEGG, if enabled.
    pub fn kegg_limiter(&self) -> Option<RateLimiter> {
        limiter(self.kegg_rate_calls, self.kegg_rate_period_secs)
    }

    /// Sliding-window limiter for PubChem, if enabled.
    pub fn pubchem_limiter(&self) -> Option<RateLimiter> {
        limiter(self.pubchem_rate_calls, self.pubchem_rate_period_secs)
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.output_dir.join(path)
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn limiter(calls: usize, period_secs: u64) -> Option<RateLimiter> {
    (calls > 0 && period_secs > 0)
        .then(|| RateLimiter::new(calls, Duration::from_secs(period_secs)))
}
