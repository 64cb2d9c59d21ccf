use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use scrapedesk_core::jobs::kind::JobKind;
use scrapedesk_core::jobs::launcher::{LaunchPlan, Runtime};

/// A configuration variable that is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// Timeout in seconds for producing response headers (default: `30`).
    /// Streaming bodies are not cut off by it.
    pub request_timeout_secs: u64,
    pub jobs: JobConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// Job settings are read by [`JobConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_string("HOST", "0.0.0.0");
        let port = env_parse("PORT", 3000u16)?;

        let cors_origins = env_string("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| ConfigError {
                    var: "CORS_ORIGINS",
                    value: origin.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jobs: JobConfig::from_env()?,
        })
    }
}

/// Where job scripts live and how they are run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Working directory of every job; script paths are relative to it.
    pub script_dir: PathBuf,
    /// Python script run with the category id as its only argument.
    pub recategorize_script: PathBuf,
    /// Executable script run with no arguments.
    pub scrape_script: PathBuf,
    /// Executable script that detaches the summarizer, no arguments.
    pub summarize_script: PathBuf,
    /// Project-local interpreter, relative to `script_dir`.
    pub python_local_runtime: PathBuf,
    /// Interpreter used when the local one is missing.
    pub python_bin: String,
    /// How long to keep reading pipes after the process exits.
    pub drain_grace: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            script_dir: PathBuf::from("."),
            recategorize_script: PathBuf::from("recategorize_articles.py"),
            scrape_script: PathBuf::from("run_scrape.sh"),
            summarize_script: PathBuf::from("start_summarizer.sh"),
            python_local_runtime: PathBuf::from("venv/bin/python3"),
            python_bin: "python3".to_string(),
            drain_grace: Duration::from_millis(2000),
        }
    }
}

impl JobConfig {
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `SCRIPT_DIR`           | `.`                        |
    /// | `RECATEGORIZE_SCRIPT`  | `recategorize_articles.py` |
    /// | `SCRAPE_SCRIPT`        | `run_scrape.sh`            |
    /// | `SUMMARIZE_SCRIPT`     | `start_summarizer.sh`      |
    /// | `PYTHON_LOCAL_RUNTIME` | `venv/bin/python3`         |
    /// | `PYTHON_BIN`           | `python3`                  |
    /// | `JOB_DRAIN_GRACE_MS`   | `2000`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            script_dir: env_path("SCRIPT_DIR", defaults.script_dir),
            recategorize_script: env_path("RECATEGORIZE_SCRIPT", defaults.recategorize_script),
            scrape_script: env_path("SCRAPE_SCRIPT", defaults.scrape_script),
            summarize_script: env_path("SUMMARIZE_SCRIPT", defaults.summarize_script),
            python_local_runtime: env_path("PYTHON_LOCAL_RUNTIME", defaults.python_local_runtime),
            python_bin: env_string("PYTHON_BIN", &defaults.python_bin),
            drain_grace: Duration::from_millis(env_parse(
                "JOB_DRAIN_GRACE_MS",
                defaults.drain_grace.as_millis() as u64,
            )?),
        })
    }

    /// The launch plan for a validated job.
    pub fn plan(&self, kind: &JobKind) -> LaunchPlan {
        match kind {
            JobKind::Recategorize { .. } => LaunchPlan {
                script_dir: self.script_dir.clone(),
                script: self.recategorize_script.clone(),
                runtime: Runtime::Interpreter {
                    local: self.python_local_runtime.clone(),
                    system: self.python_bin.clone(),
                },
                args: kind.args(),
            },
            JobKind::Scrape => self.direct(&self.scrape_script, kind),
            JobKind::Summarize => self.direct(&self.summarize_script, kind),
        }
    }

    fn direct(&self, script: &Path, kind: &JobKind) -> LaunchPlan {
        LaunchPlan {
            script_dir: self.script_dir.clone(),
            script: script.to_path_buf(),
            runtime: Runtime::Direct,
            args: kind.args(),
        }
    }
}

fn env_string(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_path(var: &str, default: PathBuf) -> PathBuf {
    std::env::var_os(var).map(PathBuf::from).unwrap_or(default)
}

fn env_parse<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            value: raw,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
