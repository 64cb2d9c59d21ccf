//! The jobs this service knows how to run, and the messages each one emits.

use std::fmt;

use crate::types::DbId;

/// A runnable job and the data it was validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Re-run article classification for one level-1 category.
    Recategorize { category_id: DbId, category_name: String },
    /// Run the scraper over all active sources.
    Scrape,
    /// Kick off article summarization. The script detaches the summarizer
    /// and returns.
    Summarize,
}

impl JobKind {
    /// Short identifier used in logs and config lookups.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Recategorize { .. } => "recategorize",
            Self::Scrape => "scrape",
            Self::Summarize => "summarize",
        }
    }

    /// Positional arguments handed to the script.
    ///
    /// Only validated numeric ids ever reach the argument vector.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Recategorize { category_id, .. } => vec![category_id.to_string()],
            Self::Scrape | Self::Summarize => Vec::new(),
        }
    }

    pub fn start_message(&self) -> String {
        match self {
            Self::Recategorize { category_name, .. } => {
                format!("Starting recategorization for \"{category_name}\"...")
            }
            Self::Scrape => "Starting scraper...".to_string(),
            Self::Summarize => "Starting summarizer...".to_string(),
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            Self::Recategorize { category_name, .. } => {
                format!("Recategorization complete for \"{category_name}\".")
            }
            Self::Scrape => "Scraping completed successfully!".to_string(),
            Self::Summarize => "Summarizer started in background".to_string(),
        }
    }

    pub fn failure_message(&self, detail: &str) -> String {
        match self {
            Self::Recategorize { .. } => format!("Recategorization failed: {detail}"),
            Self::Scrape => format!("Scraping failed: {detail}"),
            Self::Summarize => format!("Summarizer failed: {detail}"),
        }
    }

    /// Message for a configured script that does not exist on disk.
    pub fn missing_script_message(&self, script_file: &str) -> String {
        match self {
            Self::Recategorize { .. } => format!(
                "Recategorization script not found. Please ensure {script_file} exists."
            ),
            Self::Scrape => format!("Scrape script not found. Please ensure {script_file} exists."),
            Self::Summarize => format!(
                "Summarizer script not found. Please ensure {script_file} exists."
            ),
        }
    }

    /// Message for a fork/exec failure; the OS error is logged, not sent.
    pub fn spawn_failure_message(&self) -> String {
        match self {
            Self::Recategorize { .. } => "Failed to start recategorization process".to_string(),
            Self::Scrape => "Failed to start scraper".to_string(),
            Self::Summarize => "Failed to start summarizer".to_string(),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recategorize { category_id, .. } => write!(f, "recategorize({category_id})"),
            Self::Scrape | Self::Summarize => f.write_str(self.name()),
        }
    }
}
