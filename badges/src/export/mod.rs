pub mod png;

use std::path::{Path, PathBuf};
use tokio::fs::create_dir_all;
use anyhow::{anyhow, Result};
use tracing::debug;

use crate::error::BadgeError;


#[derive(Debug, Default)]
pub struct BadgeStats {
    pub total: usize,
    pub succeeded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

impl BadgeStats {
    pub fn new(total: usize) -> Self {
        Self { total, ..Default::default() }
    }
    pub fn push(&mut self, response: Result<String, BadgeError>) {
        match response {
            Ok(s) => self.succeeded.push(s),
            Err(e) => self.failed.push(e.to_string()),
        }
    }
    pub fn skip(&mut self, reason: String) {
        self.skipped.push(reason);
    }
    pub fn processed(&self) -> usize {
        self.succeeded.len()
    }
    /// Human readable `processed/total` tally.
    pub fn tally(&self) -> String {
        format!("{}/{}", self.processed(), self.total)
    }
}

/// Create the output dir, failing here means nothing can be written at all.
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    create_dir_all(dir).await.map_err(|e|
        anyhow!("Failed to create output dir for circular badges {}: {}", dir.display(), e)
    )?;

    debug!("Created output dir for circular badges: {:?}", dir);

    Ok(())
}

/// Write encoded badge to file, overwriting a previous run.
pub async fn write_badge(target: &Path, buf: &[u8]) -> Result<(), BadgeError> {
    tokio::fs::write(target, buf).await
        .map_err(|e| BadgeError::Write { path: target.to_owned(), source: e })
}
