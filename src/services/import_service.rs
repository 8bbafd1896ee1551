//! Domain service for bulk catalog imports.
//!
//! Rows are processed independently: one bad row is reported in the
//! aggregate outcome and never rolls back rows already committed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

/// Errors that fail an import wholesale. Per-row problems are data, not
/// errors: they travel in [`ImportOutcome::errors`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One importable row: the external reference plus an optional subject
/// override for sources with unreliable tagging.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    pub external_id: String,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    /// 1-based position in the submitted batch.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub errors: Vec<ImportRowError>,
}

#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Imports a batch. Requires import permission for the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Permission`] when the policy denies the actor;
    /// row-level failures (unknown reference, unreachable source, bad
    /// subject, duplicate) are reported in the outcome instead.
    async fn import(
        &self,
        rows: &[ImportRow],
        actor: &User,
    ) -> Result<ImportOutcome, ImportError>;
}

/// Parses line-oriented import text: one `external_id[,subject]` per line,
/// blank lines and `#` comments skipped. Malformed lines are reported with
/// their line number, never silently dropped.
#[must_use]
pub fn parse_import_lines(text: &str) -> (Vec<(usize, ImportRow)>, Vec<ImportRowError>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.splitn(2, ',').map(str::trim);
        let external_id = fields.next().unwrap_or_default();

        if external_id.is_empty() {
            errors.push(ImportRowError {
                row: line_no,
                message: "missing external id".to_string(),
            });
            continue;
        }

        let subject = fields.next().filter(|s| !s.is_empty()).map(str::to_string);

        rows.push((
            line_no,
            ImportRow {
                external_id: external_id.to_string(),
                subject,
            },
        ));
    }

    (rows, errors)
}
