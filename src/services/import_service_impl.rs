//! Default implementation of the `ImportService` trait, fetching metadata
//! from the configured external source.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::metadata::MetadataSource;
use crate::db::{Store, is_unique_violation};
use crate::domain::is_known_subject;
use crate::models::{NewVideo, User};
use crate::services::authz::{Action, Authorizer};
use crate::services::import_service::{
    ImportError, ImportOutcome, ImportRow, ImportRowError, ImportService,
};

pub struct DefaultImportService {
    store: Store,
    source: Arc<dyn MetadataSource>,
    authorizer: Arc<dyn Authorizer>,
}

impl DefaultImportService {
    #[must_use]
    pub fn new(
        store: Store,
        source: Arc<dyn MetadataSource>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            store,
            source,
            authorizer,
        }
    }

    /// One row, independently: any failure becomes the row's message.
    async fn import_row(&self, row: &ImportRow) -> Result<(), String> {
        let metadata = self
            .source
            .fetch_video_metadata(&row.external_id)
            .await
            .map_err(|e| format!("metadata source unavailable for {}: {e}", row.external_id))?
            .ok_or_else(|| format!("external video {} not found", row.external_id))?;

        let subject = row.subject.clone().unwrap_or(metadata.subject);
        if !is_known_subject(&subject) {
            return Err(format!("unknown subject: {subject}"));
        }

        if self
            .store
            .get_video_by_external_id(&row.external_id)
            .await
            .map_err(|e| e.to_string())?
            .is_some()
        {
            return Err(format!("{} is already in the catalog", row.external_id));
        }

        let new_video = NewVideo {
            title: metadata.title,
            subject,
            external_id: row.external_id.clone(),
            duration_seconds: metadata.duration_seconds,
        };

        self.store.add_video(&new_video).await.map_err(|e| {
            if is_unique_violation(&e) {
                format!("{} is already in the catalog", row.external_id)
            } else {
                e.to_string()
            }
        })?;

        Ok(())
    }
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import(
        &self,
        rows: &[ImportRow],
        actor: &User,
    ) -> Result<ImportOutcome, ImportError> {
        if !self
            .authorizer
            .authorize(&Action::Import, actor)
            .is_allowed()
        {
            return Err(ImportError::Permission(format!(
                "{} may not import videos",
                actor.email
            )));
        }

        let mut outcome = ImportOutcome::default();

        for (idx, row) in rows.iter().enumerate() {
            match self.import_row(row).await {
                Ok(()) => outcome.imported += 1,
                Err(message) => {
                    warn!("Import row {} failed: {}", idx + 1, message);
                    outcome.errors.push(ImportRowError {
                        row: idx + 1,
                        message,
                    });
                }
            }
        }

        info!(
            "Import finished: {} added, {} rejected",
            outcome.imported,
            outcome.errors.len()
        );

        Ok(outcome)
    }
}
