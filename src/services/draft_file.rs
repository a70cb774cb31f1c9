use std::path::Path;

use thiserror::Error;
use tokio::fs;

use crate::models::ClusterDraft;

/// Errors that can occur while loading or persisting the draft file.
#[derive(Debug, Error)]
pub enum DraftFileError {
    #[error("failed to access draft file: {0}")]
    Io(#[from] std::io::Error),

    #[error("draft file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the in-progress draft persisted by a previous invocation.
pub async fn load_draft_file(path: &Path) -> Result<ClusterDraft, DraftFileError> {
    let raw = fs::read_to_string(path).await?;
    let draft = serde_json::from_str(&raw)?;
    Ok(draft)
}

/// Persist the draft so the next invocation can resume editing it.
pub async fn persist_draft_file(path: &Path, draft: &ClusterDraft) -> Result<(), DraftFileError> {
    let raw = serde_json::to_string_pretty(draft)?;
    fs::write(path, raw).await?;
    tracing::debug!(path = %path.display(), "draft persisted");
    Ok(())
}

/// Remove the draft file once the draft has been submitted or abandoned.
pub async fn discard_draft_file(path: &Path) -> Result<(), DraftFileError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DraftFileError::Io(e)),
    }
}
