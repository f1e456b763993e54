//! Persisting generated images to the local filesystem.

use std::path::Path;

use crate::api::LeonardoApi;
use crate::workflow::WorkflowError;

/// Download the image at `url` and write it to `path`, creating parent
/// directories as needed.
pub async fn download_to_file(
    api: &LeonardoApi,
    url: &str,
    path: &Path,
) -> Result<(), WorkflowError> {
    let bytes = api.fetch_bytes(url).await?;

    let persist_err = |source: std::io::Error| WorkflowError::Persist {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(persist_err)?;
        }
    }
    tokio::fs::write(path, &bytes).await.map_err(persist_err)?;

    tracing::info!(%url, path = %path.display(), size = bytes.len(), "Saved image");
    Ok(())
}
