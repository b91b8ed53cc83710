//! Concurrent extraction of a whole submission.

use crate::extract;
use futures::future::try_join_all;
use kitty_core::{combine_materials, Error, Result, UploadedFile};

/// Extract every file concurrently, returning texts in submission order.
///
/// Each file runs on the blocking pool. The first failure fails the whole
/// batch with that file's error; no partial results are returned.
pub async fn extract_all(files: Vec<UploadedFile>) -> Result<Vec<String>> {
    let tasks = files.into_iter().map(|file| async move {
        let name = file.name.clone();
        let result = tokio::task::spawn_blocking(move || extract(&file))
            .await
            .map_err(|e| Error::TaskFailed(format!("extraction of '{}' did not finish: {}", name, e)))?;

        if let Err(ref e) = result {
            log::warn!("Failed to extract '{}': {}", name, e);
        }
        result
    });

    try_join_all(tasks).await
}

/// Extract `files` and combine them with pasted text into one study context.
///
/// Fails with `NoMaterials` when there is neither pasted text nor a file.
pub async fn prepare_materials(pasted: &str, files: Vec<UploadedFile>) -> Result<String> {
    let documents = extract_all(files).await?;
    combine_materials(pasted, &documents)
}
