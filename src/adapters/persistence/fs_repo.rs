//! Implements ResultStorePort. Writes run artifacts as pretty JSON files.
//! One shared output directory: `{session}-{title}.json` per report and
//! `{session}-aggregated_analysis.json` per run. Plain overwrite; no locking.

use crate::domain::{DomainError, SessionId};
use crate::ports::ResultStorePort;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Suffix of the per-run aggregate file.
pub const AGGREGATE_FILE_NAME: &str = "aggregated_analysis.json";

/// Serialize with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Keep a report title from reaching outside the output directory.
fn file_safe(title: &str) -> String {
    title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// File-system result store rooted at one output directory.
pub struct FsResultStore {
    base_dir: PathBuf,
}

impl FsResultStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn report_path(&self, session: &SessionId, title: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}-{}.json", session, file_safe(title)))
    }

    fn aggregate_path(&self, session: &SessionId) -> PathBuf {
        self.base_dir
            .join(format!("{}-{}", session, AGGREGATE_FILE_NAME))
    }

    async fn write_json(&self, path: &Path, data: &serde_json::Value) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let bytes = to_pretty_json(data).map_err(|e| DomainError::Repo(e.to_string()))?;
        fs::write(path, bytes)
            .await
            .map_err(|e| DomainError::Repo(format!("write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResultStorePort for FsResultStore {
    async fn save_report(
        &self,
        session: &SessionId,
        title: &str,
        data: &serde_json::Value,
    ) -> Result<PathBuf, DomainError> {
        let path = self.report_path(session, title);
        self.write_json(&path, data).await?;
        info!(path = %path.display(), session = %session, "saved report extraction");
        Ok(path)
    }

    async fn save_aggregate(
        &self,
        session: &SessionId,
        data: &serde_json::Value,
    ) -> Result<PathBuf, DomainError> {
        let path = self.aggregate_path(session);
        self.write_json(&path, data).await?;
        let abs_path = path.canonicalize().unwrap_or_else(|_| path.clone());
        info!(path = %abs_path.display(), session = %session, "saved aggregated analysis");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_report_file_name_and_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsResultStore::new(dir.path().join("processed_data"));
        let session = SessionId::from("abc");

        let path = store
            .save_report(&session, "Into the Void", &json!({"substance": "LSD"}))
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("processed_data/abc-Into the Void.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"substance\": \"LSD\"\n}\n");
    }

    #[tokio::test]
    async fn test_title_separators_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsResultStore::new(dir.path());
        let session = SessionId::from("s");

        let path = store
            .save_report(&session, "../up/and\\out", &json!({}))
            .await
            .unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert_eq!(path.file_name().unwrap(), "s-.._up_and_out.json");
    }

    #[tokio::test]
    async fn test_aggregate_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsResultStore::new(dir.path());
        let session = SessionId::from("run1");

        let path = store
            .save_aggregate(&session, &json!({"theme_counts": {}}))
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "run1-aggregated_analysis.json");
        assert!(path.exists());
    }
}
