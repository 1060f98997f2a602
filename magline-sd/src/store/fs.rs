//! Filesystem-backed artifact store
//!
//! Lays jobs out as `<root>/<job_id>/<artifact file>`, the layout the
//! service owns in production.

use std::path::{Path, PathBuf};

use magline_common::{Error, Result};

use super::{Artifact, ArtifactStore};

/// Artifact store over a data root directory on the local filesystem
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a job's workspace directory.
    ///
    /// Job ids are generated by this service, but ids also arrive in URL
    /// paths, so reject anything that could escape the data root.
    fn job_dir(&self, job_id: &str) -> Result<PathBuf> {
        if job_id.is_empty()
            || !job_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidInput(format!("invalid job id: {}", job_id)));
        }
        Ok(self.root.join(job_id))
    }

    fn artifact_path(&self, job_id: &str, artifact: Artifact) -> Result<PathBuf> {
        Ok(self.job_dir(job_id)?.join(artifact.file_name()))
    }
}

impl ArtifactStore for FsStore {
    fn workspace_exists(&self, job_id: &str) -> Result<bool> {
        Ok(self.job_dir(job_id)?.is_dir())
    }

    fn create_workspace(&self, job_id: &str) -> Result<()> {
        let dir = self.job_dir(job_id)?;
        std::fs::create_dir_all(&dir)?;
        Ok(())
    }

    fn exists(&self, job_id: &str, artifact: Artifact) -> Result<bool> {
        Ok(self.artifact_path(job_id, artifact)?.is_file())
    }

    fn read(&self, job_id: &str, artifact: Artifact) -> Result<Vec<u8>> {
        let path = self.artifact_path(job_id, artifact)?;
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "{} for job {}",
                artifact.file_name(),
                job_id
            )));
        }
        Ok(std::fs::read(&path)?)
    }

    fn write(&self, job_id: &str, artifact: Artifact, bytes: &[u8]) -> Result<()> {
        let path = self.artifact_path(job_id, artifact)?;
        write_atomically(&path, bytes)
    }
}

/// Write via a temporary sibling and rename, so a crashed write never leaves
/// a half-written artifact that the status resolver would misread as present.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        assert!(!store.workspace_exists("mgl-abc123").unwrap());
        store.create_workspace("mgl-abc123").unwrap();
        assert!(store.workspace_exists("mgl-abc123").unwrap());

        // Idempotent
        store.create_workspace("mgl-abc123").unwrap();
    }

    #[test]
    fn test_artifact_read_write_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        store.create_workspace("job1").unwrap();

        assert!(!store.exists("job1", Artifact::Train).unwrap());
        store.write("job1", Artifact::Train, b"x,y\n1,2\n").unwrap();
        assert!(store.exists("job1", Artifact::Train).unwrap());
        assert_eq!(store.read("job1", Artifact::Train).unwrap(), b"x,y\n1,2\n");
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        store.create_workspace("job1").unwrap();

        assert!(matches!(
            store.read("job1", Artifact::Final),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_path_traversal_job_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        for bad in ["../etc", "a/b", "", "a b", "x\\y"] {
            assert!(
                matches!(store.workspace_exists(bad), Err(Error::InvalidInput(_))),
                "job id {:?} should be rejected",
                bad
            );
        }
    }
}
