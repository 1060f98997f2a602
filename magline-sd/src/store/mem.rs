//! In-memory artifact store for tests and ephemeral runs

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use magline_common::{Error, Result};

use super::{Artifact, ArtifactStore};

/// Artifact store backed by process memory. Cheap to construct per test;
/// contents vanish with the value.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    workspaces: HashSet<String>,
    artifacts: HashMap<(String, Artifact), Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemStore {
    fn workspace_exists(&self, job_id: &str) -> Result<bool> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.workspaces.contains(job_id))
    }

    fn create_workspace(&self, job_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.workspaces.insert(job_id.to_string());
        Ok(())
    }

    fn exists(&self, job_id: &str, artifact: Artifact) -> Result<bool> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .artifacts
            .contains_key(&(job_id.to_string(), artifact)))
    }

    fn read(&self, job_id: &str, artifact: Artifact) -> Result<Vec<u8>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .artifacts
            .get(&(job_id.to_string(), artifact))
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!("{} for job {}", artifact.file_name(), job_id))
            })
    }

    fn write(&self, job_id: &str, artifact: Artifact, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner
            .artifacts
            .insert((job_id.to_string(), artifact), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_round_trip() {
        let store = MemStore::new();
        store.create_workspace("job1").unwrap();
        assert!(store.workspace_exists("job1").unwrap());
        assert!(!store.workspace_exists("job2").unwrap());

        store
            .write("job1", Artifact::Predictions, b"predicted_value\n1.0\n")
            .unwrap();
        assert!(store.exists("job1", Artifact::Predictions).unwrap());
        assert_eq!(
            store.read("job1", Artifact::Predictions).unwrap(),
            b"predicted_value\n1.0\n"
        );
    }

    #[test]
    fn test_mem_store_missing_reads() {
        let store = MemStore::new();
        assert!(matches!(
            store.read("nope", Artifact::Final),
            Err(Error::NotFound(_))
        ));
    }
}
