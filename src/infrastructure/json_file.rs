use crate::domain::ports::{ProposalStore, sort_newest_first};
use crate::domain::proposal::Proposal;
use crate::error::{ProposalError, Result};
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A proposal store backed by a single JSON file.
///
/// The file holds a JSON array of proposals. Every mutation rewrites the whole
/// file through a temporary file in the same directory, so a crash never leaves
/// a half-written store behind. A missing file reads as an empty store.
///
/// File access runs on tokio's blocking pool. Cloning shares the lock;
/// separate processes writing the same file are not coordinated.
#[derive(Clone)]
pub struct JsonFileProposalStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileProposalStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "Opened JSON proposal store");
        Ok(Self {
            path,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file on the blocking pool.
    async fn read(&self) -> Result<Vec<Proposal>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load(&path))
            .await
            .map_err(|e| ProposalError::InternalError(Box::new(e)))?
    }

    /// Loads, applies `change` and writes back only when it reports a change.
    /// Runs as one blocking task so the file is never rewritten from a stale read.
    async fn modify<T, F>(&self, change: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Vec<Proposal>) -> (bool, T) + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut proposals = load(&path)?;
            let (changed, value) = change(&mut proposals);
            if changed {
                save(&path, &proposals)?;
            }
            Ok(value)
        })
        .await
        .map_err(|e| ProposalError::InternalError(Box::new(e)))?
    }
}

fn load(path: &Path) -> Result<Vec<Proposal>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let proposals = serde_json::from_reader(BufReader::new(file))?;
    Ok(proposals)
}

fn save(path: &Path, proposals: &[Proposal]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, proposals)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl ProposalStore for JsonFileProposalStore {
    async fn insert(&self, proposal: Proposal) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.modify(move |proposals| {
            proposals.retain(|existing| existing.id != proposal.id);
            proposals.push(proposal);
            (true, ())
        })
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.into_iter().find(|p| p.id == id))
    }

    async fn update(&self, proposal: Proposal) -> Result<bool> {
        let _guard = self.lock.lock().await;
        self.modify(move |proposals| {
            match proposals.iter_mut().find(|p| p.id == proposal.id) {
                Some(existing) => {
                    *existing = proposal;
                    (true, true)
                }
                None => (false, false),
            }
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.lock.lock().await;
        self.modify(move |proposals| {
            let before = proposals.len();
            proposals.retain(|p| p.id != id);
            let removed = proposals.len() != before;
            (removed, removed)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Proposal>> {
        let _guard = self.lock.lock().await;
        let mut proposals = self.read().await?;
        sort_newest_first(&mut proposals);
        Ok(proposals)
    }

    async fn count(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.len())
    }
}
