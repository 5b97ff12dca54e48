use crate::domain::ports::{ProposalStore, sort_newest_first};
use crate::domain::proposal::Proposal;
use crate::error::{ProposalError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for storing proposals.
pub const CF_PROPOSALS: &str = "proposals";

/// A persistent store implementation using RocksDB.
///
/// Proposals live in their own column family, keyed by the bytes of their id
/// and stored as JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "proposals" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_proposals = ColumnFamilyDescriptor::new(CF_PROPOSALS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_proposals])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_PROPOSALS).ok_or_else(|| {
            ProposalError::InternalError(Box::new(std::io::Error::other(
                "Proposals column family not found",
            )))
        })
    }

    fn put(&self, proposal: &Proposal) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(proposal)?;
        self.db.put_cf(cf, proposal.id.as_bytes(), value)?;
        Ok(())
    }

    fn exists(&self, id: Uuid) -> Result<bool> {
        let cf = self.cf()?;
        Ok(self.db.get_pinned_cf(cf, id.as_bytes())?.is_some())
    }
}

#[async_trait]
impl ProposalStore for RocksDBStore {
    async fn insert(&self, proposal: Proposal) -> Result<()> {
        self.put(&proposal)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, proposal: Proposal) -> Result<bool> {
        if !self.exists(proposal.id)? {
            return Ok(false);
        }
        self.put(&proposal)?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        if !self.exists(id)? {
            return Ok(false);
        }
        let cf = self.cf()?;
        self.db.delete_cf(cf, id.as_bytes())?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Proposal>> {
        let cf = self.cf()?;
        let mut proposals = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            proposals.push(serde_json::from_slice::<Proposal>(&value)?);
        }
        sort_newest_first(&mut proposals);
        Ok(proposals)
    }

    async fn count(&self) -> Result<usize> {
        let cf = self.cf()?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::proposal::ProposalStatus;
    use crate::test_support::sample_proposal;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_PROPOSALS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_proposal_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let now = Utc::now();
        let older = sample_proposal("0000", now - Duration::minutes(1));
        let mut newer = sample_proposal("0001", now);

        store.insert(older.clone()).await.unwrap();
        store.insert(newer.clone()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get(older.id).await.unwrap(), Some(older.clone()));
        assert_eq!(store.list().await.unwrap(), vec![newer.clone(), older.clone()]);

        newer.status = ProposalStatus::Sent;
        assert!(store.update(newer.clone()).await.unwrap());
        assert_eq!(
            store.get(newer.id).await.unwrap().unwrap().status,
            ProposalStatus::Sent
        );

        assert!(store.delete(older.id).await.unwrap());
        assert!(!store.delete(older.id).await.unwrap());
        assert!(store.get(older.id).await.unwrap().is_none());
    }
}
