use crate::domain::ports::{ProposalStore, sort_newest_first};
use crate::domain::proposal::Proposal;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for proposals.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Proposal>>>` to allow shared concurrent access.
/// Nothing survives the process; used for tests and one-off quoting.
#[derive(Default, Clone)]
pub struct InMemoryProposalStore {
    proposals: Arc<RwLock<HashMap<Uuid, Proposal>>>,
}

impl InMemoryProposalStore {
    /// Creates a new, empty in-memory proposal store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalStore for InMemoryProposalStore {
    async fn insert(&self, proposal: Proposal) -> Result<()> {
        let mut proposals = self.proposals.write().await;
        proposals.insert(proposal.id, proposal);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals.get(&id).cloned())
    }

    async fn update(&self, proposal: Proposal) -> Result<bool> {
        let mut proposals = self.proposals.write().await;
        match proposals.get_mut(&proposal.id) {
            Some(existing) => {
                *existing = proposal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut proposals = self.proposals.write().await;
        Ok(proposals.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        let mut all: Vec<Proposal> = proposals.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.proposals.read().await.len())
    }
}
