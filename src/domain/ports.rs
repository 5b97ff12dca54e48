use super::proposal::Proposal;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ProposalStore: Send + Sync {
    async fn insert(&self, proposal: Proposal) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Proposal>>;
    /// Replaces a stored proposal. Returns `false` if no proposal has that id.
    async fn update(&self, proposal: Proposal) -> Result<bool>;
    /// Returns `false` if no proposal has that id.
    async fn delete(&self, id: Uuid) -> Result<bool>;
    /// All proposals, newest first.
    async fn list(&self) -> Result<Vec<Proposal>>;
    async fn count(&self) -> Result<usize>;
}

pub type ProposalStoreBox = Box<dyn ProposalStore>;
pub type ProposalStoreFactory = Box<dyn Fn() -> ProposalStoreBox + Send + Sync>;

/// Orders proposals newest first, breaking ties by proposal number.
pub fn sort_newest_first(proposals: &mut [Proposal]) {
    proposals.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.proposal_number.cmp(&a.proposal_number))
    });
}
