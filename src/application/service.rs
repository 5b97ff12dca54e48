use crate::domain::catalog::Catalog;
use crate::domain::ports::ProposalStoreBox;
use crate::domain::money::Money;
use crate::domain::pricing::{PriceBreakdown, add_on_lines, compute_breakdown};
use crate::domain::proposal::{Proposal, ProposalDraft, ProposalStatus, format_proposal_number};
use crate::domain::selection::Selection;
use crate::error::{ProposalError, Result};
use chrono::Utc;
use uuid::Uuid;

/// Entry point for everything the proposal pages do.
///
/// `ProposalService` owns the catalog and the storage backend. Pricing always
/// goes through [`compute_breakdown`] so that previews, saved snapshots and
/// rendered quotes agree.
pub struct ProposalService {
    catalog: Catalog,
    store: ProposalStoreBox,
}

impl ProposalService {
    /// Creates a new `ProposalService`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The validated catalog to price against.
    /// * `store` - The store for saved proposals.
    pub fn new(catalog: Catalog, store: ProposalStoreBox) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Prices a selection without saving anything.
    pub fn preview(&self, selection: &Selection) -> Result<PriceBreakdown> {
        compute_breakdown(selection, &self.catalog)
    }

    /// The number the next saved proposal will get.
    ///
    /// Derived from the current record count, so two writers saving at the
    /// same time can be handed the same number.
    pub async fn next_proposal_number(&self) -> Result<String> {
        let count = self.store.count().await?;
        Ok(format_proposal_number(count))
    }

    /// Validates, prices and stores a draft. The saved proposal starts as `draft`.
    pub async fn save(&self, draft: ProposalDraft) -> Result<Proposal> {
        draft.selection.validate(&self.catalog)?;
        let breakdown = self.preview(&draft.selection)?;
        let number = self.next_proposal_number().await?;

        let proposal = Proposal::new(draft, number, &breakdown, Utc::now());
        self.store.insert(proposal.clone()).await?;

        tracing::info!(
            id = %proposal.id,
            number = %proposal.proposal_number,
            monthly_total = %proposal.pricing.monthly_total,
            "Saved proposal"
        );
        Ok(proposal)
    }

    /// All proposals, newest first.
    pub async fn list(&self) -> Result<Vec<Proposal>> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Proposal>> {
        self.store.get(id).await
    }

    pub async fn update_status(&self, id: Uuid, status: ProposalStatus) -> Result<Proposal> {
        let mut proposal = self
            .store
            .get(id)
            .await?
            .ok_or(ProposalError::NotFound(id))?;
        let previous = proposal.status;
        proposal.set_status(status, Utc::now());

        if !self.store.update(proposal.clone()).await? {
            return Err(ProposalError::NotFound(id));
        }

        tracing::info!(%id, from = %previous, to = %status, "Updated proposal status");
        Ok(proposal)
    }

    /// Removes a proposal for good.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(ProposalError::NotFound(id));
        }
        tracing::info!(%id, "Deleted proposal");
        Ok(())
    }

    /// The breakdown a saved proposal was quoted at.
    ///
    /// Amounts come from the stored snapshot, so later catalog edits never
    /// change a saved quote. Only the add-on lines are looked up again.
    pub fn breakdown_for(&self, proposal: &Proposal) -> PriceBreakdown {
        let add_ons = add_on_lines(&proposal.selection, &self.catalog);
        let listed: Money = add_ons.iter().map(|line| line.price).sum();
        let saved = proposal.pricing.monthly_add_ons_total + proposal.pricing.one_time_add_ons_total;
        if listed != saved {
            tracing::warn!(
                id = %proposal.id,
                %saved,
                current = %listed,
                "Add-on prices changed since the proposal was saved"
            );
        }
        PriceBreakdown::from_snapshot(&proposal.pricing, add_ons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProgramType;
    use crate::infrastructure::in_memory::InMemoryProposalStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn service() -> ProposalService {
        ProposalService::new(Catalog::standard(), Box::new(InMemoryProposalStore::new()))
    }

    fn draft(client_name: &str) -> ProposalDraft {
        ProposalDraft {
            client_name: client_name.to_string(),
            client_email: None,
            proposal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            selection: Selection {
                program_type: ProgramType::MuscleBuilding,
                selected_tier_id: "muscle-growth".to_string(),
                in_person_sessions: 2,
                commitment_length: 12,
                friends_and_family: false,
                selected_add_ons: vec!["single-session".to_string()],
            },
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_numbers() {
        let service = service();
        assert_eq!(service.next_proposal_number().await.unwrap(), "0000");

        let first = service.save(draft("Alice")).await.unwrap();
        let second = service.save(draft("Bob")).await.unwrap();

        assert_eq!(first.proposal_number, "0000");
        assert_eq!(second.proposal_number, "0001");
        assert_eq!(service.next_proposal_number().await.unwrap(), "0002");
    }

    #[tokio::test]
    async fn test_save_stores_price_snapshot() {
        let service = service();
        let proposal = service.save(draft("Alice")).await.unwrap();

        // 350 - 50 + 2 * 60
        assert_eq!(proposal.pricing.monthly_total, Money::new(dec!(420)));
        assert_eq!(proposal.pricing.full_commitment_total, Money::new(dec!(5115)));
        assert_eq!(proposal.pricing.due_on_signing, Money::new(dec!(1335)));
        assert_eq!(proposal.status, ProposalStatus::Draft);

        let stored = service.get(proposal.id).await.unwrap().unwrap();
        assert_eq!(stored, proposal);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_selection() {
        let service = service();
        let mut d = draft("Alice");
        d.selection.selected_tier_id = "fat-loss-kickstart".to_string();

        assert!(matches!(
            service.save(d).await,
            Err(ProposalError::ValidationError(_))
        ));
        assert_eq!(service.list().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = service();
        let proposal = service.save(draft("Alice")).await.unwrap();

        let updated = service
            .update_status(proposal.id, ProposalStatus::Sent)
            .await
            .unwrap();
        assert_eq!(updated.status, ProposalStatus::Sent);
        assert_eq!(updated.pricing, proposal.pricing);
        assert!(updated.updated_at >= proposal.updated_at);

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.update_status(missing, ProposalStatus::Accepted).await,
            Err(ProposalError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let service = service();
        let proposal = service.save(draft("Alice")).await.unwrap();

        service.delete(proposal.id).await.unwrap();
        assert!(service.get(proposal.id).await.unwrap().is_none());
        assert!(matches!(
            service.delete(proposal.id).await,
            Err(ProposalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_breakdown_for_lists_add_on_lines() {
        let service = service();
        let proposal = service.save(draft("Alice")).await.unwrap();

        let breakdown = service.breakdown_for(&proposal);
        assert_eq!(breakdown.add_ons.len(), 1);
        assert_eq!(breakdown.add_ons[0].name, "Single Training Session");
        assert_eq!(breakdown, service.preview(&proposal.selection).unwrap());
    }

    #[tokio::test]
    async fn test_breakdown_for_keeps_saved_amounts_after_catalog_change() {
        let store = Box::new(InMemoryProposalStore::new());
        let proposal = ProposalService::new(Catalog::standard(), store)
            .save(draft("Alice"))
            .await
            .unwrap();

        let mut catalog = Catalog::standard();
        for program in &mut catalog.programs {
            for tier in &mut program.tiers {
                tier.price = Money::new(dec!(999));
            }
        }
        catalog.commitment_discounts.remove(&12);
        let repriced = ProposalService::new(catalog, Box::new(InMemoryProposalStore::new()));

        let breakdown = repriced.breakdown_for(&proposal);
        assert_eq!(breakdown.base_tier_price, Money::new(dec!(350)));
        assert_eq!(breakdown.monthly_total, Money::new(dec!(420)));
        assert_eq!(breakdown.due_on_signing, Money::new(dec!(1335)));
        assert_eq!(breakdown.commitment_months, 12);
        assert_eq!(breakdown.add_ons.len(), 1);
    }
}
