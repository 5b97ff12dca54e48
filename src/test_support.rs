use crate::domain::catalog::{Catalog, ProgramType};
use crate::domain::pricing::compute_breakdown;
use crate::domain::proposal::{Proposal, ProposalDraft};
use crate::domain::selection::Selection;
use chrono::{DateTime, NaiveDate, Utc};

/// Accelerate, friends and family, 4 sessions, 6 months: $460/mo.
pub fn sample_proposal(number: &str, created_at: DateTime<Utc>) -> Proposal {
    let draft = ProposalDraft {
        client_name: "Jane Doe".to_string(),
        client_email: Some("jane@example.com".to_string()),
        proposal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        selection: Selection {
            program_type: ProgramType::FatLoss,
            selected_tier_id: "fat-loss-accelerate".to_string(),
            in_person_sessions: 4,
            commitment_length: 6,
            friends_and_family: true,
            selected_add_ons: vec![],
        },
    };
    let breakdown = compute_breakdown(&draft.selection, &Catalog::standard()).unwrap();
    Proposal::new(draft, number.to_string(), &breakdown, created_at)
}
