use super::money::Money;
use super::pricing::PriceBreakdown;
use super::selection::Selection;
use crate::error::{ProposalError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const UNNAMED_CLIENT: &str = "Unnamed Client";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(ProposalStatus::Draft),
            "sent" => Ok(ProposalStatus::Sent),
            "accepted" => Ok(ProposalStatus::Accepted),
            "declined" => Ok(ProposalStatus::Declined),
            other => Err(ProposalError::ValidationError(format!(
                "unknown proposal status '{}'",
                other
            ))),
        }
    }
}

/// The scalar part of a [`PriceBreakdown`], as stored with a proposal.
///
/// Add-on lines are left out; they are recomputed from the selection.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PriceSnapshot {
    pub base_tier_price: Money,
    pub tier_name: String,
    pub tier_description: String,
    pub in_person_sessions: u32,
    pub in_person_sessions_price: Money,
    pub sessions_per_week: Decimal,
    pub friends_and_family_discount: Money,
    pub after_family_discount: Money,
    pub commitment_discount: Money,
    pub discounted_tier_price: Money,
    pub monthly_add_ons_total: Money,
    pub one_time_add_ons_total: Money,
    pub monthly_total: Money,
    pub commitment_months: u32,
    pub full_commitment_total: Money,
    pub due_on_signing: Money,
}

impl From<&PriceBreakdown> for PriceSnapshot {
    fn from(breakdown: &PriceBreakdown) -> Self {
        Self {
            base_tier_price: breakdown.base_tier_price,
            tier_name: breakdown.tier_name.clone(),
            tier_description: breakdown.tier_description.clone(),
            in_person_sessions: breakdown.in_person_sessions,
            in_person_sessions_price: breakdown.in_person_sessions_price,
            sessions_per_week: breakdown.sessions_per_week,
            friends_and_family_discount: breakdown.friends_and_family_discount,
            after_family_discount: breakdown.after_family_discount,
            commitment_discount: breakdown.commitment_discount,
            discounted_tier_price: breakdown.discounted_tier_price,
            monthly_add_ons_total: breakdown.monthly_add_ons_total,
            one_time_add_ons_total: breakdown.one_time_add_ons_total,
            monthly_total: breakdown.monthly_total,
            commitment_months: breakdown.commitment_months,
            full_commitment_total: breakdown.full_commitment_total,
            due_on_signing: breakdown.due_on_signing,
        }
    }
}

/// A proposal as filled in, before it is saved.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProposalDraft {
    pub client_name: String,
    pub client_email: Option<String>,
    pub proposal_date: NaiveDate,
    pub selection: Selection,
}

/// A saved proposal.
///
/// Only `status` (and with it `updated_at`) changes after creation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Proposal {
    pub id: Uuid,
    pub proposal_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub proposal_date: NaiveDate,
    pub selection: Selection,
    pub pricing: PriceSnapshot,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(
        draft: ProposalDraft,
        proposal_number: String,
        breakdown: &PriceBreakdown,
        now: DateTime<Utc>,
    ) -> Self {
        let client_name = match draft.client_name.trim() {
            "" => UNNAMED_CLIENT.to_string(),
            name => name.to_string(),
        };
        let client_email = draft
            .client_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Self {
            id: Uuid::new_v4(),
            proposal_number,
            client_name,
            client_email,
            proposal_date: draft.proposal_date,
            selection: draft.selection,
            pricing: PriceSnapshot::from(breakdown),
            status: ProposalStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ProposalStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Formats the number of an upcoming proposal from the count of existing ones.
pub fn format_proposal_number(existing: usize) -> String {
    format!("{:04}", existing)
}
