use super::catalog::{Catalog, ProgramType};
use crate::error::{ProposalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What the client picked: the only input of the pricing engine besides the catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Selection {
    pub program_type: ProgramType,
    pub selected_tier_id: String,
    /// In-person sessions per month.
    pub in_person_sessions: u32,
    /// Commitment length in months.
    pub commitment_length: u32,
    pub friends_and_family: bool,
    pub selected_add_ons: Vec<String>,
}

impl Selection {
    /// The entry-level tier of `program_type` with no extras on the shortest commitment.
    pub fn starter(catalog: &Catalog, program_type: ProgramType) -> Self {
        Self {
            program_type,
            selected_tier_id: catalog
                .default_tier(program_type)
                .map(|tier| tier.id.clone())
                .unwrap_or_default(),
            in_person_sessions: 0,
            commitment_length: catalog.shortest_commitment().unwrap_or_default(),
            friends_and_family: false,
            selected_add_ons: Vec::new(),
        }
    }

    /// Checks every choice against the catalog tables.
    ///
    /// The pricing engine itself is lenient (unknown tiers price at zero,
    /// unknown add-ons are dropped); this is the check a form runs before
    /// accepting a selection.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        if catalog
            .tier(self.program_type, &self.selected_tier_id)
            .is_none()
        {
            return Err(ProposalError::ValidationError(format!(
                "tier '{}' does not exist in program '{}'",
                self.selected_tier_id, self.program_type
            )));
        }

        if !catalog.session_options.contains_key(&self.in_person_sessions) {
            return Err(ProposalError::ValidationError(format!(
                "{} in-person sessions per month is not offered",
                self.in_person_sessions
            )));
        }

        if catalog
            .commitment_discount(self.commitment_length)
            .is_none()
        {
            return Err(ProposalError::ValidationError(format!(
                "{}-month commitment is not offered",
                self.commitment_length
            )));
        }

        let mut seen = HashSet::new();
        for add_on_id in &self.selected_add_ons {
            if catalog.add_on(add_on_id).is_none() {
                return Err(ProposalError::ValidationError(format!(
                    "add-on '{}' does not exist",
                    add_on_id
                )));
            }
            if !seen.insert(add_on_id.as_str()) {
                return Err(ProposalError::ValidationError(format!(
                    "add-on '{}' selected more than once",
                    add_on_id
                )));
            }
        }

        Ok(())
    }
}
