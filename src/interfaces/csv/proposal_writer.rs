use crate::domain::catalog::ProgramType;
use crate::domain::money::Money;
use crate::domain::proposal::{Proposal, ProposalStatus};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

#[derive(Serialize)]
struct ProposalRow<'a> {
    id: Uuid,
    proposal_number: &'a str,
    client_name: &'a str,
    client_email: Option<&'a str>,
    proposal_date: NaiveDate,
    program: ProgramType,
    tier: &'a str,
    commitment_months: u32,
    monthly_total: Money,
    full_commitment_total: Money,
    due_on_signing: Money,
    status: ProposalStatus,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Proposal> for ProposalRow<'a> {
    fn from(p: &'a Proposal) -> Self {
        Self {
            id: p.id,
            proposal_number: &p.proposal_number,
            client_name: &p.client_name,
            client_email: p.client_email.as_deref(),
            proposal_date: p.proposal_date,
            program: p.selection.program_type,
            tier: &p.pricing.tier_name,
            commitment_months: p.selection.commitment_length,
            monthly_total: p.pricing.monthly_total,
            full_commitment_total: p.pricing.full_commitment_total,
            due_on_signing: p.pricing.due_on_signing,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

/// Writes proposal summaries as CSV, one row per proposal, with a header row.
pub struct ProposalWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProposalWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_proposals<'a, I>(&mut self, proposals: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Proposal>,
    {
        let mut wrote_any = false;
        for proposal in proposals {
            self.writer.serialize(ProposalRow::from(proposal))?;
            wrote_any = true;
        }
        if !wrote_any {
            // serde only emits headers alongside the first record
            self.writer.write_record(HEADERS)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

const HEADERS: [&str; 13] = [
    "id",
    "proposal_number",
    "client_name",
    "client_email",
    "proposal_date",
    "program",
    "tier",
    "commitment_months",
    "monthly_total",
    "full_commitment_total",
    "due_on_signing",
    "status",
    "created_at",
];
