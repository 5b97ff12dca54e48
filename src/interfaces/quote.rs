use super::format::{format_currency, format_date};
use crate::domain::catalog::Catalog;
use crate::domain::money::Money;
use crate::domain::pricing::PriceBreakdown;
use crate::domain::proposal::Proposal;
use crate::domain::selection::Selection;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{self, Write};

pub const BUSINESS_NAME: &str = "Irwin Fitness";
const TAGLINE: &str = "Personal Training & Coaching";
const LABEL_WIDTH: usize = 44;
const VALUE_WIDTH: usize = 14;

/// Who the quote is for. Unsaved quotes have none.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteHeader {
    pub client_name: String,
    pub client_email: Option<String>,
    pub proposal_number: String,
    pub proposal_date: NaiveDate,
}

impl From<&Proposal> for QuoteHeader {
    fn from(proposal: &Proposal) -> Self {
        Self {
            client_name: proposal.client_name.clone(),
            client_email: proposal.client_email.clone(),
            proposal_number: proposal.proposal_number.clone(),
            proposal_date: proposal.proposal_date,
        }
    }
}

/// Writes a plain-text quote with the same line items as the printed proposal.
pub struct QuoteRenderer<'a, W: Write> {
    writer: W,
    catalog: &'a Catalog,
}

impl<'a, W: Write> QuoteRenderer<'a, W> {
    pub fn new(writer: W, catalog: &'a Catalog) -> Self {
        Self { writer, catalog }
    }

    pub fn render(
        &mut self,
        header: Option<&QuoteHeader>,
        selection: &Selection,
        breakdown: &PriceBreakdown,
    ) -> io::Result<()> {
        writeln!(self.writer, "{}", BUSINESS_NAME)?;
        writeln!(self.writer, "{}", TAGLINE)?;
        writeln!(self.writer)?;

        if let Some(header) = header {
            match &header.client_email {
                Some(email) => writeln!(
                    self.writer,
                    "Prepared For: {} <{}>",
                    header.client_name, email
                )?,
                None => writeln!(self.writer, "Prepared For: {}", header.client_name)?,
            }
            writeln!(self.writer, "Proposal: #{}", header.proposal_number)?;
            writeln!(self.writer, "Date: {}", format_date(header.proposal_date))?;
            writeln!(self.writer)?;
        }

        self.render_program(selection, breakdown)?;
        self.render_breakdown(breakdown)?;

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Payment details and terms will be provided upon acceptance."
        )?;
        self.writer.flush()
    }

    fn render_program(&mut self, selection: &Selection, breakdown: &PriceBreakdown) -> io::Result<()> {
        let catalog = self.catalog;
        let label = catalog
            .program(selection.program_type)
            .map(|program| program.label.as_str())
            .unwrap_or_else(|| selection.program_type.as_str());
        if selection.friends_and_family {
            writeln!(self.writer, "{} [F&F]", label)?;
        } else {
            writeln!(self.writer, "{}", label)?;
        }

        if !breakdown.tier_name.is_empty() {
            self.line(&breakdown.tier_name, &per_month(breakdown.base_tier_price))?;
            writeln!(self.writer, "  {}", breakdown.tier_description)?;
            if let Some(tier) = catalog.tier(selection.program_type, &selection.selected_tier_id)
            {
                for feature in &tier.features {
                    writeln!(self.writer, "  * {}", feature)?;
                }
            }
        }

        if breakdown.in_person_sessions > 0 {
            self.line(
                "In-Person Training Sessions",
                &per_month(breakdown.in_person_sessions_price),
            )?;
            writeln!(
                self.writer,
                "  {} at {} each",
                catalog.session_label(breakdown.in_person_sessions),
                format_currency(Money::new(
                    breakdown.in_person_sessions_price.value()
                        / Decimal::from(breakdown.in_person_sessions)
                ))
            )?;
        }
        writeln!(self.writer)
    }

    fn render_breakdown(&mut self, breakdown: &PriceBreakdown) -> io::Result<()> {
        writeln!(self.writer, "Price Breakdown")?;
        self.line(
            &format!("{} (Online Coaching)", breakdown.tier_name),
            &per_month(breakdown.base_tier_price),
        )?;

        if breakdown.friends_and_family_discount > Money::ZERO {
            let rate = breakdown.friends_and_family_discount.value() / breakdown.base_tier_price.value();
            let percent = (rate * Decimal::ONE_HUNDRED).round_dp(2).normalize();
            self.line(
                &format!("Friends & Family Discount ({}%)", percent),
                &discount(breakdown.friends_and_family_discount),
            )?;
        }

        if breakdown.commitment_discount > Money::ZERO {
            self.line(
                &format!("{}-Month Commitment Discount", breakdown.commitment_months),
                &discount(breakdown.commitment_discount),
            )?;
        }

        if breakdown.in_person_sessions > 0 {
            self.line(
                &format!("In-Person Sessions ({}/mo)", breakdown.in_person_sessions),
                &per_month(breakdown.in_person_sessions_price),
            )?;
        }

        if !breakdown.add_ons.is_empty() {
            writeln!(self.writer, "Add-Ons")?;
            for add_on in &breakdown.add_ons {
                let (label, value) = if add_on.is_one_time {
                    (format!("{} (one-time)", add_on.name), format_currency(add_on.price))
                } else {
                    (add_on.name.clone(), per_month(add_on.price))
                };
                self.line(&label, &value)?;
            }
        }

        writeln!(self.writer, "{}", "-".repeat(LABEL_WIDTH + VALUE_WIDTH))?;
        self.line("Monthly Total", &format_currency(breakdown.monthly_total))?;
        self.line(
            &format!("{}-Month Commitment Total", breakdown.commitment_months),
            &format_currency(breakdown.full_commitment_total),
        )?;
        self.line(
            &format!(
                "Due on Signing ({}-Month Minimum)",
                self.catalog.minimum_billing_months
            ),
            &format_currency(breakdown.due_on_signing),
        )
    }

    fn line(&mut self, label: &str, value: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "{:<label_width$}{:>value_width$}",
            label,
            value,
            label_width = LABEL_WIDTH,
            value_width = VALUE_WIDTH
        )
    }
}

fn per_month(amount: Money) -> String {
    format!("{}/mo", format_currency(amount))
}

fn discount(amount: Money) -> String {
    format!("-{}", format_currency(amount))
}
