use super::catalog::Catalog;
use super::money::Money;
use super::proposal::PriceSnapshot;
use super::selection::Selection;
use crate::error::{ProposalError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An add-on as it appears on a quote.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AddOnLine {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub is_one_time: bool,
}

/// Itemized price of a [`Selection`].
///
/// Carries every intermediate amount, not only the totals, so that every
/// renderer shows the same line items from the same value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PriceBreakdown {
    pub base_tier_price: Money,
    pub tier_name: String,
    pub tier_description: String,

    pub in_person_sessions: u32,
    /// Monthly cost of in-person sessions. Never discounted.
    pub in_person_sessions_price: Money,
    pub sessions_per_week: Decimal,

    // Discounts only ever apply to the tier price.
    pub friends_and_family_discount: Money,
    pub after_family_discount: Money,
    pub commitment_discount: Money,
    pub discounted_tier_price: Money,

    pub add_ons: Vec<AddOnLine>,
    pub monthly_add_ons_total: Money,
    pub one_time_add_ons_total: Money,

    pub monthly_total: Money,
    pub commitment_months: u32,
    pub full_commitment_total: Money,
    pub due_on_signing: Money,
}

impl PriceBreakdown {
    /// The breakdown of a selection whose tier could not be found.
    pub fn zeroed(commitment_months: u32) -> Self {
        Self {
            commitment_months,
            ..Self::default()
        }
    }

    /// Rebuilds a breakdown from stored amounts. Only the add-on lines come
    /// from outside the snapshot.
    pub fn from_snapshot(snapshot: &PriceSnapshot, add_ons: Vec<AddOnLine>) -> Self {
        Self {
            base_tier_price: snapshot.base_tier_price,
            tier_name: snapshot.tier_name.clone(),
            tier_description: snapshot.tier_description.clone(),
            in_person_sessions: snapshot.in_person_sessions,
            in_person_sessions_price: snapshot.in_person_sessions_price,
            sessions_per_week: snapshot.sessions_per_week,
            friends_and_family_discount: snapshot.friends_and_family_discount,
            after_family_discount: snapshot.after_family_discount,
            commitment_discount: snapshot.commitment_discount,
            discounted_tier_price: snapshot.discounted_tier_price,
            add_ons,
            monthly_add_ons_total: snapshot.monthly_add_ons_total,
            one_time_add_ons_total: snapshot.one_time_add_ons_total,
            monthly_total: snapshot.monthly_total,
            commitment_months: snapshot.commitment_months,
            full_commitment_total: snapshot.full_commitment_total,
            due_on_signing: snapshot.due_on_signing,
        }
    }
}

/// The selected add-ons that exist in the catalog, in catalog order.
pub fn add_on_lines(selection: &Selection, catalog: &Catalog) -> Vec<AddOnLine> {
    catalog
        .add_ons
        .iter()
        .filter(|add_on| selection.selected_add_ons.contains(&add_on.id))
        .map(|add_on| AddOnLine {
            id: add_on.id.clone(),
            name: add_on.name.clone(),
            price: add_on.price,
            is_one_time: add_on.is_one_time,
        })
        .collect()
}

/// Prices a selection against a catalog.
///
/// An unknown tier yields [`PriceBreakdown::zeroed`] rather than an error, and
/// unknown add-on ids are ignored. A commitment length that is not in the
/// catalog's discount table is a configuration error.
pub fn compute_breakdown(selection: &Selection, catalog: &Catalog) -> Result<PriceBreakdown> {
    let Some(tier) = catalog.tier(selection.program_type, &selection.selected_tier_id) else {
        return Ok(PriceBreakdown::zeroed(selection.commitment_length));
    };

    let base_tier_price = tier.price;

    let in_person_sessions = selection.in_person_sessions;
    let in_person_sessions_price = catalog.session_unit_price * in_person_sessions;
    let sessions_per_week = Decimal::from(in_person_sessions) / Decimal::from(4);

    let friends_and_family_discount = if selection.friends_and_family {
        base_tier_price.percentage(catalog.friends_and_family_rate)
    } else {
        Money::ZERO
    };
    let after_family_discount = base_tier_price - friends_and_family_discount;

    let commitment_discount = catalog
        .commitment_discount(selection.commitment_length)
        .ok_or(ProposalError::UnsupportedCommitment(
            selection.commitment_length,
        ))?;
    // Floor once, after both discounts.
    let discounted_tier_price = (after_family_discount - commitment_discount).floor_at_zero();

    let add_ons = add_on_lines(selection, catalog);

    let monthly_add_ons_total: Money = add_ons
        .iter()
        .filter(|line| !line.is_one_time)
        .map(|line| line.price)
        .sum();
    let one_time_add_ons_total: Money = add_ons
        .iter()
        .filter(|line| line.is_one_time)
        .map(|line| line.price)
        .sum();

    let monthly_total = discounted_tier_price + in_person_sessions_price + monthly_add_ons_total;
    let full_commitment_total =
        monthly_total * selection.commitment_length + one_time_add_ons_total;
    let due_on_signing = monthly_total * catalog.minimum_billing_months + one_time_add_ons_total;

    Ok(PriceBreakdown {
        base_tier_price,
        tier_name: tier.name.clone(),
        tier_description: tier.description.clone(),
        in_person_sessions,
        in_person_sessions_price,
        sessions_per_week,
        friends_and_family_discount,
        after_family_discount,
        commitment_discount,
        discounted_tier_price,
        add_ons,
        monthly_add_ons_total,
        one_time_add_ons_total,
        monthly_total,
        commitment_months: selection.commitment_length,
        full_commitment_total,
        due_on_signing,
    })
}
