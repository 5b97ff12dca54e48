use super::money::Money;
use crate::error::{ProposalError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramType {
    FatLoss,
    MuscleBuilding,
}

impl ProgramType {
    pub const ALL: [ProgramType; 2] = [ProgramType::FatLoss, ProgramType::MuscleBuilding];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::FatLoss => "fat-loss",
            ProgramType::MuscleBuilding => "muscle-building",
        }
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgramType {
    type Err = ProposalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fat-loss" => Ok(ProgramType::FatLoss),
            "muscle-building" => Ok(ProgramType::MuscleBuilding),
            other => Err(ProposalError::ValidationError(format!(
                "unknown program type '{}'",
                other
            ))),
        }
    }
}

/// A monthly coaching level within a program.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Tier {
    pub id: String,
    pub name: String,
    /// Monthly price before any discount.
    pub price: Money,
    pub description: String,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Program {
    pub program_type: ProgramType,
    pub label: String,
    /// Ordered from the cheapest tier to the most expensive one.
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub description: String,
    /// Billed once instead of every month.
    pub is_one_time: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SessionOption {
    pub label: String,
    #[serde(default)]
    pub per_week: String,
}

/// Everything the pricing engine needs to know about what is for sale.
///
/// Built once at startup (either [`Catalog::standard`] or a JSON file, see
/// [`crate::config`]) and shared read-only afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Catalog {
    pub programs: Vec<Program>,
    pub add_ons: Vec<AddOn>,
    /// Flat monthly discount on the tier price, keyed by commitment months.
    pub commitment_discounts: BTreeMap<u32, Money>,
    /// Allowed in-person session counts per month.
    pub session_options: BTreeMap<u32, SessionOption>,
    pub session_unit_price: Money,
    pub friends_and_family_rate: Decimal,
    /// Months billed up front regardless of the commitment length.
    pub minimum_billing_months: u32,
}

impl Catalog {
    pub fn program(&self, program_type: ProgramType) -> Option<&Program> {
        self.programs
            .iter()
            .find(|program| program.program_type == program_type)
    }

    pub fn tiers_for(&self, program_type: ProgramType) -> &[Tier] {
        self.program(program_type)
            .map(|program| program.tiers.as_slice())
            .unwrap_or_default()
    }

    pub fn tier(&self, program_type: ProgramType, tier_id: &str) -> Option<&Tier> {
        self.tiers_for(program_type)
            .iter()
            .find(|tier| tier.id == tier_id)
    }

    /// The entry-level tier of a program.
    pub fn default_tier(&self, program_type: ProgramType) -> Option<&Tier> {
        self.tiers_for(program_type).first()
    }

    pub fn add_on(&self, add_on_id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == add_on_id)
    }

    pub fn commitment_discount(&self, months: u32) -> Option<Money> {
        self.commitment_discounts.get(&months).copied()
    }

    pub fn shortest_commitment(&self) -> Option<u32> {
        self.commitment_discounts.keys().next().copied()
    }

    pub fn session_label(&self, sessions_per_month: u32) -> String {
        match self.session_options.get(&sessions_per_month) {
            Some(option) if !option.per_week.is_empty() => {
                format!("{} sessions/mo {}", sessions_per_month, option.per_week)
            }
            _ => format!("{} sessions/month", sessions_per_month),
        }
    }

    /// Checks the invariants the pricing engine relies on.
    pub fn validate(&self) -> Result<()> {
        for program_type in ProgramType::ALL {
            let program = self.program(program_type).ok_or_else(|| {
                ProposalError::CatalogError(format!("program '{}' is missing", program_type))
            })?;
            if program.tiers.is_empty() {
                return Err(ProposalError::CatalogError(format!(
                    "program '{}' has no tiers",
                    program_type
                )));
            }
            let mut seen = HashSet::new();
            for tier in &program.tiers {
                if !seen.insert(tier.id.as_str()) {
                    return Err(ProposalError::CatalogError(format!(
                        "duplicate tier id '{}' in program '{}'",
                        tier.id, program_type
                    )));
                }
                Money::price(tier.price.value())?;
            }
        }

        let mut seen = HashSet::new();
        for add_on in &self.add_ons {
            if !seen.insert(add_on.id.as_str()) {
                return Err(ProposalError::CatalogError(format!(
                    "duplicate add-on id '{}'",
                    add_on.id
                )));
            }
            Money::price(add_on.price.value())?;
        }

        let (shortest, discount) = self
            .commitment_discounts
            .iter()
            .next()
            .ok_or_else(|| ProposalError::CatalogError("no commitment lengths".to_string()))?;
        if !discount.is_zero() {
            return Err(ProposalError::CatalogError(format!(
                "shortest commitment ({} months) must have no discount",
                shortest
            )));
        }
        for discount in self.commitment_discounts.values() {
            Money::price(discount.value())?;
        }

        if !self.session_options.contains_key(&0) {
            return Err(ProposalError::CatalogError(
                "session options must include 0".to_string(),
            ));
        }
        Money::price(self.session_unit_price.value())?;

        if self.friends_and_family_rate < Decimal::ZERO || self.friends_and_family_rate >= Decimal::ONE
        {
            return Err(ProposalError::CatalogError(format!(
                "friends and family rate must be in [0, 1), got {}",
                self.friends_and_family_rate
            )));
        }

        if self.minimum_billing_months == 0 || self.minimum_billing_months > *shortest {
            return Err(ProposalError::CatalogError(format!(
                "minimum billing months must be between 1 and {}, got {}",
                shortest, self.minimum_billing_months
            )));
        }

        Ok(())
    }

    /// The catalog currently offered by the business.
    pub fn standard() -> Self {
        // Features are cumulative: each tier lists everything below it too.
        let fat_loss = Program {
            program_type: ProgramType::FatLoss,
            label: "Fat Loss Track".to_string(),
            tiers: vec![
                tier(
                    "fat-loss-kickstart",
                    "Kickstart",
                    dec!(250),
                    "Custom fat loss program, app access, bi-monthly check-in",
                    &[
                        "Custom fat loss program",
                        "Everfit app access",
                        "Bi-monthly check-in call",
                    ],
                ),
                tier(
                    "fat-loss-accelerate",
                    "Accelerate",
                    dec!(350),
                    "Weekly check-in calls, nutrition guidelines, cardio protocols",
                    &[
                        "Custom fat loss program",
                        "Everfit app access",
                        "Weekly check-in call (1x/week)",
                        "Nutrition guidelines",
                        "Cardio protocols",
                    ],
                ),
                tier(
                    "fat-loss-transformation",
                    "Total Transformation",
                    dec!(500),
                    "Premium coaching with 2x weekly calls, meal plans, unlimited support",
                    &[
                        "Custom fat loss program",
                        "Everfit app access",
                        "Check-in calls (2x/week)",
                        "Nutrition guidelines",
                        "Cardio protocols",
                        "Custom meal plans",
                        "Unlimited messaging",
                        "Bi-weekly form reviews",
                    ],
                ),
            ],
        };

        let muscle_building = Program {
            program_type: ProgramType::MuscleBuilding,
            label: "Muscle Building Track".to_string(),
            tiers: vec![
                tier(
                    "muscle-foundation",
                    "Foundation",
                    dec!(250),
                    "Custom hypertrophy program, app access, bi-monthly check-in",
                    &[
                        "Custom hypertrophy program",
                        "Everfit app access",
                        "Bi-monthly check-in call",
                    ],
                ),
                tier(
                    "muscle-growth",
                    "Growth",
                    dec!(350),
                    "Weekly check-in calls, bulking nutrition guidelines, progressive overload tracking",
                    &[
                        "Custom hypertrophy program",
                        "Everfit app access",
                        "Weekly check-in call (1x/week)",
                        "Bulking nutrition guidelines",
                        "Progressive overload tracking",
                    ],
                ),
                tier(
                    "muscle-maximum",
                    "Maximum Gains",
                    dec!(500),
                    "Premium coaching with 2x weekly calls, meal plans, unlimited support",
                    &[
                        "Custom hypertrophy program",
                        "Everfit app access",
                        "Check-in calls (2x/week)",
                        "Bulking nutrition guidelines",
                        "Progressive overload tracking",
                        "Custom meal plans",
                        "Unlimited messaging",
                        "Bi-weekly form reviews",
                    ],
                ),
            ],
        };

        let add_ons = vec![
            add_on(
                "single-session",
                "Single Training Session",
                dec!(75),
                "One additional in-person training session",
            ),
            add_on(
                "nutrition-deep-dive",
                "Nutrition Deep Dive",
                dec!(150),
                "1-hour nutrition consultation",
            ),
            add_on(
                "meal-prep-guide",
                "Custom Meal Prep Guide",
                dec!(100),
                "AI-generated custom meal prep guide",
            ),
        ];

        let commitment_discounts = BTreeMap::from([
            (3, Money::ZERO),
            (6, Money::new(dec!(25))),
            (12, Money::new(dec!(50))),
        ]);

        let session_options = [
            (0, "No in-person sessions", ""),
            (2, "2 sessions/month", "(~1 per week)"),
            (4, "4 sessions/month", "(1 per week)"),
            (6, "6 sessions/month", "(~1.5 per week)"),
            (8, "8 sessions/month", "(2 per week)"),
            (10, "10 sessions/month", "(~2.5 per week)"),
            (12, "12 sessions/month", "(3 per week)"),
        ]
        .into_iter()
        .map(|(count, label, per_week)| {
            (
                count,
                SessionOption {
                    label: label.to_string(),
                    per_week: per_week.to_string(),
                },
            )
        })
        .collect();

        Self {
            programs: vec![fat_loss, muscle_building],
            add_ons,
            commitment_discounts,
            session_options,
            session_unit_price: Money::new(dec!(60)),
            friends_and_family_rate: dec!(0.30),
            minimum_billing_months: 3,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn tier(id: &str, name: &str, price: Decimal, description: &str, features: &[&str]) -> Tier {
    Tier {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::new(price),
        description: description.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

fn add_on(id: &str, name: &str, price: Decimal, description: &str) -> AddOn {
    AddOn {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::new(price),
        description: description.to_string(),
        is_one_time: true,
    }
}
