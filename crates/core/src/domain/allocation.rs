use crate::domain::profile::{FinancialProfile, RiskTier};
use serde::{Deserialize, Serialize};

pub const EXPECTED_RETURN_BAND: &str = "12-14%";

// Corpus shorthand shown next to the plan: contributions over ten years, doubled.
const CORPUS_YEARS: i64 = 10;
const CORPUS_GROWTH_MULTIPLIER: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSuggestion {
    pub category: String,
    pub fund: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub risk: RiskTier,
    pub monthly_surplus: i64,
    pub equity_pct: u8,
    pub debt_pct: u8,
    pub equity_amount: i64,
    pub debt_amount: i64,
    pub expected_return: String,
    /// `None` when the projection does not fit in an `i64`.
    pub ten_year_corpus: Option<i64>,
    pub funds: Vec<FundSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    Allocated(AllocationPlan),
    NoSurplus { surplus: i64 },
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&AllocationPlan> {
        match self {
            PlanOutcome::Allocated(plan) => Some(plan),
            PlanOutcome::NoSurplus { .. } => None,
        }
    }
}

/// Splits a positive surplus between equity and debt.
///
/// Returns `None` when there is nothing to invest. The equity leg is floored
/// and debt takes the remainder, so both legs always add back to `surplus`.
pub fn allocate(risk: RiskTier, surplus: i64) -> Option<AllocationPlan> {
    if surplus <= 0 {
        return None;
    }

    let equity_pct = risk.equity_pct();
    let equity_amount = equity_leg(surplus, equity_pct);
    let debt_amount = surplus - equity_amount;

    Some(AllocationPlan {
        risk,
        monthly_surplus: surplus,
        equity_pct,
        debt_pct: 100 - equity_pct,
        equity_amount,
        debt_amount,
        expected_return: EXPECTED_RETURN_BAND.to_string(),
        ten_year_corpus: ten_year_corpus(surplus),
        funds: default_funds(),
    })
}

// surplus > 0, so integer division is a floor. Widened so the product cannot
// overflow; the result is at most `surplus` and always narrows back.
fn equity_leg(surplus: i64, equity_pct: u8) -> i64 {
    let amount = i128::from(surplus) * i128::from(equity_pct) / 100;
    i64::try_from(amount).unwrap_or(surplus)
}

fn ten_year_corpus(surplus: i64) -> Option<i64> {
    surplus
        .checked_mul(12 * CORPUS_YEARS)?
        .checked_mul(CORPUS_GROWTH_MULTIPLIER)
}

pub fn plan_for(profile: &FinancialProfile) -> PlanOutcome {
    let surplus = profile.surplus();
    match allocate(profile.risk, surplus) {
        Some(plan) => PlanOutcome::Allocated(plan),
        None => {
            tracing::debug!(surplus, "no investable surplus; skipping allocation");
            PlanOutcome::NoSurplus { surplus }
        }
    }
}

fn default_funds() -> Vec<FundSuggestion> {
    [
        ("Large Cap", "HDFC Top 100 Fund"),
        ("Multi Cap", "Parag Parikh Flexi Cap"),
        ("ELSS", "Axis Long Term Equity"),
    ]
    .into_iter()
    .map(|(category, fund)| FundSuggestion {
        category: category.to_string(),
        fund: fund.to_string(),
    })
    .collect()
}
