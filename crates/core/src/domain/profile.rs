use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const AGE_RANGE: RangeInclusive<i64> = 18..=65;
pub const INCOME_RANGE: RangeInclusive<i64> = 20_000..=1_000_000;
pub const EXPENSES_RANGE: RangeInclusive<i64> = 10_000..=500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RiskTier {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [
        RiskTier::Conservative,
        RiskTier::Moderate,
        RiskTier::Aggressive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Conservative => "Conservative",
            RiskTier::Moderate => "Moderate",
            RiskTier::Aggressive => "Aggressive",
        }
    }

    /// Share of the monthly surplus that goes to equity.
    pub fn equity_pct(self) -> u8 {
        match self {
            RiskTier::Conservative => 40,
            RiskTier::Moderate => 60,
            RiskTier::Aggressive => 80,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RiskTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownRiskTier(s.to_string()))
    }
}

impl TryFrom<String> for RiskTier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RiskTier> for String {
    fn from(value: RiskTier) -> Self {
        value.as_str().to_string()
    }
}

/// Monthly figures are whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub age: i64,
    pub monthly_income: i64,
    pub monthly_expenses: i64,
    pub risk: RiskTier,
}

impl Default for FinancialProfile {
    fn default() -> Self {
        Self {
            age: 30,
            monthly_income: 75_000,
            monthly_expenses: 45_000,
            risk: RiskTier::Moderate,
        }
    }
}

impl FinancialProfile {
    pub fn new(
        age: i64,
        monthly_income: i64,
        monthly_expenses: i64,
        risk: RiskTier,
    ) -> Result<Self, ValidationError> {
        let profile = Self {
            age,
            monthly_income,
            monthly_expenses,
            risk,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("age", AGE_RANGE, self.age)?;
        check_range("monthly_income", INCOME_RANGE, self.monthly_income)?;
        check_range("monthly_expenses", EXPENSES_RANGE, self.monthly_expenses)?;
        Ok(())
    }

    /// Income minus expenses; negative when the profile overspends.
    pub fn surplus(&self) -> i64 {
        self.monthly_income.saturating_sub(self.monthly_expenses)
    }
}

fn check_range(
    field: &'static str,
    range: RangeInclusive<i64>,
    value: i64,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        field,
        min: *range.start(),
        max: *range.end(),
        value,
    })
}
