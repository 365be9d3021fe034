use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookback {
    #[serde(rename = "2d")]
    TwoDays,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
}

impl Lookback {
    /// Range token understood by the chart endpoint.
    pub fn as_range(self) -> &'static str {
        match self {
            Lookback::TwoDays => "2d",
            Lookback::FiveDays => "5d",
            Lookback::OneMonth => "1mo",
            Lookback::SixMonths => "6mo",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for Lookback {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2d" => Ok(Lookback::TwoDays),
            "5d" => Ok(Lookback::FiveDays),
            "1mo" => Ok(Lookback::OneMonth),
            "6mo" => Ok(Lookback::SixMonths),
            other => anyhow::bail!("unsupported lookback: {other:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Provider symbol including its market suffix, e.g. `RELIANCE.NS`.
    pub symbol: String,
    pub lookback: Lookback,
}

impl QuoteRequest {
    pub fn new(symbol: impl Into<String>, lookback: Lookback) -> Self {
        Self {
            symbol: symbol.into(),
            lookback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// `None` when the previous close is zero or negative.
    pub change_pct: Option<f64>,
}

impl Quote {
    pub fn from_closes(current: f64, previous: f64) -> Self {
        let change = current - previous;
        let change_pct = (previous > 0.0).then(|| change / previous * 100.0);
        Self {
            current,
            previous,
            change,
            change_pct,
        }
    }

    /// Builds a quote from pre-computed display literals.
    pub fn from_literals(current: f64, change: f64, change_pct: f64) -> Self {
        Self {
            current,
            previous: current - change,
            change,
            change_pct: Some(change_pct),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Sample,
}

impl DataSource {
    pub fn is_sample(self) -> bool {
        matches!(self, DataSource::Sample)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteView {
    pub name: String,
    pub symbol: String,
    pub quote: Quote,
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceView {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryView {
    pub name: String,
    pub symbol: String,
    pub lookback: Lookback,
    pub points: Vec<PricePoint>,
    pub source: DataSource,
}
