//! Instruments shown on the dashboard, each paired with the sample values
//! displayed when live data is not available.

use crate::market::types::{Lookback, PricePoint, Quote};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    pub name: &'static str,
    pub symbol: &'static str,
    pub fallback: FallbackQuote,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackQuote {
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl FallbackQuote {
    pub const fn new(price: f64, change: f64, change_pct: f64) -> Self {
        Self {
            price,
            change,
            change_pct,
        }
    }

    /// Sample entry where only the percent move is known.
    pub fn from_pct(price: f64, change_pct: f64) -> Self {
        let previous = price / (1.0 + change_pct / 100.0);
        Self {
            price,
            change: round2(price - previous),
            change_pct,
        }
    }

    pub fn quote(&self) -> Quote {
        Quote::from_literals(self.price, self.change, self.change_pct)
    }
}

pub const NIFTY_50: Instrument = Instrument {
    name: "NIFTY 50",
    symbol: "^NSEI",
    fallback: FallbackQuote::new(19845.0, 125.0, 0.64),
};

pub const INDICES: [Instrument; 4] = [
    NIFTY_50,
    Instrument {
        name: "SENSEX",
        symbol: "^BSESN",
        fallback: FallbackQuote::new(66590.0, 234.0, 0.35),
    },
    Instrument {
        name: "BANK NIFTY",
        symbol: "^NSEBANK",
        fallback: FallbackQuote::new(45235.0, -89.0, -0.20),
    },
    Instrument {
        name: "NIFTY IT",
        symbol: "^CNXIT",
        fallback: FallbackQuote::new(29876.0, 157.0, 0.53),
    },
];

pub fn gainers() -> Vec<Instrument> {
    [
        ("RELIANCE", "RELIANCE.NS", 2485.0, 2.3),
        ("TCS", "TCS.NS", 3654.0, 1.8),
        ("HDFC BANK", "HDFCBANK.NS", 1590.0, 1.2),
    ]
    .into_iter()
    .map(|(name, symbol, price, pct)| Instrument {
        name,
        symbol,
        fallback: FallbackQuote::from_pct(price, pct),
    })
    .collect()
}

/// Stock used by the canned analysis on the assistant surface.
pub fn analysis_stock() -> Instrument {
    Instrument {
        name: "HDFC Bank",
        symbol: "HDFCBANK.NS",
        fallback: FallbackQuote::from_pct(1589.0, 0.8),
    }
}

const HISTORY_START: (i32, u32, u32) = (2024, 2, 21);
const HISTORY_DAYS: i64 = 183;
const HISTORY_BASE: f64 = 19_000.0;

/// Deterministic daily sample series for the index chart.
///
/// A slow upward drift with a weekly wobble, so the chart has shape without
/// pretending to be real prices.
pub fn sample_history(lookback: Lookback) -> Vec<PricePoint> {
    let (y, m, d) = HISTORY_START;
    let Some(start) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Vec::new();
    };

    let days = match lookback {
        Lookback::TwoDays => 2,
        Lookback::FiveDays => 5,
        Lookback::OneMonth => 31,
        Lookback::SixMonths => HISTORY_DAYS,
    };

    let first = HISTORY_DAYS - days;
    (first..HISTORY_DAYS)
        .map(|i| {
            let t = i as f64;
            let close = HISTORY_BASE + t * 4.5 + (t / 7.0 * std::f64::consts::TAU).sin() * 120.0;
            PricePoint {
                date: start + Duration::days(i),
                close: round2(close),
            }
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
