use crate::market::catalog::{self, NIFTY_50};
use crate::market::fetch::QuoteService;
use crate::market::types::{DataSource, HistoryView, Lookback, QuoteView};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorMove {
    pub sector: String,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSentiment {
    pub positive: Vec<SectorMove>,
    pub negative: Vec<SectorMove>,
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDashboard {
    pub indices: Vec<QuoteView>,
    pub gainers: Vec<QuoteView>,
    pub history: HistoryView,
    pub sentiment: MarketSentiment,
}

impl MarketDashboard {
    /// True when at least one figure on the page is sample data.
    pub fn has_sample_data(&self) -> bool {
        self.indices
            .iter()
            .chain(&self.gainers)
            .any(|v| v.source.is_sample())
            || self.history.source.is_sample()
            || self.sentiment.source.is_sample()
    }
}

pub async fn indices(quotes: &QuoteService) -> Vec<QuoteView> {
    quotes.quote_views(&catalog::INDICES).await
}

/// Catalog stocks ranked by percent move, largest first.
pub async fn top_gainers(quotes: &QuoteService) -> Vec<QuoteView> {
    let mut views = quotes.quote_views(&catalog::gainers()).await;
    views.sort_by(|a, b| match (a.quote.change_pct, b.quote.change_pct) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    views
}

pub async fn index_history(quotes: &QuoteService, lookback: Lookback) -> HistoryView {
    quotes.history_view(&NIFTY_50, lookback).await
}

pub fn sentiment() -> MarketSentiment {
    let moves = |items: &[(&str, f64)]| {
        items
            .iter()
            .map(|(sector, change_pct)| SectorMove {
                sector: sector.to_string(),
                change_pct: *change_pct,
            })
            .collect::<Vec<_>>()
    };

    MarketSentiment {
        positive: moves(&[("Banking", 1.2), ("IT Services", 0.8)]),
        negative: moves(&[("Pharma", -0.5), ("FMCG", -0.3)]),
        source: DataSource::Sample,
    }
}

pub async fn build(quotes: &QuoteService) -> MarketDashboard {
    let indices = indices(quotes).await;
    let gainers = top_gainers(quotes).await;
    let history = index_history(quotes, Lookback::SixMonths).await;

    let dashboard = MarketDashboard {
        indices,
        gainers,
        history,
        sentiment: sentiment(),
    };
    tracing::debug!(
        live = quotes.is_live(),
        sample = dashboard.has_sample_data(),
        "market dashboard built"
    );
    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::fetch::tests::FakeMarket;
    use std::sync::Arc;

    #[tokio::test]
    async fn offline_dashboard_is_all_sample() {
        let dash = build(&QuoteService::sample_only()).await;
        assert_eq!(dash.indices.len(), 4);
        assert_eq!(dash.indices[0].name, "NIFTY 50");
        assert_eq!(dash.indices[0].quote.current, 19845.0);
        assert_eq!(dash.indices[0].quote.change, 125.0);
        assert_eq!(dash.indices[0].quote.change_pct, Some(0.64));
        assert!(dash.indices.iter().all(|v| v.source == DataSource::Sample));
        assert_eq!(dash.history.points.len(), 183);
        assert!(dash.has_sample_data());
    }

    #[tokio::test]
    async fn gainers_sorted_by_pct_descending() {
        // TCS live at +5%, the rest fall back (+2.3%, +1.2%).
        let fake = FakeMarket::default().with("TCS.NS", &[3500.0, 3675.0]);
        let quotes = QuoteService::new(Some(Arc::new(fake)));
        let gainers = top_gainers(&quotes).await;
        let names: Vec<_> = gainers.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["TCS", "RELIANCE", "HDFC BANK"]);
        assert_eq!(gainers[0].source, DataSource::Live);
    }

    #[tokio::test]
    async fn undefined_pct_sorts_last() {
        let fake = FakeMarket::default().with("RELIANCE.NS", &[0.0, 2500.0]);
        let quotes = QuoteService::new(Some(Arc::new(fake)));
        let gainers = top_gainers(&quotes).await;
        assert_eq!(gainers.last().unwrap().name, "RELIANCE");
        assert_eq!(gainers.last().unwrap().quote.change_pct, None);
    }

    #[test]
    fn sentiment_is_flagged_sample() {
        let s = sentiment();
        assert_eq!(s.positive[0].sector, "Banking");
        assert_eq!(s.negative.len(), 2);
        assert!(s.source.is_sample());
    }
}
