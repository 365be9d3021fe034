use crate::config::Settings;
use crate::market::catalog::{self, Instrument};
use crate::market::provider::{MarketDataClient, YahooChartClient};
use crate::market::types::{
    DataSource, HistoryView, Lookback, PricePoint, PriceView, Quote, QuoteRequest, QuoteView,
};
use std::sync::Arc;

/// Result of a single live lookup. The caller decides what to show instead
/// when the data is not there.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ok(T),
    Unavailable(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchOutcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            FetchOutcome::Ok(v) => Some(v),
            FetchOutcome::Unavailable(_) => None,
        }
    }
}

/// Quote lookups that never fail the caller. One instance serves both the
/// live and the sample-only modes; without a client every lookup is
/// `Unavailable` and falls back.
#[derive(Clone, Default)]
pub struct QuoteService {
    client: Option<Arc<dyn MarketDataClient>>,
}

impl std::fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteService")
            .field("provider", &self.client.as_ref().map(|c| c.provider_name()))
            .finish()
    }
}

impl QuoteService {
    pub fn new(client: Option<Arc<dyn MarketDataClient>>) -> Self {
        Self { client }
    }

    pub fn sample_only() -> Self {
        Self { client: None }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        if !settings.market_data_live {
            tracing::info!("live market data disabled; serving sample quotes");
            return Ok(Self::sample_only());
        }
        let client = YahooChartClient::from_settings(settings)?;
        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn is_live(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_series(
        &self,
        req: &QuoteRequest,
        min_points: usize,
    ) -> FetchOutcome<Vec<PricePoint>> {
        let Some(client) = &self.client else {
            return FetchOutcome::Unavailable("live market data disabled".to_string());
        };

        match client.fetch_closes(req).await {
            Ok(points) if points.len() >= min_points => FetchOutcome::Ok(points),
            Ok(points) => FetchOutcome::Unavailable(format!(
                "{} returned {} data point(s), need {min_points}",
                req.symbol,
                points.len()
            )),
            Err(err) => FetchOutcome::Unavailable(format!("{err:#}")),
        }
    }

    /// Latest close vs the one before it.
    pub async fn fetch_change(&self, req: &QuoteRequest) -> FetchOutcome<Quote> {
        match self.fetch_series(req, 2).await {
            FetchOutcome::Ok(points) => {
                let n = points.len();
                FetchOutcome::Ok(Quote::from_closes(points[n - 1].close, points[n - 2].close))
            }
            FetchOutcome::Unavailable(reason) => FetchOutcome::Unavailable(reason),
        }
    }

    pub async fn fetch_last_price(&self, req: &QuoteRequest) -> FetchOutcome<f64> {
        match self.fetch_series(req, 1).await {
            FetchOutcome::Ok(points) => match points.last() {
                Some(p) => FetchOutcome::Ok(p.close),
                None => FetchOutcome::Unavailable(format!("{} returned no data", req.symbol)),
            },
            FetchOutcome::Unavailable(reason) => FetchOutcome::Unavailable(reason),
        }
    }

    pub async fn quote_view(&self, instrument: &Instrument) -> QuoteView {
        let req = QuoteRequest::new(instrument.symbol, Lookback::FiveDays);
        let (quote, source) = match self.fetch_change(&req).await {
            FetchOutcome::Ok(q) => (q, DataSource::Live),
            FetchOutcome::Unavailable(reason) => {
                log_fallback(instrument, &reason);
                (instrument.fallback.quote(), DataSource::Sample)
            }
        };

        QuoteView {
            name: instrument.name.to_string(),
            symbol: instrument.symbol.to_string(),
            quote,
            source,
        }
    }

    pub async fn price_view(&self, instrument: &Instrument) -> PriceView {
        let req = QuoteRequest::new(instrument.symbol, Lookback::TwoDays);
        let (price, source) = match self.fetch_last_price(&req).await {
            FetchOutcome::Ok(p) => (p, DataSource::Live),
            FetchOutcome::Unavailable(reason) => {
                log_fallback(instrument, &reason);
                (instrument.fallback.price, DataSource::Sample)
            }
        };

        PriceView {
            name: instrument.name.to_string(),
            symbol: instrument.symbol.to_string(),
            price,
            source,
        }
    }

    pub async fn history_view(&self, instrument: &Instrument, lookback: Lookback) -> HistoryView {
        let req = QuoteRequest::new(instrument.symbol, lookback);
        let (points, source) = match self.fetch_series(&req, 2).await {
            FetchOutcome::Ok(points) => (points, DataSource::Live),
            FetchOutcome::Unavailable(reason) => {
                log_fallback(instrument, &reason);
                (catalog::sample_history(lookback), DataSource::Sample)
            }
        };

        HistoryView {
            name: instrument.name.to_string(),
            symbol: instrument.symbol.to_string(),
            lookback,
            points,
            source,
        }
    }

    /// One view per instrument, fetched one after another.
    pub async fn quote_views(&self, instruments: &[Instrument]) -> Vec<QuoteView> {
        let mut out = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            out.push(self.quote_view(instrument).await);
        }
        out
    }
}

fn log_fallback(instrument: &Instrument, reason: &str) {
    tracing::warn!(
        symbol = instrument.symbol,
        name = instrument.name,
        reason,
        "live quote unavailable; using sample data"
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::market::catalog::NIFTY_50;
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned closes per symbol; symbols not listed fail like an unreachable provider.
    #[derive(Default)]
    pub(crate) struct FakeMarket {
        pub series: HashMap<String, Vec<f64>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeMarket {
        pub fn with(mut self, symbol: &str, closes: &[f64]) -> Self {
            self.series.insert(symbol.to_string(), closes.to_vec());
            self
        }
    }

    #[async_trait::async_trait]
    impl MarketDataClient for FakeMarket {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_closes(&self, req: &QuoteRequest) -> Result<Vec<PricePoint>> {
            self.calls.lock().unwrap().push(req.symbol.clone());
            let closes = self
                .series
                .get(&req.symbol)
                .ok_or_else(|| anyhow::anyhow!("connection refused"))?;
            let start = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
            Ok(closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    close,
                })
                .collect())
        }
    }

    fn service(fake: FakeMarket) -> QuoteService {
        QuoteService::new(Some(Arc::new(fake)))
    }

    #[tokio::test]
    async fn live_change_uses_two_most_recent_points() {
        let svc = service(FakeMarket::default().with("^NSEI", &[24000.0, 24500.0, 24745.0]));
        let view = svc.quote_view(&NIFTY_50).await;
        assert_eq!(view.source, DataSource::Live);
        assert_eq!(view.quote.current, 24745.0);
        assert_eq!(view.quote.previous, 24500.0);
        assert!((view.quote.change - 245.0).abs() < 1e-9);
        assert!((view.quote.change_pct.unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_sample_tuple() {
        let svc = service(FakeMarket::default());
        let view = svc.quote_view(&NIFTY_50).await;
        assert_eq!(view.source, DataSource::Sample);
        assert_eq!(view.quote.current, 19845.0);
        assert_eq!(view.quote.change, 125.0);
        assert_eq!(view.quote.change_pct, Some(0.64));
    }

    #[tokio::test]
    async fn too_few_points_for_change_falls_back() {
        for closes in [&[][..], &[24745.0][..]] {
            let svc = service(FakeMarket::default().with("^NSEI", closes));
            let view = svc.quote_view(&NIFTY_50).await;
            assert!(view.source.is_sample());
            assert_eq!(view.quote.current, 19845.0);
        }
    }

    #[tokio::test]
    async fn single_point_is_enough_for_current_price() {
        let stock = catalog::analysis_stock();
        let svc = service(FakeMarket::default().with("HDFCBANK.NS", &[1642.5]));
        let view = svc.price_view(&stock).await;
        assert_eq!(view.source, DataSource::Live);
        assert_eq!(view.price, 1642.5);

        let empty = service(FakeMarket::default().with("HDFCBANK.NS", &[]));
        let view = empty.price_view(&stock).await;
        assert_eq!(view.source, DataSource::Sample);
        assert_eq!(view.price, 1589.0);
    }

    #[tokio::test]
    async fn failures_are_isolated_per_symbol() {
        let fake = FakeMarket::default()
            .with("^NSEI", &[24500.0, 24745.0])
            .with("^NSEBANK", &[51000.0]);
        let svc = service(fake);
        let views = svc.quote_views(&catalog::INDICES).await;

        let sources: Vec<_> = views.iter().map(|v| v.source).collect();
        assert_eq!(
            sources,
            vec![
                DataSource::Live,
                DataSource::Sample,
                DataSource::Sample,
                DataSource::Sample
            ]
        );
        assert_eq!(views[2].quote.current, 45235.0);
        assert_eq!(views[2].quote.change, -89.0);
    }

    #[tokio::test]
    async fn fetches_run_in_catalog_order_without_retry() {
        let fake = Arc::new(FakeMarket::default());
        let svc = QuoteService::new(Some(fake.clone() as Arc<dyn MarketDataClient>));
        svc.quote_views(&catalog::INDICES).await;
        let calls = fake.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["^NSEI", "^BSESN", "^NSEBANK", "^CNXIT"]);
    }

    #[tokio::test]
    async fn sample_only_mode_never_calls_out() {
        let svc = QuoteService::sample_only();
        assert!(!svc.is_live());
        let req = QuoteRequest::new("^NSEI", Lookback::FiveDays);
        assert_eq!(
            svc.fetch_change(&req).await,
            FetchOutcome::Unavailable("live market data disabled".to_string())
        );
        let history = svc.history_view(&NIFTY_50, Lookback::SixMonths).await;
        assert_eq!(history.source, DataSource::Sample);
        assert_eq!(history.points.len(), 183);
    }

    #[tokio::test]
    async fn non_positive_previous_leaves_pct_undefined() {
        let svc = service(FakeMarket::default().with("^NSEI", &[0.0, 10.0]));
        let quote = svc
            .fetch_change(&QuoteRequest::new("^NSEI", Lookback::TwoDays))
            .await
            .ok()
            .unwrap();
        assert_eq!(quote.change, 10.0);
        assert_eq!(quote.change_pct, None);
    }
}
