use crate::config::Settings;
use crate::market::types::{PricePoint, QuoteRequest};
use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
// The chart endpoint rejects requests without a browser-like agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily closes for the requested window, oldest first.
    async fn fetch_closes(&self, req: &QuoteRequest) -> Result<Vec<PricePoint>>;
}

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            symbol
        )
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }
}

#[async_trait::async_trait]
impl MarketDataClient for YahooChartClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_closes(&self, req: &QuoteRequest) -> Result<Vec<PricePoint>> {
        let res = self
            .http
            .get(self.url(&req.symbol))
            .headers(Self::headers())
            .query(&[("interval", "1d"), ("range", req.lookback.as_range())])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        if !status.is_success() {
            anyhow::bail!("market data HTTP {status} for {}: {text}", req.symbol);
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("market data response is not a chart payload: {text}"))?;
        parse_chart(parsed, &req.symbol)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_chart(res: ChartResponse, symbol: &str) -> Result<Vec<PricePoint>> {
    if let Some(err) = res.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("market data error for {symbol}: {err}");
    }

    let result = res
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .with_context(|| format!("no chart result for {symbol}"))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    // Sessions without a trade come back as null closes; drop them.
    let points = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn chart(v: serde_json::Value) -> ChartResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        // 2024-08-19, 2024-08-20, 2024-08-21 at 03:45 UTC.
        let res = chart(json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "^NSEI"},
                    "timestamp": [1724039100, 1724125500, 1724211900],
                    "indicators": {"quote": [{"close": [24572.6, null, 24770.2]}]}
                }],
                "error": null
            }
        }));

        let points = parse_chart(res, "^NSEI").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 8, 19).unwrap());
        assert_eq!(points[1].close, 24770.2);
    }

    #[test]
    fn surfaces_provider_error() {
        let res = chart(json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }));
        let err = parse_chart(res, "FOO.NS").unwrap_err();
        assert!(err.to_string().contains("FOO.NS"));
    }

    #[test]
    fn empty_series_is_not_an_error() {
        let res = chart(json!({
            "chart": {
                "result": [{"timestamp": [], "indicators": {"quote": [{"close": []}]}}],
                "error": null
            }
        }));
        assert!(parse_chart(res, "^NSEI").unwrap().is_empty());
    }

    #[test]
    fn builds_chart_url_without_double_slash() {
        let mut settings = Settings::offline();
        settings.market_data_base_url = Some("http://localhost:9999/".to_string());
        let client = YahooChartClient::from_settings(&settings).unwrap();
        assert_eq!(
            client.url("RELIANCE.NS"),
            "http://localhost:9999/v8/finance/chart/RELIANCE.NS"
        );
    }
}
