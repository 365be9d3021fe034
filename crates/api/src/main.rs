use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wealth_core::advisory::{Advisor, AdvisoryResponse, AdvisoryTopic};
use wealth_core::domain::allocation::{plan_for, PlanOutcome};
use wealth_core::domain::profile::FinancialProfile;
use wealth_core::market::dashboard::{self, MarketDashboard, MarketSentiment};
use wealth_core::market::types::{HistoryView, Lookback, QuoteView};
use wealth_core::market::QuoteService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = wealth_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let quotes = match QuoteService::from_settings(&settings) {
        Ok(quotes) => quotes,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "market data client init failed; serving sample quotes");
            QuoteService::sample_only()
        }
    };
    let advisor = match Advisor::from_settings(&settings, quotes.clone()) {
        Ok(advisor) => advisor,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "LLM client init failed; assistant runs in demo mode");
            Advisor::new(None, quotes.clone())
        }
    };

    let state = AppState { quotes, advisor };
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(get_status))
        .route("/market/dashboard", get(get_dashboard))
        .route("/market/indices", get(get_indices))
        .route("/market/gainers", get(get_gainers))
        .route("/market/history", get(get_history))
        .route("/market/sentiment", get(get_sentiment))
        .route("/planner/plan", post(post_plan))
        .route("/advisor/stock-analysis", post(post_stock_analysis))
        .route("/advisor/sip-strategy", post(post_sip_strategy))
        .route("/advisor/tax-planning", post(post_tax_planning))
        .route("/advisor/ask", post(post_ask))
        .route("/advisor/portfolio-strategy", post(post_portfolio_strategy))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    quotes: QuoteService,
    advisor: Advisor,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(msg: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct ServiceStatus {
    assistant: &'static str,
    market_data: &'static str,
}

async fn get_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        assistant: if state.advisor.is_live() { "live" } else { "demo" },
        market_data: if state.quotes.is_live() { "live" } else { "sample" },
    })
}

async fn get_dashboard(State(state): State<AppState>) -> Json<MarketDashboard> {
    Json(dashboard::build(&state.quotes).await)
}

async fn get_indices(State(state): State<AppState>) -> Json<Vec<QuoteView>> {
    Json(dashboard::indices(&state.quotes).await)
}

async fn get_gainers(State(state): State<AppState>) -> Json<Vec<QuoteView>> {
    Json(dashboard::top_gainers(&state.quotes).await)
}

#[derive(Debug, Default, Deserialize)]
struct HistoryParams {
    lookback: Option<String>,
}

async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryView>, ApiError> {
    let lookback = match params.lookback.as_deref() {
        Some(s) => s.parse::<Lookback>().map_err(bad_request)?,
        None => Lookback::SixMonths,
    };
    Ok(Json(dashboard::index_history(&state.quotes, lookback).await))
}

async fn get_sentiment() -> Json<MarketSentiment> {
    Json(dashboard::sentiment())
}

fn profile_from(
    payload: Result<Json<FinancialProfile>, JsonRejection>,
) -> Result<FinancialProfile, ApiError> {
    let Json(profile) = payload.map_err(|e| bad_request(e.body_text()))?;
    profile.validate().map_err(bad_request)?;
    Ok(profile)
}

async fn post_plan(
    payload: Result<Json<FinancialProfile>, JsonRejection>,
) -> Result<Json<PlanOutcome>, ApiError> {
    let profile = profile_from(payload)?;
    Ok(Json(plan_for(&profile)))
}

async fn post_stock_analysis(State(state): State<AppState>) -> Json<AdvisoryResponse> {
    Json(state.advisor.respond(&AdvisoryTopic::StockAnalysis).await)
}

async fn post_sip_strategy(State(state): State<AppState>) -> Json<AdvisoryResponse> {
    Json(state.advisor.respond(&AdvisoryTopic::SipStrategy).await)
}

async fn post_tax_planning(State(state): State<AppState>) -> Json<AdvisoryResponse> {
    Json(state.advisor.respond(&AdvisoryTopic::TaxPlanning).await)
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

async fn post_ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    let topic = AdvisoryTopic::question(&req.question).map_err(bad_request)?;
    Ok(Json(state.advisor.respond(&topic).await))
}

async fn post_portfolio_strategy(
    State(state): State<AppState>,
    payload: Result<Json<FinancialProfile>, JsonRejection>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let profile = profile_from(payload)?;
    Ok(Json(
        state
            .advisor
            .respond(&AdvisoryTopic::PortfolioStrategy(profile))
            .await,
    ))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &wealth_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
