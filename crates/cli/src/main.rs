use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealth_core::advisory::{Advisor, AdvisoryTopic};
use wealth_core::domain::allocation::plan_for;
use wealth_core::domain::profile::{FinancialProfile, RiskTier};
use wealth_core::market::dashboard;
use wealth_core::market::QuoteService;

mod report;

#[derive(Debug, Parser)]
#[command(name = "wealth_cli", about = "AI wealth management dashboard for Indian markets")]
struct Args {
    /// Skip the live quote provider and show sample data only.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index levels, top gainers, NIFTY 50 history and sector sentiment.
    Market,

    /// Split the monthly surplus between equity and debt.
    Plan {
        #[arg(long, default_value_t = 30)]
        age: i64,

        /// Monthly income in rupees.
        #[arg(long, default_value_t = 75_000)]
        income: i64,

        /// Monthly expenses in rupees.
        #[arg(long, default_value_t = 45_000)]
        expenses: i64,

        /// Conservative, Moderate or Aggressive.
        #[arg(long, default_value = "Moderate")]
        risk: RiskTier,

        /// Also ask the assistant for a personalized strategy.
        #[arg(long)]
        strategy: bool,
    },

    /// Ask the assistant a canned or free-text question.
    Ask {
        #[arg(value_enum)]
        topic: AskTopic,

        /// Required for the `question` topic.
        #[arg(long)]
        question: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AskTopic {
    StockAnalysis,
    SipStrategy,
    TaxPlanning,
    Question,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = wealth_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if args.offline {
        settings.market_data_live = false;
    }

    let quotes = QuoteService::from_settings(&settings)?;
    tracing::info!(live = quotes.is_live(), "market data source ready");

    match args.command {
        Command::Market => {
            let dash = dashboard::build(&quotes).await;
            tracing::info!(
                indices = dash.indices.len(),
                gainers = dash.gainers.len(),
                sample = dash.has_sample_data(),
                "dashboard built"
            );
            print!("{}", report::market(&dash)?);
        }
        Command::Plan {
            age,
            income,
            expenses,
            risk,
            strategy,
        } => {
            let profile = FinancialProfile::new(age, income, expenses, risk)?;
            print!("{}", report::plan(&plan_for(&profile))?);

            if strategy {
                let advisor = Advisor::from_settings(&settings, quotes)?;
                let res = advisor
                    .respond(&AdvisoryTopic::PortfolioStrategy(profile))
                    .await;
                tracing::info!(topic = %res.topic, source = ?res.source, "advisory answered");
                print!("\n{}", report::advisory(&res));
            }
        }
        Command::Ask { topic, question } => {
            let topic = match topic {
                AskTopic::StockAnalysis => AdvisoryTopic::StockAnalysis,
                AskTopic::SipStrategy => AdvisoryTopic::SipStrategy,
                AskTopic::TaxPlanning => AdvisoryTopic::TaxPlanning,
                AskTopic::Question => {
                    AdvisoryTopic::question(question.as_deref().unwrap_or_default())?
                }
            };
            let advisor = Advisor::from_settings(&settings, quotes)?;
            let res = advisor.respond(&topic).await;
            tracing::info!(topic = %res.topic, source = ?res.source, "advisory answered");
            print!("{}", report::advisory(&res));
        }
    }

    Ok(())
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
