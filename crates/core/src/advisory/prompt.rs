use crate::advisory::AdvisoryTopic;
use crate::domain::allocation::{plan_for, PlanOutcome};
use crate::domain::profile::FinancialProfile;
use crate::format::{rupees, rupees_f64};
use crate::market::types::{DataSource, PriceView};

pub const SIP_MONTHLY_AMOUNT: i64 = 20_000;

/// Fundamentals quoted alongside the canned stock analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct StockMetrics {
    pub price: PriceView,
    pub pe_ratio: f64,
    pub roe_pct: f64,
    pub net_interest_margin_pct: f64,
}

impl StockMetrics {
    pub fn hdfc_bank(price: PriceView) -> Self {
        Self {
            price,
            pe_ratio: 18.5,
            roe_pct: 16.8,
            net_interest_margin_pct: 4.2,
        }
    }

    pub fn price_label(&self) -> String {
        let tag = match self.price.source {
            DataSource::Live => "live",
            DataSource::Sample => "sample data",
        };
        format!("{} ({tag})", rupees_f64(self.price.price))
    }
}

const ADVISOR_PREAMBLE: &str = "You are a financial advisor for retail investors in Indian markets. \
Answer in clear markdown, quote amounts in rupees, and keep advice general rather than a guarantee of returns.";

pub fn build(topic: &AdvisoryTopic, metrics: Option<&StockMetrics>) -> String {
    let body = match topic {
        AdvisoryTopic::StockAnalysis => stock_analysis(metrics),
        AdvisoryTopic::SipStrategy => format!(
            "Suggest a diversified SIP strategy for {} per month across large cap, multi cap, ELSS and \
international funds. Give the split in percent and rupees, expected annual returns, and projected \
wealth after 10 and 15 years at 12% CAGR.",
            rupees(SIP_MONTHLY_AMOUNT)
        ),
        AdvisoryTopic::TaxPlanning => "Explain the main tax-saving options for FY 2024-25 under the old regime: \
Section 80C (ELSS, PPF, lock-in periods), Section 80CCD(1B) for NPS, and Section 80D for health insurance. \
Estimate the total annual saving at the 30% slab."
            .to_string(),
        AdvisoryTopic::FreeText(question) => format!("Question: {question}"),
        AdvisoryTopic::PortfolioStrategy(profile) => portfolio_strategy(profile),
    };
    format!("{ADVISOR_PREAMBLE}\n\n{body}")
}

fn stock_analysis(metrics: Option<&StockMetrics>) -> String {
    match metrics {
        Some(m) => format!(
            "Analyze {name} ({symbol}) for a long-term investor.\n\
Current price: {price}\n\
P/E ratio: {pe:.1}x\n\
ROE: {roe:.1}%\n\
Net interest margin: {nim:.1}%\n\
Cover strengths, key risks, a buy/hold/sell view with horizon, risk level, and a suggested portfolio weight.",
            name = m.price.name,
            symbol = m.price.symbol,
            price = m.price_label(),
            pe = m.pe_ratio,
            roe = m.roe_pct,
            nim = m.net_interest_margin_pct,
        ),
        None => "Analyze HDFC Bank (HDFCBANK.NS) for a long-term investor.".to_string(),
    }
}

fn portfolio_strategy(profile: &FinancialProfile) -> String {
    let mut out = format!(
        "Build a personalized monthly investment strategy.\n\
Age: {age}\n\
Monthly income: {income}\n\
Monthly expenses: {expenses}\n\
Risk appetite: {risk}\n",
        age = profile.age,
        income = rupees(profile.monthly_income),
        expenses = rupees(profile.monthly_expenses),
        risk = profile.risk,
    );

    match plan_for(profile) {
        PlanOutcome::Allocated(plan) => out.push_str(&format!(
            "Investable surplus: {surplus}/month\n\
Baseline split: equity {eq_pct}% ({eq}), debt {debt_pct}% ({debt})\n\
Recommend specific fund categories for each leg and note rebalancing and emergency-fund guidance.",
            surplus = rupees(plan.monthly_surplus),
            eq_pct = plan.equity_pct,
            eq = rupees(plan.equity_amount),
            debt_pct = plan.debt_pct,
            debt = rupees(plan.debt_amount),
        )),
        PlanOutcome::NoSurplus { surplus } => out.push_str(&format!(
            "Monthly shortfall: {}\nThere is no investable surplus. Suggest how to cut expenses and build an emergency fund first.",
            rupees(surplus)
        )),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::RiskTier;

    fn sample_metrics() -> StockMetrics {
        StockMetrics::hdfc_bank(PriceView {
            name: "HDFC Bank".to_string(),
            symbol: "HDFCBANK.NS".to_string(),
            price: 1589.0,
            source: DataSource::Sample,
        })
    }

    #[test]
    fn stock_prompt_embeds_metrics() {
        let p = build(&AdvisoryTopic::StockAnalysis, Some(&sample_metrics()));
        assert!(p.contains("HDFCBANK.NS"));
        assert!(p.contains("₹1,589 (sample data)"));
        assert!(p.contains("P/E ratio: 18.5x"));
        assert!(p.contains("ROE: 16.8%"));
    }

    #[test]
    fn free_text_prompt_embeds_question() {
        let p = build(&AdvisoryTopic::FreeText("Is gold a good hedge?".to_string()), None);
        assert!(p.starts_with(ADVISOR_PREAMBLE));
        assert!(p.ends_with("Question: Is gold a good hedge?"));
    }

    #[test]
    fn portfolio_prompt_embeds_profile_and_split() {
        let profile = FinancialProfile::default();
        let p = build(&AdvisoryTopic::PortfolioStrategy(profile), None);
        assert!(p.contains("Age: 30"));
        assert!(p.contains("Monthly income: ₹75,000"));
        assert!(p.contains("Risk appetite: Moderate"));
        assert!(p.contains("equity 60% (₹18,000), debt 40% (₹12,000)"));
    }

    #[test]
    fn portfolio_prompt_flags_shortfall() {
        let profile = FinancialProfile::new(35, 45_000, 50_000, RiskTier::Aggressive).unwrap();
        let p = build(&AdvisoryTopic::PortfolioStrategy(profile), None);
        assert!(p.contains("Monthly shortfall: -₹5,000"));
        assert!(!p.contains("Baseline split"));
    }

    #[test]
    fn sip_prompt_uses_fixed_amount() {
        let p = build(&AdvisoryTopic::SipStrategy, None);
        assert!(p.contains("₹20,000 per month"));
    }
}
