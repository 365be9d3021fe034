//! Canned narratives served when no language model is configured.

use crate::advisory::prompt::{StockMetrics, SIP_MONTHLY_AMOUNT};
use crate::advisory::AdvisoryTopic;
use crate::domain::allocation::{plan_for, PlanOutcome, EXPECTED_RETURN_BAND};
use crate::format::rupees;

const DEMO_FOOTER: &str = "*Demo response. Configure an API key for personalized AI insights.*";

pub fn narrative(topic: &AdvisoryTopic, metrics: Option<&StockMetrics>) -> String {
    let body = match topic {
        AdvisoryTopic::StockAnalysis => stock_analysis(metrics),
        AdvisoryTopic::SipStrategy => sip_strategy(),
        AdvisoryTopic::TaxPlanning => TAX_PLANNING.to_string(),
        AdvisoryTopic::FreeText(question) => free_text(question),
        AdvisoryTopic::PortfolioStrategy(profile) => match plan_for(profile) {
            PlanOutcome::Allocated(plan) => format!(
                "**Personalized Portfolio Strategy ({risk})**\n\n\
**Monthly Investment:** {surplus}\n\
- **Equity ({eq_pct}%):** {eq}\n\
- **Debt ({debt_pct}%):** {debt}\n\n\
**Expected Returns:** {band} annually\n\
**10-Year Corpus:** {corpus}\n\n\
**Fund Recommendations:**\n{funds}",
                risk = plan.risk,
                surplus = rupees(plan.monthly_surplus),
                eq_pct = plan.equity_pct,
                eq = rupees(plan.equity_amount),
                debt_pct = plan.debt_pct,
                debt = rupees(plan.debt_amount),
                band = EXPECTED_RETURN_BAND,
                corpus = plan
                    .ten_year_corpus
                    .map_or_else(|| "n/a".to_string(), rupees),
                funds = plan
                    .funds
                    .iter()
                    .map(|f| format!("- {}: {}", f.category, f.fund))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            PlanOutcome::NoSurplus { surplus } => format!(
                "**No investable surplus detected.**\n\n\
Your expenses exceed your income by {} per month. Trim discretionary spending and build a \
3-6 month emergency fund before starting a SIP.",
                rupees(surplus.saturating_abs())
            ),
        },
    };
    format!("{body}\n\n{DEMO_FOOTER}")
}

fn stock_analysis(metrics: Option<&StockMetrics>) -> String {
    let (price, pe, roe, nim) = match metrics {
        Some(m) => (
            m.price_label(),
            m.pe_ratio,
            m.roe_pct,
            m.net_interest_margin_pct,
        ),
        None => ("₹1,589 (sample data)".to_string(), 18.5, 16.8, 4.2),
    };

    format!(
        "**HDFC Bank Stock Analysis**\n\n\
**Current Status:** {price}\n\n\
**Strengths:**\n\
- Leading private bank with 35+ year track record\n\
- Strong digital banking platform\n\
- Consistent dividend payments\n\n\
**Key Metrics:**\n\
- P/E Ratio: {pe:.1}x (reasonable for banking)\n\
- ROE: {roe:.1}% (industry-leading)\n\
- Net Interest Margin: {nim:.1}%\n\n\
**Recommendation:** BUY for long-term (3+ years)\n\
**Risk Level:** Moderate\n\
**Portfolio Allocation:** 5-8% of equity portion"
    )
}

fn sip_strategy() -> String {
    // (category, pct, fund, note)
    let legs = [
        ("Large Cap", 40, "HDFC Top 100 Fund", "Expected: 10-12% annually"),
        ("Multi Cap", 30, "Parag Parikh Flexi Cap Fund", "Expected: 12-15% annually"),
        ("ELSS", 20, "Axis Long Term Equity Fund", "Tax benefit: ₹48,000 annual deduction"),
        ("International", 10, "Motilal Oswal Nasdaq 100", "Currency diversification"),
    ];

    let mut out = format!(
        "**Smart SIP Strategy for {}/month**\n\n**Recommended Allocation:**\n",
        rupees(SIP_MONTHLY_AMOUNT)
    );
    for (category, pct, fund, note) in legs {
        out.push_str(&format!(
            "\n**{category} ({pct}% - {})**\n- {fund}\n- {note}\n",
            rupees(SIP_MONTHLY_AMOUNT * pct / 100)
        ));
    }
    out.push_str(
        "\n**Projected Wealth (12% CAGR):**\n\
- 10 Years: ₹46L (Investment: ₹24L)\n\
- 15 Years: ₹99L (Investment: ₹36L)",
    );
    out
}

const TAX_PLANNING: &str = "**Tax-Saving Guide 2024-25**

**Section 80C (₹1.5L limit):**
- ELSS Mutual Funds (best option): invest ₹1,50,000 annually
- Lock-in: only 3 years
- Expected return: 12-15%
- Tax saving: ₹46,500 (30% rate)

**Section 80CCD(1B) (₹50K extra):**
- NPS investment
- Additional ₹15,000 tax saving

**Section 80D (Health Insurance):**
- Self + Family: ₹25,000
- Parents >60: ₹50,000

**Total Tax Saving Potential:**
- 80C: ₹46,500
- 80CCD(1B): ₹15,000
- 80D: ₹22,500
- **Total: ₹84,000+ annually**";

fn free_text(question: &str) -> String {
    format!(
        "**Demo Response to: \"{question}\"**\n\n\
In full mode, you would get:\n\
- Real-time market analysis\n\
- Personalized recommendations\n\
- Tax optimization strategies\n\
- Goal-based planning"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{FinancialProfile, RiskTier};

    #[test]
    fn every_topic_has_non_empty_demo() {
        let topics = [
            AdvisoryTopic::StockAnalysis,
            AdvisoryTopic::SipStrategy,
            AdvisoryTopic::TaxPlanning,
            AdvisoryTopic::FreeText("What is an index fund?".to_string()),
            AdvisoryTopic::PortfolioStrategy(FinancialProfile::default()),
        ];
        for topic in &topics {
            let text = narrative(topic, None);
            assert!(text.len() > DEMO_FOOTER.len() + 20, "{topic:?}");
            assert!(text.ends_with(DEMO_FOOTER));
        }
    }

    #[test]
    fn sip_legs_add_up_to_monthly_amount() {
        let text = sip_strategy();
        assert!(text.contains("**Large Cap (40% - ₹8,000)**"));
        assert!(text.contains("**Multi Cap (30% - ₹6,000)**"));
        assert!(text.contains("**ELSS (20% - ₹4,000)**"));
        assert!(text.contains("**International (10% - ₹2,000)**"));
    }

    #[test]
    fn portfolio_demo_reports_plan() {
        let text = narrative(
            &AdvisoryTopic::PortfolioStrategy(FinancialProfile::default()),
            None,
        );
        assert!(text.contains("**Monthly Investment:** ₹30,000"));
        assert!(text.contains("**Equity (60%):** ₹18,000"));
        assert!(text.contains("**Debt (40%):** ₹12,000"));
        assert!(text.contains("**10-Year Corpus:** ₹7,200,000"));
        assert!(text.contains("- ELSS: Axis Long Term Equity"));
    }

    #[test]
    fn portfolio_demo_marks_unprojectable_corpus() {
        let profile = FinancialProfile {
            monthly_income: i64::MAX / 50,
            monthly_expenses: 0,
            ..FinancialProfile::default()
        };
        let text = narrative(&AdvisoryTopic::PortfolioStrategy(profile), None);
        assert!(text.contains("**10-Year Corpus:** n/a"));
    }

    #[test]
    fn portfolio_demo_without_surplus() {
        let profile = FinancialProfile::new(30, 45_000, 50_000, RiskTier::Moderate).unwrap();
        let text = narrative(&AdvisoryTopic::PortfolioStrategy(profile), None);
        assert!(text.contains("No investable surplus"));
        assert!(text.contains("₹5,000 per month"));
        assert!(!text.contains("Equity ("));
    }

    #[test]
    fn free_text_demo_echoes_question() {
        let text = narrative(&AdvisoryTopic::FreeText("Should I buy gold?".to_string()), None);
        assert!(text.contains("Demo Response to: \"Should I buy gold?\""));
    }
}
