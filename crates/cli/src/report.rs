use std::fmt::{self, Write};
use wealth_core::advisory::{AdvisoryResponse, ResponseSource};
use wealth_core::domain::allocation::PlanOutcome;
use wealth_core::format::{level, rupees, rupees_f64, signed_pct};
use wealth_core::market::dashboard::MarketDashboard;
use wealth_core::market::types::{DataSource, QuoteView};

fn source_tag(source: DataSource) -> &'static str {
    match source {
        DataSource::Live => "",
        DataSource::Sample => " [sample]",
    }
}

fn quote_line(v: &QuoteView) -> String {
    format!(
        "  {:<12} {:>10}  {:>+9.2} ({}){}",
        v.name,
        level(v.quote.current),
        v.quote.change,
        signed_pct(v.quote.change_pct),
        source_tag(v.source)
    )
}

pub fn market(dash: &MarketDashboard) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Indian Market Dashboard")?;
    if dash.has_sample_data() {
        writeln!(out, "(entries marked [sample] are placeholder data, not live quotes)")?;
    }

    writeln!(out, "\nIndices")?;
    for v in &dash.indices {
        writeln!(out, "{}", quote_line(v))?;
    }

    writeln!(out, "\nTop Gainers")?;
    for v in &dash.gainers {
        writeln!(
            out,
            "  {:<12} {:>10}  {}{}",
            v.name,
            rupees_f64(v.quote.current),
            signed_pct(v.quote.change_pct),
            source_tag(v.source)
        )?;
    }

    let h = &dash.history;
    if let (Some(first), Some(last)) = (h.points.first(), h.points.last()) {
        let low = h.points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
        let high = h.points.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);
        writeln!(
            out,
            "\n{} {} history{}\n  {} .. {}: {} -> {} (low {}, high {})",
            h.name,
            h.lookback,
            source_tag(h.source),
            first.date,
            last.date,
            level(first.close),
            level(last.close),
            level(low),
            level(high)
        )?;
    }

    writeln!(out, "\nMarket Sentiment{}", source_tag(dash.sentiment.source))?;
    for m in dash.sentiment.positive.iter().chain(&dash.sentiment.negative) {
        writeln!(out, "  {:<12} {}", m.sector, signed_pct(Some(m.change_pct)))?;
    }
    Ok(out)
}

pub fn plan(outcome: &PlanOutcome) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match outcome {
        PlanOutcome::Allocated(plan) => {
            writeln!(
                out,
                "Investable Surplus: {}/month\n\nRecommended Portfolio ({})",
                rupees(plan.monthly_surplus),
                plan.risk
            )?;
            writeln!(out, "  Equity ({}%): {}", plan.equity_pct, rupees(plan.equity_amount))?;
            writeln!(out, "  Debt ({}%):   {}", plan.debt_pct, rupees(plan.debt_amount))?;
            writeln!(out, "\nExpected Returns: {} annually", plan.expected_return)?;
            match plan.ten_year_corpus {
                Some(corpus) => writeln!(out, "10-Year Corpus: {}", rupees(corpus))?,
                None => writeln!(out, "10-Year Corpus: n/a")?,
            }
            writeln!(out, "\nFund Recommendations:")?;
            for f in &plan.funds {
                writeln!(out, "  - {}: {}", f.category, f.fund)?;
            }
        }
        PlanOutcome::NoSurplus { surplus } => writeln!(
            out,
            "No investable surplus detected (monthly balance {}).",
            rupees(*surplus)
        )?,
    }
    Ok(out)
}

pub fn advisory(res: &AdvisoryResponse) -> String {
    let label = match res.source {
        ResponseSource::Live => "AI response",
        ResponseSource::Demo => "Demo mode",
        ResponseSource::Error => "Assistant unavailable",
    };
    format!("[{label}]\n{}\n", res.text.trim_end())
}
