//! Display helpers shared by the narratives and the CLI reports.

/// `30000` -> `₹30,000`.
pub fn rupees(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Whole-rupee display of a quoted price.
pub fn rupees_f64(price: f64) -> String {
    rupees(price.round() as i64)
}

/// `0.64` -> `+0.64%`; `None` -> `n/a`.
pub fn signed_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{p:+.2}%"),
        None => "n/a".to_string(),
    }
}

/// Index level with grouping and no decimals: `19845.0` -> `19,845`.
pub fn level(value: f64) -> String {
    rupees(value.round() as i64).replacen('₹', "", 1)
}
