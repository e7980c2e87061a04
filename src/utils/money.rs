// Utilitários para valores monetários

/// Rounds an amount to two decimal places (cents).
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}
