const DEPOSIT: f64 = 15_000.0;
const ANNUAL_RATE: f64 = 0.04;
const TERM_MONTHS: i32 = 40 * 12;

/// Monthly repayment on a standard amortising mortgage for the listing price,
/// after a fixed deposit. Prices at or below the deposit need no mortgage.
pub(crate) fn estimate_monthly_payment(price: f64) -> f64 {
    let principal = price - DEPOSIT;
    if principal <= 0.0 {
        return 0.0;
    }

    let monthly_rate = ANNUAL_RATE / 12.0;
    let growth = (1.0 + monthly_rate).powi(TERM_MONTHS);
    principal * (monthly_rate * growth) / (growth - 1.0)
}
