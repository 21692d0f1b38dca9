use serde::{Deserialize, Serialize};

/// Months per year; contributions are monthly.
const PERIODS_PER_YEAR: u32 = 12;

/// A recurring monthly contribution plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ContributionPlan {
    pub monthly_amount: f64,
    pub annual_return_percent: f64,
    pub duration_years: u32,
}

impl ContributionPlan {
    pub fn new(monthly_amount: f64, annual_return_percent: f64, duration_years: u32) -> Self {
        Self {
            monthly_amount,
            annual_return_percent,
            duration_years,
        }
    }

    /// Number of monthly contributions.
    pub fn periods(&self) -> u32 {
        self.duration_years.saturating_mul(PERIODS_PER_YEAR)
    }

    /// Nominal annual rate converted to a monthly rate.
    pub fn periodic_rate(&self) -> f64 {
        self.annual_return_percent / 100.0 / PERIODS_PER_YEAR as f64
    }
}

impl Default for ContributionPlan {
    fn default() -> Self {
        Self::new(5000.0, 12.0, 5)
    }
}

/// Projected value of a plan, split into principal and gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProjectionResult {
    pub future_value: f64,
    pub total_contributed: f64,
    pub total_gain: f64,
}

impl ProjectionResult {
    /// Whole-currency values for display. Never feed these back into a calculation.
    pub fn rounded(&self) -> Self {
        Self {
            future_value: self.future_value.round(),
            total_contributed: self.total_contributed.round(),
            total_gain: self.total_gain.round(),
        }
    }

    /// Fraction of the future value that is principal.
    pub fn contributed_share(&self) -> f64 {
        if self.future_value > 0.0 {
            self.total_contributed / self.future_value
        } else {
            0.0
        }
    }

    /// Fraction of the future value that is gain.
    pub fn gain_share(&self) -> f64 {
        if self.future_value > 0.0 {
            self.total_gain / self.future_value
        } else {
            0.0
        }
    }
}

/// Future value of an annuity-due:
/// `P * (((1 + i)^n - 1) / i) * (1 + i)` with `i` the monthly rate and `n` the
/// number of months.
///
/// A zero (or non-finite) periodic rate takes the formula's limit as `i -> 0`,
/// which is simply `P * n`.
pub fn project(plan: ContributionPlan) -> ProjectionResult {
    let n = plan.periods() as f64;
    let i = plan.periodic_rate();
    let total_contributed = plan.monthly_amount * n;

    let future_value = if i == 0.0 || !i.is_finite() {
        total_contributed
    } else {
        let growth = (1.0 + i).powf(n);
        plan.monthly_amount * ((growth - 1.0) / i) * (1.0 + i)
    };

    ProjectionResult {
        future_value,
        total_contributed,
        total_gain: future_value - total_contributed,
    }
}
