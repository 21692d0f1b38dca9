use serde::{Deserialize, Serialize};

use super::calculator::ContributionPlan;

/// Duration slider bounds, in years.
pub const MIN_DURATION_YEARS: u32 = 1;
pub const MAX_DURATION_YEARS: u32 = 30;

/// Expected-return slider bounds, in percent.
pub const MIN_RETURN_PERCENT: f64 = 8.0;
pub const MAX_RETURN_PERCENT: f64 = 30.0;

/// Raw calculator inputs as entered on the page.
///
/// The amount is free-form text; the duration and return come from bounded
/// sliders, so they are clamped here instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    pub monthly_amount: String,
    pub duration_years: u32,
    pub expected_return_percent: f64,
}

impl PlanInputs {
    /// Build a plan, or `None` when the amount is not a positive number.
    pub fn to_plan(&self) -> Option<ContributionPlan> {
        let amount = parse_amount(&self.monthly_amount)?;
        Some(ContributionPlan::new(
            amount,
            clamp_return(self.expected_return_percent),
            self.duration_years.clamp(MIN_DURATION_YEARS, MAX_DURATION_YEARS),
        ))
    }
}

/// Parse a currency entry such as `"₹5,000"` or `" 2500.50 "`.
///
/// Only the rupee sign, grouping commas and whitespace are ignored; signs,
/// exponents and any other characters make the entry invalid.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let amount: f64 = cleaned.parse().ok()?;
    (amount > 0.0 && amount.is_finite()).then_some(amount)
}

/// Clamp to the slider range and keep two decimals.
pub fn clamp_return(percent: f64) -> f64 {
    if !percent.is_finite() {
        return MIN_RETURN_PERCENT;
    }
    let clamped = percent.clamp(MIN_RETURN_PERCENT, MAX_RETURN_PERCENT);
    (clamped * 100.0).round() / 100.0
}

/// Investment horizon answers offered by the SIP lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBand {
    OneToThree,
    ThreeToFive,
    FiveToTen,
    TenPlus,
}

impl DurationBand {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1-3" => Some(Self::OneToThree),
            "3-5" => Some(Self::ThreeToFive),
            "5-10" => Some(Self::FiveToTen),
            "10+" => Some(Self::TenPlus),
            _ => None,
        }
    }

    /// Representative horizon used to seed the calculator.
    pub fn default_years(self) -> u32 {
        match self {
            Self::OneToThree => 2,
            Self::ThreeToFive => 4,
            Self::FiveToTen => 7,
            Self::TenPlus => 15,
        }
    }
}

/// Seed a plan from a submitted SIP lead (`investmentAmount`, `investmentDuration`).
/// Missing or unparseable answers fall back to the calculator defaults.
pub fn plan_from_lead(amount: Option<&str>, duration: Option<&str>) -> ContributionPlan {
    let defaults = ContributionPlan::default();
    ContributionPlan::new(
        amount.and_then(parse_amount).unwrap_or(defaults.monthly_amount),
        defaults.annual_return_percent,
        duration
            .and_then(DurationBand::parse)
            .map(DurationBand::default_years)
            .unwrap_or(defaults.duration_years),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5000"), Some(5000.0));
        assert_eq!(parse_amount("₹5,000"), Some(5000.0));
        assert_eq!(parse_amount(" 2500.50 "), Some(2500.5));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_amount_rejects_signs_and_stray_characters() {
        assert_eq!(parse_amount("-5000"), None);
        assert_eq!(parse_amount("₹-5,000"), None);
        assert_eq!(parse_amount("+5000"), None);
        assert_eq!(parse_amount("5e3"), None);
        assert_eq!(parse_amount("50O0"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("₹ 1,00,000"), Some(100_000.0));
    }

    #[test]
    fn test_negative_amount_yields_no_plan() {
        let inputs = PlanInputs {
            monthly_amount: "-5000".to_string(),
            duration_years: 10,
            expected_return_percent: 12.0,
        };
        assert!(inputs.to_plan().is_none());
    }

    #[test]
    fn test_inputs_are_clamped() {
        let inputs = PlanInputs {
            monthly_amount: "1000".to_string(),
            duration_years: 45,
            expected_return_percent: 3.0,
        };
        let plan = inputs.to_plan().unwrap();
        assert_eq!(plan.duration_years, MAX_DURATION_YEARS);
        assert_eq!(plan.annual_return_percent, MIN_RETURN_PERCENT);

        let inputs = PlanInputs {
            monthly_amount: "1000".to_string(),
            duration_years: 0,
            expected_return_percent: 12.3456,
        };
        let plan = inputs.to_plan().unwrap();
        assert_eq!(plan.duration_years, MIN_DURATION_YEARS);
        assert_eq!(plan.annual_return_percent, 12.35);
    }

    #[test]
    fn test_invalid_amount_yields_no_plan() {
        let inputs = PlanInputs {
            monthly_amount: "-".to_string(),
            duration_years: 10,
            expected_return_percent: 12.0,
        };
        assert!(inputs.to_plan().is_none());
    }

    #[test]
    fn test_duration_bands() {
        assert_eq!(DurationBand::parse("1-3").map(DurationBand::default_years), Some(2));
        assert_eq!(DurationBand::parse("3-5").map(DurationBand::default_years), Some(4));
        assert_eq!(DurationBand::parse("5-10").map(DurationBand::default_years), Some(7));
        assert_eq!(DurationBand::parse("10+").map(DurationBand::default_years), Some(15));
        assert_eq!(DurationBand::parse("forever"), None);
    }

    #[test]
    fn test_plan_from_lead() {
        let plan = plan_from_lead(Some("10000"), Some("5-10"));
        assert_eq!(plan, ContributionPlan::new(10_000.0, 12.0, 7));

        let plan = plan_from_lead(None, None);
        assert_eq!(plan, ContributionPlan::default());
    }
}
