use anyhow::{anyhow, Result};
use finsite_core::sip::inputs::parse_amount;
use finsite_core::sip::{project, ContributionPlan, PlanInputs, ProjectionResult};
use finsite_core::utils::{format_compact, format_inr};

use crate::cli::SipArgs;

pub fn run(args: &SipArgs) -> Result<()> {
    let plan = build_plan(args)?;
    let result = project(plan);

    if args.json {
        let output = serde_json::json!({ "plan": plan, "projection": result });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render(&plan, &result));
    }
    Ok(())
}

fn build_plan(args: &SipArgs) -> Result<ContributionPlan> {
    if args.unclamped {
        let amount = parse_amount(&args.amount)
            .ok_or_else(|| anyhow!("Invalid monthly amount: {}", args.amount))?;
        return Ok(ContributionPlan::new(amount, args.rate, args.years));
    }

    let inputs = PlanInputs {
        monthly_amount: args.amount.clone(),
        duration_years: args.years,
        expected_return_percent: args.rate,
    };
    inputs
        .to_plan()
        .ok_or_else(|| anyhow!("Invalid monthly amount: {}", args.amount))
}

fn render(plan: &ContributionPlan, result: &ProjectionResult) -> String {
    let shown = result.rounded();
    format!(
        "Monthly investment : {}\n\
         Duration           : {} years\n\
         Expected return    : {:.2}%\n\
         \n\
         Invested amount    : {}\n\
         Est. returns       : {} ({:.0}%)\n\
         Total value        : {} ({})\n",
        format_inr(plan.monthly_amount),
        plan.duration_years,
        plan.annual_return_percent,
        format_inr(shown.total_contributed),
        format_inr(shown.total_gain),
        result.gain_share() * 100.0,
        format_inr(shown.future_value),
        format_compact(shown.future_value),
    )
}
