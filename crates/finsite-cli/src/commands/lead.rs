use anyhow::{anyhow, Result};
use finsite_core::leads::{LeadClient, LeadForm, LeadSubmission};
use finsite_core::sip::{plan_from_lead, project};
use finsite_core::utils::format_inr;
use finsite_core::Config;
use tracing::warn;

use crate::cli::LeadArgs;

pub async fn run(config: &Config, args: LeadArgs) -> Result<()> {
    let form = LeadForm::from_slug(&args.form).ok_or_else(|| {
        let known: Vec<&str> = LeadForm::ALL.iter().map(|f| f.slug()).collect();
        anyhow!("Unknown form '{}'. Known forms: {}", args.form, known.join(", "))
    })?;

    let mut submission = LeadSubmission::new(form);
    for (name, value) in args.fields {
        submission.fields.insert(name, value);
    }

    if args.dry_run {
        submission.validate()?;
        for (name, value) in submission.payload() {
            println!("{} = {}", name, value);
        }
        return Ok(());
    }

    let client = LeadClient::new(config)?;
    match client.submit(&submission).await {
        Ok(receipt) => {
            println!(
                "Thank you for enquiring! Our team will get back to you soon. (HTTP {})",
                receipt.status
            );
        }
        Err(e) => {
            if e.is_retryable() {
                warn!(error = %e, "Lead submission failed");
                return Err(anyhow!("{}. Please try again.", e));
            }
            return Err(e.into());
        }
    }

    // SIP enquiries continue to the calculator seeded with the lead's answers.
    if form == LeadForm::SipInvestment {
        let plan = plan_from_lead(
            submission.fields.get("investmentAmount").map(String::as_str),
            submission.fields.get("investmentDuration").map(String::as_str),
        );
        let result = project(plan).rounded();
        println!(
            "{} a month for {} years at {}% could grow to {}",
            format_inr(plan.monthly_amount),
            plan.duration_years,
            plan.annual_return_percent,
            format_inr(result.future_value)
        );
    }
    Ok(())
}
