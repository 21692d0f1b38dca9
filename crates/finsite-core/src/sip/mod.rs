//! SIP (systematic investment plan) projection calculator.
//!
//! `project` computes the future value of a monthly contribution made at the
//! start of each period (annuity-due). All arithmetic is `f64`; rounding only
//! happens through `ProjectionResult::rounded` at display time.
//!
//! `PlanInputs` mirrors the calculator page's inputs and clamps them to the
//! slider bounds before building a `ContributionPlan`.

pub mod calculator;
pub mod inputs;

pub use calculator::{project, ContributionPlan, ProjectionResult};
pub use inputs::{plan_from_lead, DurationBand, PlanInputs};
