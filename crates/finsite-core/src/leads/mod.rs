//! Lead-capture form submission.
//!
//! Each page's enquiry form is a `LeadForm` with its own required fields and
//! fixed `subject` / `formType` / `pageForm` metadata. `LeadClient` validates
//! a `LeadSubmission` and POSTs it to the backend's intake endpoint.

pub mod client;
pub mod error;
pub mod form;

pub use client::{LeadClient, LeadReceipt};
pub use error::LeadError;
pub use form::{Encoding, LeadForm, LeadSubmission};
