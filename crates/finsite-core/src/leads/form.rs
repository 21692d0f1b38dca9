use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::LeadError;

/// Contact fields every form collects.
const CONTACT_FIELDS: &[&str] = &["name", "email", "mobile"];

/// Digits expected in a mobile number.
const MOBILE_DIGITS: usize = 10;

/// Body encoding of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Multipart,
    Json,
}

impl Encoding {
    pub fn other(self) -> Self {
        match self {
            Self::Multipart => Self::Json,
            Self::Json => Self::Multipart,
        }
    }
}

/// The lead-capture forms on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadForm {
    HomepageHero,
    TermInsurance,
    HealthInsurance,
    MotorInsurance,
    SipInvestment,
    RetirementPlanning,
    FinancialPlanning,
}

impl LeadForm {
    pub const ALL: [LeadForm; 7] = [
        LeadForm::HomepageHero,
        LeadForm::TermInsurance,
        LeadForm::HealthInsurance,
        LeadForm::MotorInsurance,
        LeadForm::SipInvestment,
        LeadForm::RetirementPlanning,
        LeadForm::FinancialPlanning,
    ];

    /// Short identifier used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Self::HomepageHero => "hero",
            Self::TermInsurance => "term-insurance",
            Self::HealthInsurance => "health-insurance",
            Self::MotorInsurance => "motor-insurance",
            Self::SipInvestment => "sip-investment",
            Self::RetirementPlanning => "retirement-planning",
            Self::FinancialPlanning => "financial-planning",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|form| form.slug() == slug)
    }

    /// Fields beyond name/email/mobile that must be filled in.
    pub fn extra_required_fields(self) -> &'static [&'static str] {
        match self {
            Self::HomepageHero => &["product"],
            Self::TermInsurance => &["gender", "age", "annualIncome", "coverageAmount"],
            Self::HealthInsurance => &["gender", "age", "existingInsurance", "medicalHistory"],
            Self::MotorInsurance => &["gender", "vehicleType", "vehicleAge", "vehicleBrand"],
            Self::SipInvestment => &["gender", "riskTolerance", "investmentAmount", "investmentDuration"],
            Self::RetirementPlanning => &["gender", "age", "retirementYear", "monthlyIncome"],
            Self::FinancialPlanning => &["gender", "age", "monthlyIncome"],
        }
    }

    pub fn required_fields(self) -> Vec<&'static str> {
        CONTACT_FIELDS
            .iter()
            .chain(self.extra_required_fields())
            .copied()
            .collect()
    }

    pub fn subject(self) -> &'static str {
        match self {
            Self::HomepageHero => "Homepage Hero Form Inquiry",
            Self::TermInsurance => "Term Insurance Inquiry",
            Self::HealthInsurance => "Health Insurance Inquiry",
            Self::MotorInsurance => "Motor Insurance Inquiry",
            Self::SipInvestment => "SIP Investment Inquiry",
            Self::RetirementPlanning => "Retirement Planning Inquiry",
            Self::FinancialPlanning => "Financial Planning Inquiry",
        }
    }

    pub fn form_type(self) -> &'static str {
        match self {
            Self::HomepageHero => "Homepage Hero Form",
            Self::TermInsurance => "Term Insurance",
            Self::HealthInsurance => "Health Insurance",
            Self::MotorInsurance => "Motor Insurance",
            Self::SipInvestment => "SIP Investment",
            Self::RetirementPlanning => "Retirement Planning",
            Self::FinancialPlanning => "Financial Planning",
        }
    }

    pub fn page_form(self) -> &'static str {
        match self {
            Self::HomepageHero => "Homepage Hero Section",
            Self::TermInsurance => "Term Insurance Page",
            Self::HealthInsurance => "Health Insurance Page",
            Self::MotorInsurance => "Motor Insurance Page",
            Self::SipInvestment => "SIP Investment Page",
            Self::RetirementPlanning => "Retirement Planning Page",
            Self::FinancialPlanning => "Financial Planning Page",
        }
    }

    /// The hero form goes out as JSON first; page forms as multipart.
    pub fn preferred_encoding(self) -> Encoding {
        match self {
            Self::HomepageHero => Encoding::Json,
            _ => Encoding::Multipart,
        }
    }
}

/// A filled-in form ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub form: LeadForm,
    pub fields: BTreeMap<String, String>,
}

impl LeadSubmission {
    pub fn new(form: LeadForm) -> Self {
        Self {
            form,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    pub fn validate(&self) -> Result<(), LeadError> {
        let missing: Vec<String> = self
            .form
            .required_fields()
            .into_iter()
            .filter(|field| self.value(field).is_empty())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LeadError::MissingFields(missing));
        }

        let email = self.value("email");
        if !is_valid_email(email) {
            return Err(LeadError::InvalidEmail(email.to_string()));
        }

        let mobile = self.value("mobile");
        if !is_valid_mobile(mobile) {
            return Err(LeadError::InvalidMobile(mobile.to_string()));
        }
        Ok(())
    }

    /// Form fields followed by the `subject`, `formType` and `pageForm` metadata.
    pub fn payload(&self) -> Vec<(String, String)> {
        let mut payload: Vec<(String, String)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        payload.push(("subject".to_string(), self.form.subject().to_string()));
        payload.push(("formType".to_string(), self.form.form_type().to_string()));
        payload.push(("pageForm".to_string(), self.form.page_form().to_string()));
        payload
    }
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Exactly ten digits once punctuation and spaces are removed.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.chars().filter(|c| c.is_ascii_digit()).count() == MOBILE_DIGITS
}
