//! Wizard steps and their validation schemas.
//!
//! Each step carries one declarative [`Schema`]; its presence projection
//! (`Schema::gate`) is the step predicate used for navigation gating, so
//! there is a single source of truth for both field errors and gating.

use serde::{Deserialize, Serialize};

use crate::schema::{Format, Rule, Schema};

/// The four data-entry steps, in order.
///
/// Navigation only ever moves between adjacent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalDetails,
    Contact,
    Documents,
    Payment,
}

/// What backing out of a step means: a move to the previous step, or an
/// exit from the wizard entirely (only from the first step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    Back(WizardStep),
    Exit,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::PersonalDetails,
        Self::Contact,
        Self::Documents,
        Self::Payment,
    ];

    /// 1-based position.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::PersonalDetails => 1,
            Self::Contact => 2,
            Self::Documents => 3,
            Self::Payment => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalDetails => "Personal details",
            Self::Contact => "Contact details",
            Self::Documents => "Documents",
            Self::Payment => "Payment",
        }
    }

    /// Whether this is the last data-entry step. Advancing past it means
    /// submission, not a further step.
    pub fn is_last(&self) -> bool {
        matches!(self, Self::Payment)
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::PersonalDetails => Some(Self::Contact),
            Self::Contact => Some(Self::Documents),
            Self::Documents => Some(Self::Payment),
            Self::Payment => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            Self::PersonalDetails => None,
            Self::Contact => Some(Self::PersonalDetails),
            Self::Documents => Some(Self::Contact),
            Self::Payment => Some(Self::Documents),
        }
    }

    /// Full validation schema for this step. `min_documents` only affects
    /// the documents step.
    pub fn schema(&self, min_documents: usize) -> Schema {
        match self {
            Self::PersonalDetails => Schema::new()
                .field("personal.photo", vec![Rule::Required])
                .field(
                    "personal.name",
                    vec![Rule::Required, Rule::MinLength(2), Rule::MaxLength(60)],
                )
                .field(
                    "personal.full_name",
                    vec![Rule::Required, Rule::MinLength(2), Rule::MaxLength(120)],
                )
                .labeled(
                    "personal.nic",
                    "NIC",
                    vec![Rule::Required, Rule::Format(Format::Nic)],
                )
                .field("personal.address", vec![Rule::Required, Rule::MinLength(5)])
                .field("personal.institute", vec![Rule::Required])
                .field("personal.course", vec![Rule::Required]),
            Self::Contact => Schema::new()
                .field(
                    "contact.email",
                    vec![Rule::Required, Rule::Format(Format::Email)],
                )
                .labeled(
                    "contact.mobile_no",
                    "Mobile number",
                    vec![Rule::Required, Rule::Format(Format::Phone)],
                )
                .field("contact.emergency_contact_name", vec![Rule::Required])
                .labeled(
                    "contact.emergency_contact_no",
                    "Emergency contact number",
                    vec![Rule::Required, Rule::Format(Format::Phone)],
                ),
            Self::Documents => {
                Schema::new().field("documents", vec![Rule::MinItems(min_documents)])
            }
            Self::Payment => Schema::new()
                .field(
                    "payment.card_holder",
                    vec![Rule::Required, Rule::MinLength(2)],
                )
                .field(
                    "payment.card_number",
                    vec![Rule::Required, Rule::Format(Format::CardNumber)],
                )
                .field("payment.expiry", vec![Rule::Required, Rule::Format(Format::Expiry)])
                .labeled(
                    "payment.cvv",
                    "CVV",
                    vec![Rule::Required, Rule::Format(Format::Cvv)],
                ),
        }
    }

    /// User-visible message shown when advancing is attempted with this
    /// step incomplete. Distinct per step; never silent.
    pub fn gate_message(&self) -> &'static str {
        match self {
            Self::PersonalDetails => "Please complete all personal details before continuing",
            Self::Contact => "Please complete your contact details before continuing",
            Self::Documents => "Please upload the required documents before continuing",
            Self::Payment => "Please fill in all payment details before submitting",
        }
    }
}

/// Merge every step's schema into one whole-form schema.
pub fn full_schema(min_documents: usize) -> Schema {
    WizardStep::ALL
        .iter()
        .fold(Schema::new(), |schema, step| {
            schema.merge(step.schema(min_documents))
        })
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
