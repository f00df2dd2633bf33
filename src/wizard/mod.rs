//! Enrollment wizard — the multi-step draft record, step schemas, and the
//! gated state machine that moves between them.

pub mod draft;
pub mod machine;
pub mod step;

pub use draft::{
    ContactDetails, EnrollmentDraft, PaymentDetails, PersonalDetails, UploadedDocument,
};
pub use machine::{EnrollmentWizard, WizardDeps, WizardState};
pub use step::{BackAction, WizardStep};
