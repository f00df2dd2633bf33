//! Error types for Enroll Assist.

use crate::wizard::WizardStep;

/// Top-level error type for the enrollment core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Wizard state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} is incomplete: {message}")]
    StepIncomplete { step: WizardStep, message: String },

    #[error("Enrollment already submitted")]
    AlreadySubmitted,

    #[error("Submission already in progress")]
    SubmissionInProgress,

    #[error("Submission is only available from the payment step")]
    NotAtPaymentStep,
}

/// Submission pipeline errors. The draft is always retained on failure so
/// the user can retry without re-entering data.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Payment was declined: {reason}")]
    Declined { reason: String },

    #[error("Payment gateway failed: {0}")]
    Gateway(String),

    #[error("Profile update failed: {0}")]
    Profile(#[from] ProfileError),
}

/// User-profile collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found for user {user_id}")]
    NotFound { user_id: String },

    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for the enrollment core.
pub type Result<T> = std::result::Result<T, Error>;
