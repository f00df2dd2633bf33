//! Submission pipeline — the terminal action of the wizard.

use std::sync::Arc;

use crate::error::SubmissionError;
use crate::ports::{Navigator, PaymentGateway, PaymentReceipt, ProfileStore, ProfileUpdate};
use crate::wizard::EnrollmentDraft;

/// Charges the payment gateway, marks enrollment complete on the profile,
/// and navigates to the authenticated area. Only reachable once the
/// payment step's gate holds; the wizard enforces that.
pub struct SubmissionPipeline {
    gateway: Arc<dyn PaymentGateway>,
    profile: Arc<dyn ProfileStore>,
    navigator: Arc<dyn Navigator>,
    dashboard_path: String,
}

impl SubmissionPipeline {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        profile: Arc<dyn ProfileStore>,
        navigator: Arc<dyn Navigator>,
        dashboard_path: String,
    ) -> Self {
        Self {
            gateway,
            profile,
            navigator,
            dashboard_path,
        }
    }

    /// Run the pipeline. On any failure the draft (held by the caller) is
    /// untouched, so a retry needs no re-entry.
    pub async fn process(
        &self,
        draft: &EnrollmentDraft,
    ) -> Result<PaymentReceipt, SubmissionError> {
        let receipt = self.gateway.charge(&draft.payment).await?;
        tracing::debug!(reference = %receipt.reference, "Payment accepted");

        self.profile
            .update_user(ProfileUpdate::enrollment_completed())
            .await?;

        self.navigator.navigate(&self.dashboard_path);
        Ok(receipt)
    }
}
