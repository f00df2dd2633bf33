//! The gated wizard state machine.

use std::sync::Arc;

use crate::config::WizardConfig;
use crate::controller::FormController;
use crate::error::{Error, WizardError};
use crate::ports::{Navigator, Notifier, PaymentGateway, PaymentReceipt, ProfileStore, Session};
use crate::submit::SubmissionPipeline;

use super::draft::{EnrollmentDraft, UploadedDocument};
use super::step::{self, BackAction, WizardStep};

/// Collaborators the wizard needs, injected at construction so the wizard
/// is testable without an application shell.
pub struct WizardDeps {
    pub session: Arc<dyn Session>,
    pub notifier: Arc<dyn Notifier>,
    pub profile: Arc<dyn ProfileStore>,
    pub navigator: Arc<dyn Navigator>,
    pub gateway: Arc<dyn PaymentGateway>,
}

/// Where the wizard currently is: one of the data-entry steps, or the
/// terminal submitted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    InProgress(WizardStep),
    Submitted,
}

/// The enrollment wizard: holds the draft, the current step, a field
/// validation controller over the whole form, and the submission pipeline.
pub struct EnrollmentWizard {
    config: WizardConfig,
    draft: EnrollmentDraft,
    state: WizardState,
    controller: FormController,
    session: Arc<dyn Session>,
    notifier: Arc<dyn Notifier>,
    pipeline: SubmissionPipeline,
    submitting: bool,
}

impl EnrollmentWizard {
    pub fn new(config: WizardConfig, deps: WizardDeps) -> Self {
        let controller = FormController::with_options(
            step::full_schema(config.min_documents),
            config.validation,
        );
        let pipeline = SubmissionPipeline::new(
            deps.gateway,
            deps.profile,
            deps.navigator,
            config.dashboard_path.clone(),
        );
        Self {
            config,
            draft: EnrollmentDraft::default(),
            state: WizardState::InProgress(WizardStep::PersonalDetails),
            controller,
            session: deps.session,
            notifier: deps.notifier,
            pipeline,
            submitting: false,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Current data-entry step, `None` once submitted.
    pub fn current_step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::InProgress(step) => Some(step),
            WizardState::Submitted => None,
        }
    }

    pub fn draft(&self) -> &EnrollmentDraft {
        &self.draft
    }

    /// Mutable access to the draft. Callers editing a field should follow
    /// up with [`field_changed`](Self::field_changed) or
    /// [`field_blurred`](Self::field_blurred) so the error map stays live.
    pub fn draft_mut(&mut self) -> &mut EnrollmentDraft {
        &mut self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Live field error map (field path → message).
    pub fn field_errors(&self) -> &std::collections::BTreeMap<String, String> {
        self.controller.errors()
    }

    pub fn field_error(&self, path: &str) -> Option<&str> {
        self.controller.error(path)
    }

    /// A field's value changed; re-validates per the controller's mode.
    pub fn field_changed(&mut self, path: &str) {
        let record = self.draft.to_value();
        self.controller.handle_change(path, &record);
    }

    /// A field lost focus; marks it touched and re-validates per the
    /// controller's mode.
    pub fn field_blurred(&mut self, path: &str) {
        let record = self.draft.to_value();
        self.controller.handle_blur(path, &record);
    }

    /// Step predicate: the step's presence gate against the current draft.
    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        step.schema(self.config.min_documents)
            .gate()
            .validate(&self.draft.to_value())
            .is_valid()
    }

    /// Advance to the next step if the current step's gate passes.
    ///
    /// A failed gate leaves the step unchanged and reports the step's
    /// message through the notifier. Successful transitions are silent
    /// apart from a debug trace. Advancing from the last step is a no-op;
    /// submission is a separate action.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.current_step().ok_or(WizardError::AlreadySubmitted)?;
        if !self.is_step_valid(step) {
            self.notifier.error(step.gate_message());
            return Err(WizardError::StepIncomplete {
                step,
                message: step.gate_message().to_string(),
            });
        }
        match step.next() {
            Some(next) => {
                self.state = WizardState::InProgress(next);
                tracing::debug!(from = %step, to = %next, "Advanced wizard step");
                Ok(next)
            }
            None => Ok(step),
        }
    }

    /// Move back one step, or exit the wizard from the first step.
    ///
    /// Backing out of step 1 logs the session out and leaves the step
    /// pointer untouched; everywhere else the move is unconditional (no
    /// validity gate going backward).
    pub async fn back(&mut self) -> Result<BackAction, WizardError> {
        let step = self.current_step().ok_or(WizardError::AlreadySubmitted)?;
        match step.previous() {
            None => {
                tracing::debug!("Backed out of the wizard, logging out");
                self.session.logout().await;
                Ok(BackAction::Exit)
            }
            Some(previous) => {
                self.state = WizardState::InProgress(previous);
                tracing::debug!(from = %step, to = %previous, "Stepped back");
                Ok(BackAction::Back(previous))
            }
        }
    }

    /// Add uploaded files to the accepted document set.
    ///
    /// Files with unaccepted media types are dropped and reported as one
    /// aggregate warning, not per file. Returns the number accepted.
    pub fn accept_documents(&mut self, files: Vec<UploadedDocument>) -> usize {
        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| self.config.accepts_media_type(&f.media_type));

        if !rejected.is_empty() {
            self.notifier.warning(&format!(
                "{} file(s) were rejected: only images and PDF documents are accepted",
                rejected.len()
            ));
        }

        let count = accepted.len();
        self.draft.documents.extend(accepted);
        count
    }

    /// Set the profile photo. Only images are accepted; a rejection is
    /// reported as a warning and returns false.
    pub fn attach_photo(&mut self, photo: UploadedDocument) -> bool {
        if !photo.media_type.starts_with("image/") {
            self.notifier
                .warning("The profile photo must be an image file");
            return false;
        }
        self.draft.personal.photo = Some(photo);
        true
    }

    /// Run the submission pipeline. Only available from the payment step
    /// with its gate satisfied, once, and never concurrently.
    ///
    /// On failure the draft is retained and the wizard stays on the
    /// payment step so the user can retry.
    pub async fn submit(&mut self) -> Result<PaymentReceipt, Error> {
        let step = self.current_step().ok_or(WizardError::AlreadySubmitted)?;
        if !step.is_last() {
            return Err(WizardError::NotAtPaymentStep.into());
        }
        if self.submitting {
            return Err(WizardError::SubmissionInProgress.into());
        }
        if !self.is_step_valid(step) {
            self.notifier.error(step.gate_message());
            return Err(WizardError::StepIncomplete {
                step,
                message: step.gate_message().to_string(),
            }
            .into());
        }

        self.submitting = true;
        let result = self.pipeline.process(&self.draft).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.state = WizardState::Submitted;
                self.notifier
                    .success("Enrollment completed successfully. Welcome aboard!");
                Ok(receipt)
            }
            Err(e) => {
                self.notifier.error(&format!(
                    "Payment failed: {e}. Your details were kept, please try again."
                ));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::memory::{
        MemoryProfileStore, NoticeLevel, RecordingNavigator, RecordingNotifier, RecordingSession,
        SimulatedGateway,
    };

    struct Harness {
        wizard: EnrollmentWizard,
        session: Arc<RecordingSession>,
        notifier: Arc<RecordingNotifier>,
        profile: Arc<MemoryProfileStore>,
        navigator: Arc<RecordingNavigator>,
        gateway: Arc<SimulatedGateway>,
    }

    fn harness() -> Harness {
        let session = Arc::new(RecordingSession::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let profile = Arc::new(MemoryProfileStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let gateway = Arc::new(SimulatedGateway::instant());

        let config = WizardConfig {
            gateway_delay: std::time::Duration::ZERO,
            ..WizardConfig::default()
        };
        let wizard = EnrollmentWizard::new(
            config,
            WizardDeps {
                session: Arc::clone(&session) as Arc<dyn Session>,
                notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
                profile: Arc::clone(&profile) as Arc<dyn ProfileStore>,
                navigator: Arc::clone(&navigator) as Arc<dyn Navigator>,
                gateway: Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            },
        );

        Harness {
            wizard,
            session,
            notifier,
            profile,
            navigator,
            gateway,
        }
    }

    fn fill_personal(wizard: &mut EnrollmentWizard) {
        let personal = &mut wizard.draft_mut().personal;
        personal.photo = Some(UploadedDocument::new("me.png", "image/png", 1024));
        personal.name = "Kasun".to_string();
        personal.full_name = "Kasun Perera".to_string();
        personal.nic = "981234567V".to_string();
        personal.address = "12, Galle Road, Colombo".to_string();
        personal.institute = "NIBM".to_string();
        personal.course = "Software Engineering".to_string();
    }

    fn fill_contact(wizard: &mut EnrollmentWizard) {
        let contact = &mut wizard.draft_mut().contact;
        contact.email = "kasun@example.com".to_string();
        contact.mobile_no = "0771234567".to_string();
        contact.emergency_contact_name = "Nimal Perera".to_string();
        contact.emergency_contact_no = "0719876543".to_string();
    }

    fn fill_documents(wizard: &mut EnrollmentWizard) {
        wizard.accept_documents(vec![
            UploadedDocument::new("nic.pdf", "application/pdf", 100),
            UploadedDocument::new("certificate.pdf", "application/pdf", 100),
            UploadedDocument::new("slip.png", "image/png", 100),
        ]);
    }

    fn fill_payment(wizard: &mut EnrollmentWizard) {
        let payment = &mut wizard.draft_mut().payment;
        payment.card_holder = "K. Perera".to_string();
        payment.card_number = "4242424242424242".to_string();
        payment.expiry = "12/27".to_string();
        payment.cvv = "123".to_string();
    }

    fn at_payment(h: &mut Harness) {
        fill_personal(&mut h.wizard);
        h.wizard.next().unwrap();
        fill_contact(&mut h.wizard);
        h.wizard.next().unwrap();
        fill_documents(&mut h.wizard);
        h.wizard.next().unwrap();
        assert_eq!(h.wizard.current_step(), Some(WizardStep::Payment));
    }

    #[test]
    fn next_on_invalid_step_stays_put_and_notifies() {
        let mut h = harness();
        let err = h.wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::StepIncomplete { .. }));
        assert_eq!(h.wizard.current_step(), Some(WizardStep::PersonalDetails));
        assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
        assert_eq!(
            h.notifier.notices()[0].message,
            WizardStep::PersonalDetails.gate_message()
        );
    }

    #[test]
    fn next_advances_when_gate_passes() {
        let mut h = harness();
        fill_personal(&mut h.wizard);
        assert_eq!(h.wizard.next().unwrap(), WizardStep::Contact);

        // Step 2 untouched: next() fails again, pointer stays.
        let err = h.wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::StepIncomplete { .. }));
        assert_eq!(h.wizard.current_step(), Some(WizardStep::Contact));
        assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn back_at_first_step_logs_out_once_without_moving() {
        let mut h = harness();
        assert_eq!(h.wizard.back().await.unwrap(), BackAction::Exit);
        assert_eq!(h.session.logout_count(), 1);
        assert_eq!(h.wizard.current_step(), Some(WizardStep::PersonalDetails));
    }

    #[tokio::test]
    async fn back_is_ungated() {
        let mut h = harness();
        fill_personal(&mut h.wizard);
        h.wizard.next().unwrap();

        // Contact step is empty, but going back never checks validity.
        assert_eq!(
            h.wizard.back().await.unwrap(),
            BackAction::Back(WizardStep::PersonalDetails)
        );
        assert_eq!(h.session.logout_count(), 0);
    }

    #[test]
    fn document_gate_flips_after_third_upload() {
        let mut h = harness();
        h.wizard.accept_documents(vec![
            UploadedDocument::new("a.pdf", "application/pdf", 10),
            UploadedDocument::new("b.pdf", "application/pdf", 10),
        ]);
        assert!(!h.wizard.is_step_valid(WizardStep::Documents));

        h.wizard
            .accept_documents(vec![UploadedDocument::new("c.png", "image/png", 10)]);
        assert!(h.wizard.is_step_valid(WizardStep::Documents));
    }

    #[test]
    fn rejected_uploads_warn_once_in_aggregate() {
        let mut h = harness();
        let accepted = h.wizard.accept_documents(vec![
            UploadedDocument::new("a.pdf", "application/pdf", 10),
            UploadedDocument::new("malware.exe", "application/octet-stream", 10),
            UploadedDocument::new("notes.txt", "text/plain", 10),
        ]);

        assert_eq!(accepted, 1);
        assert_eq!(h.wizard.draft().documents.len(), 1);
        assert_eq!(h.notifier.count(NoticeLevel::Warning), 1);
        assert!(h.notifier.notices()[0].message.starts_with("2 file(s)"));
    }

    #[test]
    fn photo_must_be_an_image() {
        let mut h = harness();
        assert!(!h.wizard.attach_photo(UploadedDocument::new(
            "me.pdf",
            "application/pdf",
            10
        )));
        assert!(h.wizard.draft().personal.photo.is_none());
        assert_eq!(h.notifier.count(NoticeLevel::Warning), 1);

        assert!(h.wizard.attach_photo(UploadedDocument::new("me.png", "image/png", 10)));
        assert!(h.wizard.draft().personal.photo.is_some());
    }

    #[test]
    fn field_events_flow_through_controller() {
        let mut h = harness();
        h.wizard.draft_mut().contact.email = "bad".to_string();
        // Not yet touched: change alone does not validate in blur mode.
        h.wizard.field_changed("contact.email");
        assert!(h.wizard.field_error("contact.email").is_none());

        h.wizard.field_blurred("contact.email");
        assert_eq!(
            h.wizard.field_error("contact.email"),
            Some("Enter a valid email address")
        );

        h.wizard.draft_mut().contact.email = "kasun@example.com".to_string();
        h.wizard.field_changed("contact.email");
        assert!(h.wizard.field_error("contact.email").is_none());
    }

    #[tokio::test]
    async fn submit_before_payment_step_is_refused() {
        let mut h = harness();
        let err = h.wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Wizard(WizardError::NotAtPaymentStep)
        ));
    }

    #[tokio::test]
    async fn submit_with_incomplete_payment_notifies_and_refuses() {
        let mut h = harness();
        at_payment(&mut h);

        let err = h.wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Wizard(WizardError::StepIncomplete { .. })
        ));
        assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
        assert_eq!(h.profile.update_count(), 0);
    }

    #[tokio::test]
    async fn full_flow_submits_once_and_navigates_once() {
        let mut h = harness();
        at_payment(&mut h);
        fill_payment(&mut h.wizard);

        h.wizard.submit().await.unwrap();

        assert_eq!(h.wizard.state(), WizardState::Submitted);
        assert!(!h.wizard.is_submitting());
        assert_eq!(h.profile.update_count(), 1);
        assert!(h.profile.snapshot().await.completed_enrollment);
        assert_eq!(h.navigator.visits(), vec!["/trainee/dashboard".to_string()]);
        assert_eq!(h.notifier.count(NoticeLevel::Success), 1);

        // Terminal: a second submit is refused.
        let err = h.wizard.submit().await.unwrap_err();
        assert!(matches!(err, Error::Wizard(WizardError::AlreadySubmitted)));
        assert_eq!(h.profile.update_count(), 1);
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft_and_allows_retry() {
        let mut h = harness();
        at_payment(&mut h);
        fill_payment(&mut h.wizard);
        h.gateway.fail_next();

        let err = h.wizard.submit().await.unwrap_err();
        assert!(matches!(err, Error::Submission(_)));
        assert_eq!(h.wizard.current_step(), Some(WizardStep::Payment));
        assert!(!h.wizard.is_submitting());
        assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
        assert_eq!(h.profile.update_count(), 0);
        // Draft retained: no re-entry needed for the retry.
        assert_eq!(h.wizard.draft().payment.card_number, "4242424242424242");

        h.wizard.submit().await.unwrap();
        assert_eq!(h.wizard.state(), WizardState::Submitted);
        assert_eq!(h.profile.update_count(), 1);
    }
}
