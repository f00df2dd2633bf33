//! In-memory collaborator implementations.
//!
//! These stand in for the real profile/session/notification/navigation
//! services the way the original front end's local-storage mocks did.
//! The recording variants double as assertion points in tests and as the
//! transcript source for the demo binary.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProfileError, SubmissionError};
use crate::wizard::PaymentDetails;

use super::{
    Navigator, Notifier, PaymentGateway, PaymentReceipt, ProfileStore, ProfileUpdate, Session,
};

/// Trainee profile held by the in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraineeProfile {
    pub completed_enrollment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_enrollment_at: Option<DateTime<Utc>>,
}

/// Profile store over a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profile: RwLock<TraineeProfile>,
    updates: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> TraineeProfile {
        self.profile.read().await.clone()
    }

    /// Number of `update_user` calls observed.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn update_user(&self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let mut profile = self.profile.write().await;
        if let Some(completed) = update.completed_enrollment {
            profile.completed_enrollment = completed;
        }
        if let Some(at) = update.completed_enrollment_at {
            profile.completed_enrollment_at = Some(at);
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Session that counts logouts instead of ending anything.
#[derive(Debug, Default)]
pub struct RecordingSession {
    logouts: AtomicUsize,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Session logged out");
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
}

/// One recorded notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Notifier that records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(Notice {
                level,
                message: message.to_string(),
            });
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeLevel::Error, message);
    }

    fn warning(&self, message: &str) {
        self.push(NoticeLevel::Warning, message);
    }
}

/// Navigator that records visited paths.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().expect("navigator mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigating");
        self.visits
            .lock()
            .expect("navigator mutex poisoned")
            .push(path.to_string());
    }
}

/// Payment gateway that sleeps an artificial delay and always succeeds,
/// unless primed to fail once.
#[derive(Debug)]
pub struct SimulatedGateway {
    delay: Duration,
    fail_next: AtomicBool,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Gateway with no artificial delay, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Make the next `charge` call fail with a gateway error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, payment: &PaymentDetails) -> Result<PaymentReceipt, SubmissionError> {
        let jitter = if self.delay.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..250))
        };
        tokio::time::sleep(self.delay + jitter).await;

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SubmissionError::Gateway(
                "simulated gateway outage".to_string(),
            ));
        }

        tracing::debug!(card_holder = %payment.card_holder, "Simulated charge accepted");
        Ok(PaymentReceipt {
            reference: Uuid::new_v4(),
            processed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn profile_store_applies_partial_updates() {
        let store = MemoryProfileStore::new();
        assert!(!store.snapshot().await.completed_enrollment);

        store
            .update_user(ProfileUpdate::enrollment_completed())
            .await
            .unwrap();

        let profile = store.snapshot().await;
        assert!(profile.completed_enrollment);
        assert!(profile.completed_enrollment_at.is_some());
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test]
    async fn session_counts_logouts() {
        let session = RecordingSession::new();
        session.logout().await;
        session.logout().await;
        assert_eq!(session.logout_count(), 2);
    }

    #[test]
    fn notifier_records_levels() {
        let notifier = RecordingNotifier::new();
        notifier.success("done");
        notifier.warning("careful");
        notifier.error("broken");
        notifier.error("still broken");

        assert_eq!(notifier.count(NoticeLevel::Success), 1);
        assert_eq!(notifier.count(NoticeLevel::Warning), 1);
        assert_eq!(notifier.count(NoticeLevel::Error), 2);
        assert_eq!(notifier.notices()[0].message, "done");
    }

    #[tokio::test]
    async fn gateway_succeeds_then_fails_when_primed() {
        let gateway = SimulatedGateway::instant();
        let payment = PaymentDetails {
            card_holder: "K. Perera".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        };

        assert!(gateway.charge(&payment).await.is_ok());

        gateway.fail_next();
        let err = gateway.charge(&payment).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Gateway(_)));

        // Failure is one-shot: the next charge succeeds again.
        assert!(gateway.charge(&payment).await.is_ok());
    }
}
