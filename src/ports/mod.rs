//! External collaborators, injected as trait objects rather than read from
//! ambient state. The wizard core treats all of these as opaque: it does
//! not know or care whether they are backed by an API, local storage, or
//! the in-memory implementations in [`memory`].

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProfileError, SubmissionError};
use crate::wizard::PaymentDetails;

/// Partial update applied to the trainee's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_enrollment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_enrollment_at: Option<DateTime<Utc>>,
}

impl ProfileUpdate {
    /// The update the submission pipeline applies on success.
    pub fn enrollment_completed() -> Self {
        Self {
            completed_enrollment: Some(true),
            completed_enrollment_at: Some(Utc::now()),
        }
    }
}

/// User-profile collaborator.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Apply a partial update to the current user's profile.
    async fn update_user(&self, update: ProfileUpdate) -> Result<(), ProfileError>;
}

/// Session/auth collaborator.
#[async_trait]
pub trait Session: Send + Sync {
    /// End the session. Invoked when the user backs out of the first
    /// wizard step.
    async fn logout(&self);
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Client-side navigation collaborator.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Receipt returned by a successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub reference: Uuid,
    pub processed_at: DateTime<Utc>,
}

/// Payment collaborator used by the submission pipeline.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, payment: &PaymentDetails) -> Result<PaymentReceipt, SubmissionError>;
}
