//! The in-memory enrollment draft accumulated across wizard steps.
//!
//! The draft is created empty when the wizard starts, mutated in place as
//! the user types, and never persisted: it is discarded on successful
//! submission or abandonment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Step 1 — personal identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub photo: Option<UploadedDocument>,
    pub name: String,
    pub full_name: String,
    pub nic: String,
    pub address: String,
    pub institute: String,
    pub course: String,
}

/// Step 2 — contact fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub mobile_no: String,
    pub emergency_contact_name: String,
    pub emergency_contact_no: String,
}

/// A reference to an uploaded file. Content never enters the draft; only
/// the metadata needed for display and type checks is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedDocument {
    pub fn new(file_name: &str, media_type: &str, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            size_bytes,
            uploaded_at: Utc::now(),
        }
    }
}

/// Step 4 — payment instrument fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub card_holder: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// The whole multi-step form state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentDraft {
    pub personal: PersonalDetails,
    pub contact: ContactDetails,
    pub documents: Vec<UploadedDocument>,
    pub payment: PaymentDetails,
}

impl EnrollmentDraft {
    /// Snapshot the draft as a JSON candidate for schema validation.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize enrollment draft: {e}");
            Value::Null
        })
    }
}
