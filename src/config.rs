//! Configuration types.

use std::time::Duration;

use crate::controller::ValidationOptions;

/// Enrollment wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Minimum number of accepted documents for the documents step.
    pub min_documents: usize,
    /// Accepted media-type prefixes for document uploads.
    pub accepted_media_types: Vec<String>,
    /// Base artificial delay for the simulated payment gateway.
    pub gateway_delay: Duration,
    /// Path the navigator is sent to after a successful submission.
    pub dashboard_path: String,
    /// When field validation fires during editing.
    pub validation: ValidationOptions,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            min_documents: 3,
            accepted_media_types: vec!["image/".to_string(), "application/pdf".to_string()],
            gateway_delay: Duration::from_millis(1500),
            dashboard_path: "/trainee/dashboard".to_string(),
            validation: ValidationOptions::default(),
        }
    }
}

impl WizardConfig {
    /// Whether an uploaded file's media type is accepted.
    pub fn accepts_media_type(&self, media_type: &str) -> bool {
        self.accepted_media_types
            .iter()
            .any(|prefix| media_type.starts_with(prefix.as_str()))
    }
}
