//! Field validation controller — bridges a [`Schema`] into an interactive
//! editing session with touched-field tracking and submission orchestration.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::BoxFuture;
use serde_json::Value;

use crate::schema::Schema;

/// When validation fires during editing.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Validate on every keystroke.
    pub validate_on_change: bool,
    /// Validate when a field is blurred; once a field has been blurred,
    /// edits to it re-validate immediately.
    pub validate_on_blur: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            validate_on_blur: true,
        }
    }
}

/// Structured outcome of a submission attempt.
///
/// Submission failures get their own channel here instead of being folded
/// into the field error map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the action was never invoked and the error map
    /// is left populated for display.
    Rejected,
    /// The action ran and succeeded.
    Completed,
    /// The action ran and failed; the field error map is untouched.
    Failed(String),
}

/// Tracks the live error map, touched-field set, and submitting flag for
/// one form backed by a [`Schema`].
#[derive(Debug)]
pub struct FormController {
    schema: Schema,
    options: ValidationOptions,
    errors: BTreeMap<String, String>,
    touched: BTreeSet<String>,
    submitting: bool,
}

impl FormController {
    pub fn new(schema: Schema) -> Self {
        Self::with_options(schema, ValidationOptions::default())
    }

    pub fn with_options(schema: Schema, options: ValidationOptions) -> Self {
        Self {
            schema,
            options,
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    /// Current error map (field path → message).
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Error for a single field, if it currently fails validation.
    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn is_touched(&self, path: &str) -> bool {
        self.touched.contains(path)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Re-validate one field against the full record and patch its entry
    /// in the error map. Cross-field rules are why the whole record is
    /// validated even for a single-field check.
    pub fn validate_field(&mut self, path: &str, record: &Value) {
        match self.schema.error_for(path, record) {
            Some(message) => {
                self.errors.insert(path.to_string(), message);
            }
            None => {
                self.errors.remove(path);
            }
        }
    }

    /// Validate the whole record, replacing the entire error map.
    pub fn validate_form(&mut self, record: &Value) -> bool {
        let validation = self.schema.validate(record);
        let ok = validation.is_valid();
        self.errors = validation.into_errors();
        ok
    }

    /// A field's value changed. Validates only if the controller is in
    /// change-validation mode, or the field was already blurred once and
    /// blur-validation is on.
    pub fn handle_change(&mut self, path: &str, record: &Value) {
        if self.options.validate_on_change
            || (self.options.validate_on_blur && self.touched.contains(path))
        {
            self.validate_field(path, record);
        }
    }

    /// A field lost focus. Marks it touched and validates per the blur
    /// policy.
    pub fn handle_blur(&mut self, path: &str, record: &Value) {
        self.touched.insert(path.to_string());
        if self.options.validate_on_blur {
            self.validate_field(path, record);
        }
    }

    /// Validate and, if the record passes, run the caller's async action.
    ///
    /// On validation failure the action is never invoked. The submitting
    /// flag is cleared on every exit path; an action error is logged and
    /// surfaced as [`SubmitOutcome::Failed`] without touching the field
    /// error map.
    pub async fn submit<F>(&mut self, record: &Value, action: F) -> SubmitOutcome
    where
        F: FnOnce() -> BoxFuture<'static, anyhow::Result<()>>,
    {
        if !self.validate_form(record) {
            return SubmitOutcome::Rejected;
        }

        self.submitting = true;
        let result = action().await;
        self.submitting = false;

        match result {
            Ok(()) => SubmitOutcome::Completed,
            Err(e) => {
                tracing::warn!("Form submission action failed: {e:#}");
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Reset errors, touch state, and the submitting flag. The record
    /// itself lives with the caller.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.touched.clear();
        self.submitting = false;
    }
}
