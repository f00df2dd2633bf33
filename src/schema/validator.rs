//! Schema evaluation.

use std::collections::BTreeMap;

use serde_json::Value;

use super::path;
use super::rules::{FieldRules, Rule};

/// Outcome of validating a candidate against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Field path → first failing rule's message for that field.
    Invalid(BTreeMap<String, String>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The error map, empty when valid.
    pub fn into_errors(self) -> BTreeMap<String, String> {
        match self {
            Self::Valid => BTreeMap::new(),
            Self::Invalid(errors) => errors,
        }
    }

    pub fn errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => Some(errors),
        }
    }
}

/// An ordered set of field rules evaluated against a JSON candidate.
///
/// Validation is pure: the candidate is never mutated and the same input
/// always yields the same error map. Fields present in the candidate but
/// absent from the schema are ignored.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rules for a field, deriving the label from the path.
    pub fn field(self, path: &str, rules: Vec<Rule>) -> Self {
        let label = path::humanize(path);
        self.labeled(path, &label, rules)
    }

    /// Register rules for a field with an explicit label.
    pub fn labeled(mut self, path: &str, label: &str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules {
            path: path.to_string(),
            label: label.to_string(),
            rules,
        });
        self
    }

    /// Append another schema's fields, preserving order.
    pub fn merge(mut self, other: Schema) -> Self {
        self.fields.extend(other.fields);
        self
    }

    /// Field paths covered by this schema.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.path.as_str())
    }

    /// Projection keeping only presence rules (`Required`, `MinItems`).
    ///
    /// Step gating uses this so that a step can be left with a well-formed
    /// but unpolished value (a format failure still surfaces as a field
    /// error, it just never blocks navigation on its own).
    pub fn gate(&self) -> Schema {
        let fields = self
            .fields
            .iter()
            .filter_map(|f| {
                let rules: Vec<Rule> =
                    f.rules.iter().filter(|r| r.is_presence()).cloned().collect();
                if rules.is_empty() {
                    None
                } else {
                    Some(FieldRules {
                        path: f.path.clone(),
                        label: f.label.clone(),
                        rules,
                    })
                }
            })
            .collect();
        Schema { fields }
    }

    /// Validate a candidate, collecting every failing field.
    ///
    /// Each field keeps the message of its first failing rule, in rule
    /// registration order.
    pub fn validate(&self, candidate: &Value) -> Validation {
        let mut errors = BTreeMap::new();
        for field in &self.fields {
            for rule in &field.rules {
                if let Some(message) = check_rule(rule, field, candidate) {
                    errors.entry(field.path.clone()).or_insert(message);
                    break;
                }
            }
        }
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(errors)
        }
    }

    /// Validate the whole candidate and extract the error (if any) for a
    /// single path. Cross-field rules need the full record even when only
    /// one field is being checked.
    pub fn error_for(&self, path: &str, candidate: &Value) -> Option<String> {
        self.validate(candidate)
            .into_errors()
            .remove(path)
    }
}

fn check_rule(rule: &Rule, field: &FieldRules, candidate: &Value) -> Option<String> {
    let value = path::resolve(candidate, &field.path);
    let label = field.label.as_str();

    match rule {
        Rule::Required => {
            (!path::is_present(value)).then(|| format!("{label} is required"))
        }
        Rule::MinItems(min) => {
            let count = value.and_then(Value::as_array).map_or(0, Vec::len);
            (count < *min).then(|| format!("At least {min} items are required"))
        }
        // Shape rules only fire on present string values.
        Rule::MinLength(min) => present_str(value).and_then(|s| {
            (s.chars().count() < *min)
                .then(|| format!("{label} must be at least {min} characters"))
        }),
        Rule::MaxLength(max) => present_str(value).and_then(|s| {
            (s.chars().count() > *max)
                .then(|| format!("{label} must be at most {max} characters"))
        }),
        Rule::Pattern(re) => present_str(value)
            .and_then(|s| (!re.is_match(s)).then(|| format!("{label} is invalid"))),
        Rule::Format(format) => present_str(value)
            .and_then(|s| (!format.matches(s)).then(|| format.message().to_string())),
        Rule::EqualsField(other_path) => {
            let other = path::resolve(candidate, other_path);
            (value != other).then(|| {
                format!("{label} does not match {}", path::humanize(other_path).to_lowercase())
            })
        }
    }
}

fn present_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}
