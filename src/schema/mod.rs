//! Declarative validation schemas.
//!
//! A [`Schema`] is an ordered set of field rules evaluated against a JSON
//! candidate. Validation is pure and collects every failing field into an
//! error map keyed by dot-delimited field path.

pub mod path;
pub mod rules;
pub mod validator;

pub use rules::{FieldRules, Format, Rule};
pub use validator::{Schema, Validation};
