//! Field rules and well-known input formats.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0\d{9}$").expect("phone regex"));
static NIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{9}[VvXx]|\d{12})$").expect("nic regex"));
static CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{13,19}$").expect("card regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiry regex"));
static CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("cvv regex"));

/// Well-known input formats with built-in patterns and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    /// Local 10-digit number starting with 0.
    Phone,
    /// National identity card: 9 digits + V/X, or 12 digits.
    Nic,
    /// 13–19 digits, spaces allowed.
    CardNumber,
    /// MM/YY.
    Expiry,
    /// 3 or 4 digits.
    Cvv,
}

impl Format {
    /// Check a raw string value against this format.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_RE.is_match(value),
            Self::Phone => PHONE_RE.is_match(value),
            Self::Nic => NIC_RE.is_match(value),
            Self::CardNumber => {
                let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                CARD_RE.is_match(&digits)
            }
            Self::Expiry => EXPIRY_RE.is_match(value),
            Self::Cvv => CVV_RE.is_match(value),
        }
    }

    /// Failure message for this format.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Email => "Enter a valid email address",
            Self::Phone => "Enter a valid 10-digit mobile number",
            Self::Nic => "Enter a valid NIC number",
            Self::CardNumber => "Enter a valid card number",
            Self::Expiry => "Expiry must be in MM/YY format",
            Self::Cvv => "Enter a valid CVV",
        }
    }
}

/// A single validation rule applied to one field.
///
/// Length, pattern, and format rules are skipped while the field is absent
/// or blank; only [`Rule::Required`] and [`Rule::MinItems`] report missing
/// values.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Format(Format),
    /// The field must equal the value at the given path. The error attaches
    /// to this field, not the referenced one.
    EqualsField(String),
    /// Minimum number of elements in an array field.
    MinItems(usize),
}

impl Rule {
    /// Whether the rule checks presence rather than shape. Presence rules
    /// make up the step-gating projection of a schema.
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::Required | Self::MinItems(_))
    }
}

/// Rules registered for one field path.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub path: String,
    pub label: String,
    pub rules: Vec<Rule>,
}
