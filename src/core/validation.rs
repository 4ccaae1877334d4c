//! Form field validation.
//!
//! Field checks resolve a [`ValidationRule`] (caller-supplied first, then the
//! built-in rule for the field name) and stop at the first failing check.
//! Item validation runs every field check and collects all errors so a form
//! can highlight each bad field at once. Nothing here returns an error type:
//! failures are data.

use crate::models::NewItem;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// A pattern and/or length constraint for one field.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    /// Regex the whole value must match
    pub pattern: Option<Regex>,
    /// Message reported when `pattern` does not match
    pub message: String,
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
}

impl ValidationRule {
    /// Rule with only a pattern.
    ///
    /// # Errors
    /// Returns the regex compile error for an invalid pattern.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
            message: message.into(),
            min_length: None,
            max_length: None,
        })
    }

    /// Rule with only length bounds.
    #[must_use]
    pub fn length(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self {
            pattern: None,
            message: String::new(),
            min_length,
            max_length,
        }
    }

    /// Requires at least `min_length` characters.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Allows at most `max_length` characters.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn check(&self, value: &str) -> FieldValidation {
        if let Some(pattern) = &self.pattern
            && !pattern.is_match(value)
        {
            return FieldValidation::invalid(self.message.clone());
        }

        let length = value.chars().count();
        if let Some(min) = self.min_length
            && length < min
        {
            return FieldValidation::invalid(format!("Must be at least {min} characters"));
        }
        if let Some(max) = self.max_length
            && length > max
        {
            return FieldValidation::invalid(format!("Must be at most {max} characters"));
        }

        FieldValidation::ok()
    }
}

/// Outcome of checking a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    /// Whether the value passed
    pub valid: bool,
    /// Present only when `valid` is false
    pub message: Option<String>,
}

impl FieldValidation {
    const fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            valid: false,
            message: Some(message),
        }
    }
}

/// Outcome of checking a whole item form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemValidation {
    /// `true` when `errors` is empty
    pub valid: bool,
    /// Message per failing field (`name`, `expiry`, ...)
    pub errors: BTreeMap<String, String>,
}

#[expect(
    clippy::expect_used,
    reason = "Built-in rule patterns are compile-time constants and cannot fail"
)]
static BUILTIN_RULES: LazyLock<HashMap<&'static str, ValidationRule>> = LazyLock::new(|| {
    let rule = |pattern: &str, message: &str| {
        ValidationRule::pattern(pattern, message).expect("built-in rule pattern is valid")
    };

    HashMap::from([
        (
            "barcode",
            rule(r"^[0-9]{8,14}$", "Barcode must be 8-14 digits"),
        ),
        (
            "email",
            rule(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", "Please enter a valid email address"),
        ),
        (
            "phone",
            rule(r"^[0-9\s\-+()]+$", "Please enter a valid phone number").with_min_length(10),
        ),
        (
            "url",
            rule(r"^https?://.+", "Please enter a valid URL (http:// or https://)"),
        ),
    ])
});

/// Returns the built-in rule registered for `name`, if any.
#[must_use]
pub fn builtin_rule(name: &str) -> Option<&'static ValidationRule> {
    BUILTIN_RULES.get(name)
}

/// Checks one value against `custom_rule`, or else the built-in rule named
/// `rule_name`. With neither available the value is accepted.
#[must_use]
pub fn validate_field(
    value: &str,
    rule_name: &str,
    custom_rule: Option<&ValidationRule>,
) -> FieldValidation {
    match custom_rule.or_else(|| builtin_rule(rule_name)) {
        Some(rule) => rule.check(value),
        None => FieldValidation::ok(),
    }
}

/// Checks an item form and collects every failing field.
///
/// The barcode is only checked when the caller passes a `barcode` rule in
/// `custom_rules`; the built-in barcode rule is never applied here.
#[must_use]
pub fn validate_item(
    item: &NewItem,
    custom_rules: Option<&HashMap<String, ValidationRule>>,
) -> ItemValidation {
    let mut errors = BTreeMap::new();

    if item.name.trim().is_empty() {
        errors.insert("name".to_string(), "Product name is required".to_string());
    }

    if item.expiry_date.as_deref().is_none_or(str::is_empty) {
        errors.insert("expiry".to_string(), "Expiry date is required".to_string());
    }

    let barcode_rule = custom_rules.and_then(|rules| rules.get("barcode"));
    if let (Some(barcode), Some(rule)) = (item.barcode.as_deref(), barcode_rule)
        && !barcode.is_empty()
    {
        let result = validate_field(barcode, "barcode", Some(rule));
        if let Some(message) = result.message {
            errors.insert("barcode".to_string(), message);
        }
    }

    if item.price.is_some_and(|price| price < 0.0) {
        errors.insert("price".to_string(), "Price cannot be negative".to_string());
    }

    if item.quantity.is_some_and(|quantity| quantity < 0.0) {
        errors.insert(
            "quantity".to_string(),
            "Quantity cannot be negative".to_string(),
        );
    }

    ItemValidation {
        valid: errors.is_empty(),
        errors,
    }
}
