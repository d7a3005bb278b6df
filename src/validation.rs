//! Pure validation rules for the fixed form fields
//!
//! Every rule is evaluated unconditionally so `error_fields` always lists
//! the complete set of failing fields, in enumeration order. Validation
//! never fails as an operation; bad input simply yields `is_valid: false`.

use crate::state::{FieldName, FormData};
use regex::Regex;

/// Three whitespace-separated tokens of Cyrillic/Latin letters and hyphens
const FIO_PATTERN: &str = r"(?i)^[А-ЯЁA-Z-]+\s[А-ЯЁA-Z-]+\s[А-ЯЁA-Z-]+$";

/// Loose address shape. The dot before the final zone is unescaped and
/// matches any character; known quirk, kept for compatibility. The
/// exact-match domain check below is what actually pins the domain down.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z]+.[A-Z]{2,3}$";

/// `+7(DDD)DDD-DD-DD`, anchored at both ends
const PHONE_PATTERN: &str = r"^\+7\([0-9]{3}\)[0-9]{3}-[0-9]{2}-[0-9]{2}$";

/// Maximum allowed sum of the decimal digits in a phone value
const PHONE_DIGIT_SUM_LIMIT: u32 = 30;

/// Domain zones accepted for email, matched exactly against the part
/// after `@` (case-sensitive, no normalization)
pub const ACCEPTED_EMAIL_DOMAINS: [&str; 6] = [
    "ya.ru",
    "yandex.ru",
    "yandex.ua",
    "yandex.by",
    "yandex.kz",
    "yandex.com",
];

/// Immutable validation configuration: compiled patterns and accepted domains
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    fio: Regex,
    email: Regex,
    phone: Regex,
    accepted_email_domains: Vec<String>,
    phone_digit_sum_limit: u32,
}

impl ValidationConfig {
    /// Build a configuration with a custom accepted-domain list
    pub fn with_domains(accepted_email_domains: Vec<String>) -> Self {
        Self {
            fio: Regex::new(FIO_PATTERN).expect("fio pattern compiles"),
            email: Regex::new(EMAIL_PATTERN).expect("email pattern compiles"),
            phone: Regex::new(PHONE_PATTERN).expect("phone pattern compiles"),
            accepted_email_domains,
            phone_digit_sum_limit: PHONE_DIGIT_SUM_LIMIT,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::with_domains(
            ACCEPTED_EMAIL_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        )
    }
}

/// Verdict of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when every field passed its rule
    pub is_valid: bool,
    /// Every failing field, always in enumeration order (fio, email, phone)
    pub error_fields: Vec<FieldName>,
}

/// Pure field validator; owns its configuration, no other state
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a validator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate all fields and report the aggregate verdict
    pub fn validate(&self, data: &FormData) -> ValidationResult {
        let fio_valid = self.is_fio_valid(data.get(FieldName::Fio));
        let email_valid = self.is_email_valid(data.get(FieldName::Email));
        let phone_valid = self.is_phone_valid(data.get(FieldName::Phone));

        let mut error_fields = Vec::new();
        if !fio_valid {
            error_fields.push(FieldName::Fio);
        }
        if !email_valid {
            error_fields.push(FieldName::Email);
        }
        if !phone_valid {
            error_fields.push(FieldName::Phone);
        }

        ValidationResult {
            is_valid: fio_valid && email_valid && phone_valid,
            error_fields,
        }
    }

    fn is_fio_valid(&self, value: &str) -> bool {
        self.config.fio.is_match(value)
    }

    fn is_email_valid(&self, value: &str) -> bool {
        if !self.config.email.is_match(value) {
            return false;
        }
        // The local part cannot contain '@', so at most one split point exists
        match value.split_once('@') {
            Some((_, domain)) => self
                .config
                .accepted_email_domains
                .iter()
                .any(|accepted| accepted == domain),
            None => false,
        }
    }

    fn is_phone_valid(&self, value: &str) -> bool {
        if !self.config.phone.is_match(value) {
            return false;
        }
        let digit_sum: u32 = value.chars().filter_map(|c| c.to_digit(10)).sum();
        digit_sum <= self.config.phone_digit_sum_limit
    }
}
