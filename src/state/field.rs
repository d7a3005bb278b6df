//! Form field value objects

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set of fields the form understands
///
/// Ordering follows the enumeration (fio, email, phone); everything that
/// reports fields back to the UI relies on this order being stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Fio,
    Email,
    Phone,
}

impl FieldName {
    /// All fillable fields, in enumeration order
    pub const ALL: [FieldName; 3] = [FieldName::Fio, FieldName::Email, FieldName::Phone];

    /// The wire/form name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Fio => "fio",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
        }
    }

    /// Parse a field name, returning `None` for anything outside the closed set
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "fio" => Some(FieldName::Fio),
            "email" => Some(FieldName::Email),
            "phone" => Some(FieldName::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of the form, one trimmed string per fillable field
///
/// Built fresh by the form data source on every submission attempt; the
/// validator assumes the values arrive already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub fio: String,
    pub email: String,
    pub phone: String,
}

impl FormData {
    /// Create form data with the given field values
    pub fn new(
        fio: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            fio: fio.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Get the value of a field
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Fio => &self.fio,
            FieldName::Email => &self.email,
            FieldName::Phone => &self.phone,
        }
    }

    /// Set the value of a field
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        match field {
            FieldName::Fio => self.fio = value.into(),
            FieldName::Email => self.email = value.into(),
            FieldName::Phone => self.phone = value.into(),
        }
    }

    /// Apply a key/value map, silently ignoring keys outside the fillable set
    pub fn apply(&mut self, values: &HashMap<String, String>) {
        for (key, value) in values {
            if let Some(field) = FieldName::parse(key) {
                self.set(field, value.clone());
            }
        }
    }
}
