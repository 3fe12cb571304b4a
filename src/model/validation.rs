//! # Validation Failures
//!
//! A 422 answer carries an ordered list of `{propertyName, value}` pairs, one per rejected field.
//! Screens map them onto their own form fields with [`FieldErrors`], keyed by a closed
//! [`FormField`] enum so a typo in a field name is a compile error rather than a silent miss.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// One server-side validation failure. `value` is the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub property_name: String,
    pub value: String,
}

impl ValidationFailure {
    pub fn new(property_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            value: value.into(),
        }
    }
}

/// A closed set of form fields that server property names can be matched against.
pub trait FormField: Copy + Ord + Debug + 'static {
    const ALL: &'static [Self];

    /// The property name the server uses for this field.
    fn property(&self) -> &'static str;

    /// Case-insensitive lookup by server property name.
    fn from_property(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.property().eq_ignore_ascii_case(name))
    }
}

/// Per-field error messages for one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: FormField> {
    errors: BTreeMap<F, String>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps failures onto fields in order; a later failure for the same field replaces the
    /// earlier message. Failures naming no known field are returned alongside.
    pub fn from_failures(failures: &[ValidationFailure]) -> (Self, Vec<ValidationFailure>) {
        let mut errors = Self::new();
        let mut unmatched = Vec::new();
        for failure in failures {
            match F::from_property(&failure.property_name) {
                Some(field) => errors.set(field, failure.value.clone()),
                None => unmatched.push(failure.clone()),
            }
        }
        (errors, unmatched)
    }

    pub fn set(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Editing a field clears its message.
    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Fields of the sign-in and sign-up forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialsField {
    Username,
    DisplayName,
    Password,
}

impl FormField for CredentialsField {
    const ALL: &'static [Self] = &[
        CredentialsField::Username,
        CredentialsField::DisplayName,
        CredentialsField::Password,
    ];

    fn property(&self) -> &'static str {
        match self {
            CredentialsField::Username => "username",
            CredentialsField::DisplayName => "displayName",
            CredentialsField::Password => "password",
        }
    }
}
