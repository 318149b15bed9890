//! Draft validation for countries and prefixes.
//!
//! Validation is a pure function of the draft. It never touches the gateway
//! and never looks at the loaded lists, so a prefix pointing at a country
//! code nobody has loaded yet is still valid here.
//!
//! # Rules
//!
//! | Field | Rule |
//! |---|---|
//! | `Country.code` | non-blank; at most [`MAX_COUNTRY_CODE_LEN`] characters |
//! | `Country.name` | non-blank; at most [`MAX_COUNTRY_NAME_LEN`] characters |
//! | `Country.phoneCode` | non-blank |
//! | `Prefix.prefix` | non-blank |
//! | `Prefix.countryCode` | set (non-empty) |
//!
//! Each failing field gets exactly one message. Blankness wins over length:
//! a code of six spaces is reported as blank, not as too long.
//!
//! ```
//! use dialbook::model::{Country, CountryField};
//! use dialbook::validation::validate_country;
//!
//! let errors = validate_country(&Country::new("", "", ""));
//! assert_eq!(errors.len(), 3);
//! assert!(errors.get(CountryField::PhoneCode).is_some());
//! ```

use crate::model::{Country, CountryField, Prefix, PrefixField};
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_COUNTRY_CODE_LEN: usize = 5;
pub const MAX_COUNTRY_NAME_LEN: usize = 50;

/// Field → message map. Empty means the draft can be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> ValidationErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drops the message for one field, leaving the others alone.
    pub fn clear_field(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl<F: Ord + Copy + fmt::Display> fmt::Display for ValidationErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_country(country: &Country) -> ValidationErrors<CountryField> {
    let mut errors = ValidationErrors::new();

    if is_blank(&country.code) {
        errors.insert(CountryField::Code, "Country code must not be blank");
    } else if country.code.chars().count() > MAX_COUNTRY_CODE_LEN {
        errors.insert(
            CountryField::Code,
            format!(
                "Country code is too long (at most {} characters)",
                MAX_COUNTRY_CODE_LEN
            ),
        );
    }

    if is_blank(&country.name) {
        errors.insert(CountryField::Name, "Country name must not be blank");
    } else if country.name.chars().count() > MAX_COUNTRY_NAME_LEN {
        errors.insert(
            CountryField::Name,
            format!(
                "Country name is too long (at most {} characters)",
                MAX_COUNTRY_NAME_LEN
            ),
        );
    }

    if is_blank(&country.phone_code) {
        errors.insert(CountryField::PhoneCode, "Phone code must not be blank");
    }

    errors
}

pub fn validate_prefix(prefix: &Prefix) -> ValidationErrors<PrefixField> {
    let mut errors = ValidationErrors::new();

    if is_blank(&prefix.prefix) {
        errors.insert(PrefixField::Prefix, "Prefix must not be blank");
    }
    // A country is picked from a list, so "set" is the only requirement.
    if prefix.country_code.is_empty() {
        errors.insert(PrefixField::CountryCode, "A country must be selected");
    }

    errors
}
