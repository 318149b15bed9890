//! Country names for prefixes.
//!
//! Resolution only looks at the country list already in memory and never
//! calls the gateway. If that list is stale the names are stale too; reloading
//! the countries is the only fix.

use crate::index::DisplayIndex;
use crate::model::{Country, Prefix};
use std::collections::HashMap;

/// Shown for a country code with no loaded country behind it.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// The name of the country with `code`, or [`UNKNOWN_COUNTRY`]. Never blank.
pub fn resolve_country_name<'a>(countries: &'a [Country], code: &str) -> &'a str {
    countries
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_COUNTRY)
}

/// Code → name table for resolving many prefixes against one country list.
pub struct CountryIndex<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> CountryIndex<'a> {
    pub fn new(countries: &'a [Country]) -> Self {
        let mut names = HashMap::with_capacity(countries.len());
        for country in countries {
            names
                .entry(country.code.as_str())
                .or_insert(country.name.as_str());
        }
        Self { names }
    }

    pub fn resolve(&self, code: &str) -> &'a str {
        match self.names.get(code) {
            Some(name) if !name.trim().is_empty() => *name,
            _ => UNKNOWN_COUNTRY,
        }
    }
}

/// A prefix row ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrefix<'a> {
    pub index: DisplayIndex,
    pub prefix: &'a Prefix,
    pub country_name: &'a str,
}

pub fn resolve_prefixes<'a>(
    prefixes: &'a [Prefix],
    countries: &'a [Country],
) -> Vec<ResolvedPrefix<'a>> {
    let index = CountryIndex::new(countries);
    prefixes
        .iter()
        .enumerate()
        .map(|(i, prefix)| ResolvedPrefix {
            index: DisplayIndex(i + 1),
            prefix,
            country_name: index.resolve(&prefix.country_code),
        })
        .collect()
}
