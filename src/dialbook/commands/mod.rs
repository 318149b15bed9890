//! # Command Layer
//!
//! One module per user intent. Commands drive the store, session and search
//! box against a gateway and report back through [`CmdResult`]: what was
//! listed, what was touched, and leveled messages. They never print.

use crate::config::DialbookConfig;
use crate::index::DisplayIndex;
use crate::model::{Country, Prefix};

pub mod config;
pub mod create;
pub mod delete;
pub mod helpers;
pub mod import;
pub mod list;
pub mod load;
pub mod search;
pub mod show;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A record a command created, changed, fetched or removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Country(Country),
    Prefix(Prefix),
}

impl From<Country> for Record {
    fn from(country: Country) -> Self {
        Record::Country(country)
    }
}

impl From<Prefix> for Record {
    fn from(prefix: Prefix) -> Self {
        Record::Prefix(prefix)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListedCountry {
    pub index: DisplayIndex,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListedPrefix {
    pub index: DisplayIndex,
    pub prefix: Prefix,
    pub country_name: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<Record>,
    pub listed_countries: Vec<ListedCountry>,
    pub listed_prefixes: Vec<ListedPrefix>,
    pub config: Option<DialbookConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected(mut self, records: Vec<Record>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed_countries(mut self, countries: Vec<ListedCountry>) -> Self {
        self.listed_countries = countries;
        self
    }

    pub fn with_listed_prefixes(mut self, prefixes: Vec<ListedPrefix>) -> Self {
        self.listed_prefixes = prefixes;
        self
    }

    pub fn with_config(mut self, config: DialbookConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
