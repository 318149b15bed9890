use crate::error::DialbookError;
use crate::validation::{self, ValidationErrors};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two managed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Countries,
    Prefixes,
}

impl ResourceKind {
    /// Singular, human-facing name ("country", "prefix").
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Countries => "country",
            ResourceKind::Prefixes => "prefix",
        }
    }

    /// Default path segment under the gateway base URL.
    pub fn default_path(&self) -> &'static str {
        match self {
            ResourceKind::Countries => "countries",
            ResourceKind::Prefixes => "prefixes",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Behavior shared by every record the client manages.
///
/// A resource knows its key, its editable fields, and how to validate itself.
/// Everything above the gateway (store, session, search) is written once
/// against this trait.
pub trait Resource:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Key: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    type Field: Copy
        + Ord
        + fmt::Debug
        + fmt::Display
        + FromStr<Err = DialbookError>
        + Send
        + Sync
        + 'static;

    const KIND: ResourceKind;

    /// The record's key, `None` until the gateway has assigned one.
    fn key(&self) -> Option<Self::Key>;

    /// The empty-field form used when composing a new record.
    fn blank() -> Self;

    /// The field that holds the key, if the key is user-editable at all.
    fn key_field() -> Option<Self::Field>;

    fn field(&self, field: Self::Field) -> &str;

    fn set_field(&mut self, field: Self::Field, value: String);

    fn validate(&self) -> ValidationErrors<Self::Field>;

    /// The body sent on create. Server-assigned keys are stripped here.
    fn for_create(&self) -> Self {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: String,
    pub name: String,
    pub phone_code: String,
}

impl Country {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        phone_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            phone_code: phone_code.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountryField {
    Code,
    Name,
    PhoneCode,
}

impl CountryField {
    pub const ALL: [CountryField; 3] = [
        CountryField::Code,
        CountryField::Name,
        CountryField::PhoneCode,
    ];
}

impl fmt::Display for CountryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CountryField::Code => "code",
            CountryField::Name => "name",
            CountryField::PhoneCode => "phoneCode",
        };
        f.write_str(name)
    }
}

impl FromStr for CountryField {
    type Err = DialbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(CountryField::Code),
            "name" => Ok(CountryField::Name),
            "phoneCode" | "phone-code" | "phone_code" => Ok(CountryField::PhoneCode),
            other => Err(DialbookError::UnknownField(other.to_string())),
        }
    }
}

impl Resource for Country {
    type Key = String;
    type Field = CountryField;

    const KIND: ResourceKind = ResourceKind::Countries;

    fn key(&self) -> Option<String> {
        Some(self.code.clone())
    }

    fn blank() -> Self {
        Self::new("", "", "")
    }

    fn key_field() -> Option<CountryField> {
        Some(CountryField::Code)
    }

    fn field(&self, field: CountryField) -> &str {
        match field {
            CountryField::Code => &self.code,
            CountryField::Name => &self.name,
            CountryField::PhoneCode => &self.phone_code,
        }
    }

    fn set_field(&mut self, field: CountryField, value: String) {
        match field {
            CountryField::Code => self.code = value,
            CountryField::Name => self.name = value,
            CountryField::PhoneCode => self.phone_code = value,
        }
    }

    fn validate(&self) -> ValidationErrors<CountryField> {
        validation::validate_country(self)
    }
}

pub type PrefixId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PrefixId>,
    pub prefix: String,
    pub country_code: String,
}

impl Prefix {
    /// A prefix draft that has not been saved yet.
    pub fn draft(prefix: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            id: None,
            prefix: prefix.into(),
            country_code: country_code.into(),
        }
    }

    pub fn with_id(mut self, id: PrefixId) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrefixField {
    Prefix,
    CountryCode,
}

impl PrefixField {
    pub const ALL: [PrefixField; 2] = [PrefixField::Prefix, PrefixField::CountryCode];
}

impl fmt::Display for PrefixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefixField::Prefix => "prefix",
            PrefixField::CountryCode => "countryCode",
        };
        f.write_str(name)
    }
}

impl FromStr for PrefixField {
    type Err = DialbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(PrefixField::Prefix),
            "countryCode" | "country-code" | "country_code" => Ok(PrefixField::CountryCode),
            other => Err(DialbookError::UnknownField(other.to_string())),
        }
    }
}

impl Resource for Prefix {
    type Key = PrefixId;
    type Field = PrefixField;

    const KIND: ResourceKind = ResourceKind::Prefixes;

    fn key(&self) -> Option<PrefixId> {
        self.id
    }

    fn blank() -> Self {
        Self::draft("", "")
    }

    fn key_field() -> Option<PrefixField> {
        // The id is server-assigned and never part of the form.
        None
    }

    fn field(&self, field: PrefixField) -> &str {
        match field {
            PrefixField::Prefix => &self.prefix,
            PrefixField::CountryCode => &self.country_code,
        }
    }

    fn set_field(&mut self, field: PrefixField, value: String) {
        match field {
            PrefixField::Prefix => self.prefix = value,
            PrefixField::CountryCode => self.country_code = value,
        }
    }

    fn validate(&self) -> ValidationErrors<PrefixField> {
        validation::validate_prefix(self)
    }

    fn for_create(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}
