use crate::commands::{CmdMessage, CmdResult, ListedCountry, ListedPrefix};
use crate::error::{DialbookError, Result};
use crate::gateway::Collection;
use crate::model::{Country, Prefix, Resource};
use crate::resolver::resolve_prefixes;
use crate::session::{EditSession, SubmitOutcome};
use crate::store::EntityStore;

/// Copy `(field name, value)` pairs into the open draft, in order.
pub fn apply_fields<R: Resource>(
    session: &mut EditSession<R>,
    fields: &[(String, String)],
) -> Result<()> {
    for (name, value) in fields {
        session.set_field_named(name, value.as_str())?;
    }
    Ok(())
}

/// Submit the open draft; an invalid draft becomes a `Validation` error.
pub async fn submit<R, G>(
    store: &mut EntityStore<R>,
    session: &mut EditSession<R>,
    gateway: &G,
) -> Result<R>
where
    R: Resource,
    G: Collection<R> + ?Sized,
{
    match session.submit(store, gateway).await? {
        SubmitOutcome::Saved(record) => Ok(record),
        SubmitOutcome::Invalid => Err(DialbookError::Validation(session.errors().to_string())),
    }
}

/// "country RU", "prefix 12", or just "prefix" for an unsaved one.
pub fn describe<R: Resource>(record: &R) -> String {
    match record.key() {
        Some(key) => format!("{} {}", R::KIND, key),
        None => R::KIND.to_string(),
    }
}

/// A write went through but the follow-up reload did not.
pub fn note_stale_list<R: Resource>(store: &EntityStore<R>, result: &mut CmdResult) {
    if let Some(err) = store.last_error() {
        result.add_message(CmdMessage::warning(format!(
            "Saved, but the {} list could not be refreshed: {}",
            R::KIND,
            err
        )));
    }
}

pub fn listed_countries(store: &EntityStore<Country>) -> Vec<ListedCountry> {
    store
        .rows()
        .into_iter()
        .map(|row| ListedCountry {
            index: row.index,
            country: row.record.clone(),
        })
        .collect()
}

pub fn listed_prefixes(
    prefixes: &EntityStore<Prefix>,
    countries: &EntityStore<Country>,
) -> Vec<ListedPrefix> {
    resolve_prefixes(prefixes.records(), countries.records())
        .into_iter()
        .map(|row| ListedPrefix {
            index: row.index,
            prefix: row.prefix.clone(),
            country_name: row.country_name.to_string(),
        })
        .collect()
}
