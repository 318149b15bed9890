//! # Search Dispatcher
//!
//! A search replaces the store's list with whatever the gateway answers for
//! `(mode, term)`. The `All` mode is a plain reload; the other modes need a
//! term and quietly do nothing without one.
//!
//! [`SearchBox`] holds the input state a presentation layer binds to: the
//! selected mode, the typed term, and whether typing is possible at all.

use crate::error::{DialbookError, Result};
use crate::gateway::{Collection, CountryLookup, PrefixFilter};
use crate::model::{Country, Prefix};
use crate::store::EntityStore;
use std::fmt;
use tracing::debug;

pub trait SearchMode: Copy + Eq + fmt::Debug + fmt::Display + Default {
    /// `false` only for the unfiltered mode.
    fn requires_term(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountrySearch {
    #[default]
    All,
    /// Code, name or phone code; the gateway decides how to match.
    ByExactValue,
}

impl SearchMode for CountrySearch {
    fn requires_term(&self) -> bool {
        matches!(self, CountrySearch::ByExactValue)
    }
}

impl fmt::Display for CountrySearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountrySearch::All => write!(f, "all"),
            CountrySearch::ByExactValue => write!(f, "by value"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixSearch {
    #[default]
    All,
    ByCountryCode,
    ByCountryName,
}

impl SearchMode for PrefixSearch {
    fn requires_term(&self) -> bool {
        !matches!(self, PrefixSearch::All)
    }
}

impl fmt::Display for PrefixSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixSearch::All => write!(f, "all"),
            PrefixSearch::ByCountryCode => write!(f, "by country code"),
            PrefixSearch::ByCountryName => write!(f, "by country name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchBox<M: SearchMode> {
    mode: M,
    term: String,
}

impl<M: SearchMode> SearchBox<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A box already set to `mode` and `term`, as a one-shot command would build it.
    pub fn with(mode: M, term: impl Into<String>) -> Result<Self> {
        let mut search = Self::new();
        search.set_mode(mode);
        search.set_term(term)?;
        Ok(search)
    }

    pub fn mode(&self) -> M {
        self.mode
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn input_enabled(&self) -> bool {
        self.mode.requires_term()
    }

    /// Switching mode always clears the term.
    pub fn set_mode(&mut self, mode: M) {
        self.mode = mode;
        self.term.clear();
    }

    pub fn set_term(&mut self, term: impl Into<String>) -> Result<()> {
        let term = term.into();
        if !self.input_enabled() && !term.is_empty() {
            return Err(DialbookError::Session(format!(
                "search mode '{}' takes no term",
                self.mode
            )));
        }
        self.term = term;
        Ok(())
    }

    /// Whether running the search would do anything.
    pub fn is_ready(&self) -> bool {
        !self.mode.requires_term() || !self.term.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The list was replaced and now holds this many records.
    Listed(usize),
    /// The mode needs a term and none was given; nothing happened.
    Skipped,
}

pub async fn search_countries<G>(
    store: &mut EntityStore<Country>,
    gateway: &G,
    search: &SearchBox<CountrySearch>,
) -> Result<SearchOutcome>
where
    G: Collection<Country> + CountryLookup + ?Sized,
{
    if !search.is_ready() {
        return Ok(SearchOutcome::Skipped);
    }
    let term = search.term().trim();
    debug!(mode = %search.mode(), term, "country search");

    match search.mode() {
        CountrySearch::All => {
            let records = store.load_all(gateway).await?;
            Ok(SearchOutcome::Listed(records.len()))
        }
        CountrySearch::ByExactValue => {
            let found = gateway.lookup(term).await.map_err(|e| store.fail(e))?;
            store.install(found.into_iter().collect());
            Ok(SearchOutcome::Listed(store.len()))
        }
    }
}

pub async fn search_prefixes<G>(
    store: &mut EntityStore<Prefix>,
    gateway: &G,
    search: &SearchBox<PrefixSearch>,
) -> Result<SearchOutcome>
where
    G: Collection<Prefix> + PrefixFilter + ?Sized,
{
    if !search.is_ready() {
        return Ok(SearchOutcome::Skipped);
    }
    let term = search.term().trim();
    debug!(mode = %search.mode(), term, "prefix search");

    let found = match search.mode() {
        PrefixSearch::All => {
            let records = store.load_all(gateway).await?;
            return Ok(SearchOutcome::Listed(records.len()));
        }
        PrefixSearch::ByCountryCode => gateway.by_country_code(term).await,
        PrefixSearch::ByCountryName => gateway.by_country_name(term).await,
    };
    let found = found.map_err(|e| store.fail(e))?;
    store.install(found);
    Ok(SearchOutcome::Listed(store.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gateway::memory::InMemoryGateway;

    fn countries(store: &EntityStore<Country>) -> Vec<&str> {
        store.records().iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn switching_mode_clears_the_term() {
        let mut search = SearchBox::<PrefixSearch>::new();
        search.set_mode(PrefixSearch::ByCountryCode);
        search.set_term("RU").unwrap();

        search.set_mode(PrefixSearch::ByCountryName);

        assert_eq!(search.term(), "");
        assert!(search.input_enabled());
    }

    #[test]
    fn all_mode_disables_input() {
        let mut search = SearchBox::<CountrySearch>::new();
        assert!(!search.input_enabled());
        assert!(search.set_term("RU").is_err());
        assert!(search.set_term("").is_ok());
        assert!(search.is_ready());
    }

    #[tokio::test]
    async fn all_mode_twice_matches_two_reloads() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Country>::new();
        let search = SearchBox::new();

        search_countries(&mut store, &gw, &search).await.unwrap();
        let first = store.records().to_vec();
        search_countries(&mut store, &gw, &search).await.unwrap();

        assert_eq!(store.records(), first.as_slice());
        assert_eq!(gw.calls(), vec!["countries.list", "countries.list"]);
    }

    #[tokio::test]
    async fn exact_value_narrows_to_one_record() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Country>::new();
        store.load_all(&gw).await.unwrap();

        let search = SearchBox::with(CountrySearch::ByExactValue, " +49 ").unwrap();
        let outcome = search_countries(&mut store, &gw, &search).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Listed(1));
        assert_eq!(countries(&store), vec!["DE"]);
    }

    #[tokio::test]
    async fn no_match_is_an_empty_list_not_an_error() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Country>::new();
        store.load_all(&gw).await.unwrap();

        let search = SearchBox::with(CountrySearch::ByExactValue, "Atlantis").unwrap();
        let outcome = search_countries(&mut store, &gw, &search).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Listed(0));
        assert!(store.is_empty());
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn blank_term_is_a_no_op() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();
        store.load_all(&gw).await.unwrap();

        let search = SearchBox::with(PrefixSearch::ByCountryName, "   ").unwrap();
        let outcome = search_prefixes(&mut store, &gw, &search).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Skipped);
        assert_eq!(store.len(), 5);
        assert_eq!(gw.calls(), vec!["prefixes.list"]);
    }

    #[tokio::test]
    async fn filters_prefixes_by_code_and_by_name() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();

        let by_code = SearchBox::with(PrefixSearch::ByCountryCode, "RU").unwrap();
        search_prefixes(&mut store, &gw, &by_code).await.unwrap();
        let numbers: Vec<_> = store.records().iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(numbers, vec!["495", "812"]);

        let by_name = SearchBox::with(PrefixSearch::ByCountryName, "germany").unwrap();
        search_prefixes(&mut store, &gw, &by_name).await.unwrap();
        let numbers: Vec<_> = store.records().iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(numbers, vec!["30"]);
    }

    #[tokio::test]
    async fn failed_search_keeps_the_current_list() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();
        store.load_all(&gw).await.unwrap();

        gw.fail_next(TransportError::unreachable("connection reset"));
        let search = SearchBox::with(PrefixSearch::ByCountryCode, "US").unwrap();
        assert!(search_prefixes(&mut store, &gw, &search).await.is_err());

        assert_eq!(store.len(), 5);
        assert!(store.last_error().unwrap().contains("connection reset"));
    }
}
