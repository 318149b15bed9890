use crate::commands::helpers::{listed_countries, listed_prefixes};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gateway::{Collection, CountryLookup, PrefixFilter};
use crate::model::{Country, Prefix};
use crate::search::{
    search_countries, search_prefixes, CountrySearch, PrefixSearch, SearchBox, SearchOutcome,
};
use crate::store::EntityStore;

pub async fn countries<G>(
    store: &mut EntityStore<Country>,
    gateway: &G,
    search: &SearchBox<CountrySearch>,
) -> Result<CmdResult>
where
    G: Collection<Country> + CountryLookup + ?Sized,
{
    let outcome = search_countries(store, gateway, search).await?;
    let mut result = CmdResult::default().with_listed_countries(listed_countries(store));
    report(outcome, search.term(), &mut result);
    Ok(result)
}

/// `countries` is only read, to name each prefix's country.
pub async fn prefixes<G>(
    store: &mut EntityStore<Prefix>,
    countries: &EntityStore<Country>,
    gateway: &G,
    search: &SearchBox<PrefixSearch>,
) -> Result<CmdResult>
where
    G: Collection<Prefix> + PrefixFilter + ?Sized,
{
    let outcome = search_prefixes(store, gateway, search).await?;
    let mut result = CmdResult::default().with_listed_prefixes(listed_prefixes(store, countries));
    report(outcome, search.term(), &mut result);
    Ok(result)
}

fn report(outcome: SearchOutcome, term: &str, result: &mut CmdResult) {
    match outcome {
        SearchOutcome::Skipped => {
            result.add_message(CmdMessage::warning("Enter a search term first"))
        }
        SearchOutcome::Listed(0) => {
            result.add_message(CmdMessage::info(format!("No matches for '{}'", term.trim())))
        }
        SearchOutcome::Listed(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::gateway::memory::InMemoryGateway;

    #[tokio::test]
    async fn lookup_by_value_lists_the_match() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::new();
        let search = SearchBox::with(CountrySearch::ByExactValue, "france").unwrap();

        let result = countries(&mut store, &gw, &search).await.unwrap();

        assert_eq!(result.listed_countries.len(), 1);
        assert_eq!(result.listed_countries[0].country.code, "FR");
    }

    #[tokio::test]
    async fn empty_result_says_so() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::new();
        let mut country_store = EntityStore::new();
        country_store.load_all(&gw).await.unwrap();
        let search = SearchBox::with(PrefixSearch::ByCountryCode, "JP").unwrap();

        let result = prefixes(&mut store, &country_store, &gw, &search)
            .await
            .unwrap();

        assert!(result.listed_prefixes.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Info);
        assert_eq!(result.messages[0].content, "No matches for 'JP'");
    }

    #[tokio::test]
    async fn search_rows_carry_country_names() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::new();
        let mut country_store = EntityStore::new();
        country_store.load_all(&gw).await.unwrap();
        let search = SearchBox::with(PrefixSearch::ByCountryName, "Russia").unwrap();

        let result = prefixes(&mut store, &country_store, &gw, &search)
            .await
            .unwrap();

        assert_eq!(result.listed_prefixes.len(), 2);
        assert!(result
            .listed_prefixes
            .iter()
            .all(|p| p.country_name == "Russia"));
    }
}
