use crate::commands::helpers::{listed_countries, listed_prefixes};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Country, Prefix, Resource};
use crate::store::{EntityStore, LoadState};

pub fn countries(store: &EntityStore<Country>) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_listed_countries(listed_countries(store));
    explain_empty(store, &mut result);
    Ok(result)
}

/// Prefixes with their country names resolved against the loaded countries.
pub fn prefixes(
    prefixes: &EntityStore<Prefix>,
    countries: &EntityStore<Country>,
) -> Result<CmdResult> {
    let mut result =
        CmdResult::default().with_listed_prefixes(listed_prefixes(prefixes, countries));
    explain_empty(prefixes, &mut result);
    Ok(result)
}

fn explain_empty<R: Resource>(store: &EntityStore<R>, result: &mut CmdResult) {
    if !store.is_empty() {
        return;
    }
    match store.load_state() {
        LoadState::Failed(reason) => result.add_message(CmdMessage::error(format!(
            "The {} list is unavailable: {}",
            R::KIND,
            reason
        ))),
        LoadState::NotLoaded => result.add_message(CmdMessage::warning(format!(
            "The {} list has not been loaded",
            R::KIND
        ))),
        LoadState::Loaded => {
            result.add_message(CmdMessage::info(format!("No {} records", R::KIND)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::TransportError;
    use crate::gateway::memory::InMemoryGateway;
    use crate::index::DisplayIndex;
    use crate::resolver::UNKNOWN_COUNTRY;

    #[tokio::test]
    async fn lists_countries_in_gateway_order() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Country>::new();
        store.load_all(&gw).await.unwrap();

        let result = countries(&store).unwrap();

        assert_eq!(result.listed_countries.len(), 4);
        assert_eq!(result.listed_countries[0].index, DisplayIndex(1));
        assert_eq!(result.listed_countries[0].country.code, "RU");
        assert!(result.messages.is_empty());
    }

    #[tokio::test]
    async fn prefixes_show_resolved_names() {
        let gw = InMemoryGateway::seeded().with_prefixes(vec![Prefix::draft("44", "GB")]);
        let mut prefix_store = EntityStore::<Prefix>::new();
        let mut country_store = EntityStore::<Country>::new();
        prefix_store.load_all(&gw).await.unwrap();
        country_store.load_all(&gw).await.unwrap();

        let result = prefixes(&prefix_store, &country_store).unwrap();

        assert_eq!(result.listed_prefixes[0].country_name, "Russia");
        assert_eq!(result.listed_prefixes[5].country_name, UNKNOWN_COUNTRY);
    }

    #[tokio::test]
    async fn prefix_names_are_unknown_before_countries_load() {
        let gw = InMemoryGateway::seeded();
        let mut prefix_store = EntityStore::<Prefix>::new();
        prefix_store.load_all(&gw).await.unwrap();

        let result = prefixes(&prefix_store, &EntityStore::new()).unwrap();

        assert!(result
            .listed_prefixes
            .iter()
            .all(|p| p.country_name == UNKNOWN_COUNTRY));
    }

    #[tokio::test]
    async fn failed_mount_shows_the_error_instead_of_a_list() {
        let gw = InMemoryGateway::seeded();
        gw.fail_next(TransportError::unreachable("connection refused"));
        let mut store = EntityStore::<Country>::new();
        let _ = store.load_all(&gw).await;

        let result = countries(&store).unwrap();

        assert!(result.listed_countries.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[0].content.contains("connection refused"));
    }
}
