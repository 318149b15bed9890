use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::model::{Country, Prefix};
use crate::store::EntityStore;

/// Load both collections concurrently. Each failure is reported on its own;
/// one list failing does not keep the other from showing.
pub async fn run<G: Gateway + ?Sized>(
    countries: &mut EntityStore<Country>,
    prefixes: &mut EntityStore<Prefix>,
    gateway: &G,
) -> Result<CmdResult> {
    let (country_load, prefix_load) = tokio::join!(
        countries.load_all(gateway),
        prefixes.load_all(gateway)
    );

    let mut result = CmdResult::default();
    if let Err(e) = country_load {
        result.add_message(CmdMessage::error(format!("Could not load countries: {}", e)));
    }
    if let Err(e) = prefix_load {
        result.add_message(CmdMessage::error(format!("Could not load prefixes: {}", e)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gateway::memory::InMemoryGateway;
    use crate::store::LoadState;

    #[tokio::test]
    async fn loads_both_lists() {
        let gw = InMemoryGateway::seeded();
        let mut countries = EntityStore::new();
        let mut prefixes = EntityStore::new();

        let result = run(&mut countries, &mut prefixes, &gw).await.unwrap();

        assert!(result.messages.is_empty());
        assert_eq!(countries.len(), 4);
        assert_eq!(prefixes.len(), 5);
    }

    #[tokio::test]
    async fn one_failure_does_not_hide_the_other_list() {
        let gw = InMemoryGateway::seeded();
        gw.fail_next_call("prefixes.list", TransportError::status(503, "maintenance"));
        let mut countries = EntityStore::new();
        let mut prefixes = EntityStore::new();

        let result = run(&mut countries, &mut prefixes, &gw).await.unwrap();

        assert_eq!(countries.len(), 4);
        assert!(prefixes.is_empty());
        assert!(matches!(prefixes.load_state(), LoadState::Failed(_)));
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("prefixes"));
    }
}
