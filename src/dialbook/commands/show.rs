use crate::commands::{CmdResult, Record};
use crate::error::Result;
use crate::gateway::Collection;
use crate::model::Resource;
use crate::store::EntityStore;

/// The gateway's current copy of one record. The loaded list is left alone.
pub async fn run<R, G>(store: &mut EntityStore<R>, gateway: &G, key: &R::Key) -> Result<CmdResult>
where
    R: Resource + Into<Record>,
    G: Collection<R> + ?Sized,
{
    let record = store.fetch_one(gateway, key).await?;
    Ok(CmdResult::default().with_affected(vec![record.into()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DialbookError;
    use crate::gateway::memory::InMemoryGateway;
    use crate::model::Prefix;

    #[tokio::test]
    async fn fetches_by_key() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();

        let result = run(&mut store, &gw, &4).await.unwrap();

        assert_eq!(
            result.affected,
            vec![Record::Prefix(Prefix::draft("30", "DE").with_id(4))]
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_key_is_a_gateway_404() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();

        match run(&mut store, &gw, &40).await {
            Err(DialbookError::Transport(t)) => assert!(t.is_not_found()),
            other => panic!("unexpected result: {:?}", other.map(|r| r.affected)),
        }
    }
}
