//! Deletes happen in two calls: [`request`] names the record and hands it back
//! so the caller can ask for confirmation, then [`confirm`] or [`cancel`].

use crate::commands::helpers::describe;
use crate::commands::{CmdMessage, CmdResult, Record};
use crate::error::Result;
use crate::gateway::Collection;
use crate::model::Resource;
use crate::store::EntityStore;

pub fn request<R>(store: &mut EntityStore<R>, key: &R::Key) -> Result<CmdResult>
where
    R: Resource + Into<Record>,
{
    let record = store.request_delete(key)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "About to delete {}",
        describe(&record)
    )));
    Ok(result.with_affected(vec![record.into()]))
}

pub async fn confirm<R, G>(store: &mut EntityStore<R>, gateway: &G, key: &R::Key) -> Result<CmdResult>
where
    R: Resource + Into<Record>,
    G: Collection<R> + ?Sized,
{
    let record = store.find(key).cloned();
    store.confirm_delete(gateway, key).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted {} {}", R::KIND, key)));
    Ok(result.with_affected(record.into_iter().map(Into::into).collect()))
}

pub fn cancel<R: Resource>(store: &mut EntityStore<R>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if let Some(key) = store.pending_delete() {
        result.add_message(CmdMessage::info(format!("Kept {} {}", R::KIND, key)));
    }
    store.cancel_delete();
    Ok(result)
}
