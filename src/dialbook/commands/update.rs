use crate::commands::helpers::{apply_fields, describe, note_stale_list, submit};
use crate::commands::{CmdMessage, CmdResult, Record};
use crate::error::{DialbookError, Result};
use crate::gateway::Collection;
use crate::model::Resource;
use crate::session::EditSession;
use crate::store::EntityStore;

/// Open the loaded record `key` for editing, apply `fields`, submit.
pub async fn run<R, G>(
    store: &mut EntityStore<R>,
    session: &mut EditSession<R>,
    gateway: &G,
    key: &R::Key,
    fields: &[(String, String)],
) -> Result<CmdResult>
where
    R: Resource + Into<Record>,
    G: Collection<R> + ?Sized,
{
    let current = store
        .find(key)
        .cloned()
        .ok_or_else(|| DialbookError::NotFound(format!("{} {}", R::KIND, key)))?;

    session.begin_edit(&current)?;
    apply_fields(session, fields)?;
    if session.draft() == &current {
        session.cancel();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!(
            "Nothing to change for {}",
            describe(&current)
        )));
        return Ok(result);
    }
    let updated = submit(store, session, gateway).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Updated {}", describe(&updated))));
    note_stale_list(store, &mut result);
    Ok(result.with_affected(vec![updated.into()]))
}
