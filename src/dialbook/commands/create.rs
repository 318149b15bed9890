use crate::commands::helpers::{apply_fields, describe, note_stale_list, submit};
use crate::commands::{CmdMessage, CmdResult, Record};
use crate::error::Result;
use crate::gateway::Collection;
use crate::model::Resource;
use crate::session::EditSession;
use crate::store::EntityStore;

/// Compose a new record from `(field, value)` pairs and submit it.
pub async fn run<R, G>(
    store: &mut EntityStore<R>,
    session: &mut EditSession<R>,
    gateway: &G,
    fields: &[(String, String)],
) -> Result<CmdResult>
where
    R: Resource + Into<Record>,
    G: Collection<R> + ?Sized,
{
    session.begin_create();
    apply_fields(session, fields)?;
    let created = submit(store, session, gateway).await?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created {}", describe(&created))));
    note_stale_list(store, &mut result);
    Ok(result.with_affected(vec![created.into()]))
}
