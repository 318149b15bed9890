//! # Entity Store
//!
//! Holds the in-memory list for one resource and keeps it consistent with
//! the gateway. The list is only ever changed in three ways:
//!
//! - **Full reload** (`load_all`): the gateway's snapshot replaces the list
//!   wholesale. Used at mount and after every successful create or update,
//!   so server-side defaults and normalization always show up.
//! - **Local removal by key**: after a confirmed, successful delete.
//! - **Replacement by a search result** (see [`crate::search`]).
//!
//! Nothing is ever merged. A failed write leaves the list exactly as it was.
//!
//! ## Two-step Delete
//!
//! Deleting is an explicit pair of intents: [`EntityStore::request_delete`]
//! marks a key as pending, then [`EntityStore::confirm_delete`] performs it
//! (or [`EntityStore::cancel_delete`] drops it). Only keys present in the
//! list can be requested, so a key that was already removed is never sent
//! to the gateway a second time.

use crate::error::{DialbookError, Result, TransportError};
use crate::gateway::Collection;
use crate::index::{index_records, DisplayRow};
use crate::model::Resource;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    /// The very first load failed; the list is empty and the message explains why.
    Failed(String),
}

pub struct EntityStore<R: Resource> {
    records: Vec<R>,
    load_state: LoadState,
    pending_delete: Option<R::Key>,
    last_error: Option<String>,
}

impl<R: Resource> Default for EntityStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> EntityStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            load_state: LoadState::NotLoaded,
            pending_delete: None,
            last_error: None,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn rows(&self) -> Vec<DisplayRow<'_, R>> {
        index_records(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, key: &R::Key) -> Option<&R> {
        self.records.iter().find(|r| r.key().as_ref() == Some(key))
    }

    pub fn contains(&self, key: &R::Key) -> bool {
        self.find(key).is_some()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// The most recent gateway failure, if it has not been dismissed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn pending_delete(&self) -> Option<&R::Key> {
        self.pending_delete.as_ref()
    }

    /// Replace the list with the gateway's current snapshot.
    pub async fn load_all<G>(&mut self, gateway: &G) -> Result<&[R]>
    where
        G: Collection<R> + ?Sized,
    {
        match gateway.list().await {
            Ok(records) => {
                self.install(records);
                Ok(&self.records)
            }
            Err(err) => {
                if self.load_state != LoadState::Loaded {
                    self.load_state = LoadState::Failed(err.to_string());
                }
                Err(self.fail(err))
            }
        }
    }

    /// Fetch the server's copy of one record without touching the list.
    pub async fn fetch_one<G>(&mut self, gateway: &G, key: &R::Key) -> Result<R>
    where
        G: Collection<R> + ?Sized,
    {
        gateway.get(key).await.map_err(|e| self.fail(e))
    }

    pub async fn create<G>(&mut self, gateway: &G, draft: &R) -> Result<R>
    where
        G: Collection<R> + ?Sized,
    {
        let created = self.send_create(gateway, draft).await?;
        self.reconcile(gateway).await;
        Ok(created)
    }

    /// The gateway half of [`create`](Self::create): the list is not reloaded.
    pub(crate) async fn send_create<G>(&mut self, gateway: &G, draft: &R) -> Result<R>
    where
        G: Collection<R> + ?Sized,
    {
        let created = gateway.create(draft).await.map_err(|e| self.fail(e))?;
        info!(resource = %R::KIND, key = ?created.key(), "record created");
        Ok(created)
    }

    /// Create many records at once. Every draft must validate before anything is sent.
    pub async fn create_all<G>(&mut self, gateway: &G, drafts: &[R]) -> Result<Vec<R>>
    where
        G: Collection<R> + ?Sized,
    {
        for (i, draft) in drafts.iter().enumerate() {
            let errors = draft.validate();
            if !errors.is_empty() {
                return Err(DialbookError::Validation(format!(
                    "{} #{}: {}",
                    R::KIND,
                    i + 1,
                    errors
                )));
            }
        }
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let created = gateway
            .create_all(drafts)
            .await
            .map_err(|e| self.fail(e))?;
        info!(resource = %R::KIND, count = created.len(), "records created");
        self.reconcile(gateway).await;
        Ok(created)
    }

    pub async fn update<G>(&mut self, gateway: &G, key: &R::Key, draft: &R) -> Result<R>
    where
        G: Collection<R> + ?Sized,
    {
        let updated = self.send_update(gateway, key, draft).await?;
        self.reconcile(gateway).await;
        Ok(updated)
    }

    /// The gateway half of [`update`](Self::update): the list is not reloaded.
    pub(crate) async fn send_update<G>(
        &mut self,
        gateway: &G,
        key: &R::Key,
        draft: &R,
    ) -> Result<R>
    where
        G: Collection<R> + ?Sized,
    {
        if !self.contains(key) {
            return Err(DialbookError::NotFound(format!("{} {}", R::KIND, key)));
        }

        let updated = gateway
            .update(key, draft)
            .await
            .map_err(|e| self.fail(e))?;
        info!(resource = %R::KIND, key = %key, "record updated");
        Ok(updated)
    }

    /// First half of a delete: mark `key` for deletion.
    pub fn request_delete(&mut self, key: &R::Key) -> Result<&R> {
        let idx = self
            .records
            .iter()
            .position(|r| r.key().as_ref() == Some(key))
            .ok_or_else(|| DialbookError::NotFound(format!("{} {}", R::KIND, key)))?;
        self.pending_delete = Some(key.clone());
        Ok(&self.records[idx])
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second half of a delete. `key` must match the pending request.
    pub async fn confirm_delete<G>(&mut self, gateway: &G, key: &R::Key) -> Result<()>
    where
        G: Collection<R> + ?Sized,
    {
        match self.pending_delete.take() {
            Some(pending) if &pending == key => {}
            other => {
                self.pending_delete = other;
                return Err(DialbookError::Session(format!(
                    "no delete was requested for {} {}",
                    R::KIND,
                    key
                )));
            }
        }

        if let Err(err) = gateway.delete(key).await {
            // Still pending, so a retry only needs the confirmation.
            self.pending_delete = Some(key.clone());
            return Err(self.fail(err));
        }
        self.records.retain(|r| r.key().as_ref() != Some(key));
        info!(resource = %R::KIND, key = %key, "record deleted");
        Ok(())
    }

    /// Take `records` as the current list, be it a full snapshot or a search result.
    pub(crate) fn install(&mut self, records: Vec<R>) {
        self.replace(records);
        self.load_state = LoadState::Loaded;
        self.last_error = None;
    }

    /// Swap in a fresh list, keeping the first record per key.
    pub(crate) fn replace(&mut self, records: Vec<R>) {
        let mut unique: Vec<R> = Vec::with_capacity(records.len());
        for record in records {
            let key = record.key();
            let duplicate = key.is_some() && unique.iter().any(|u| u.key() == key);
            if duplicate {
                warn!(resource = %R::KIND, key = ?key, "gateway returned a duplicate key, dropping it");
                continue;
            }
            unique.push(record);
        }
        self.records = unique;

        if let Some(pending) = &self.pending_delete {
            if !self.contains(pending) {
                self.pending_delete = None;
            }
        }
    }

    /// Record a gateway failure for display and hand it back as a crate error.
    pub(crate) fn fail(&mut self, err: TransportError) -> DialbookError {
        warn!(resource = %R::KIND, error = %err, "gateway call failed");
        self.last_error = Some(err.to_string());
        err.into()
    }

    /// Reload after a successful write. A reload failure does not undo the write.
    pub(crate) async fn reconcile<G>(&mut self, gateway: &G)
    where
        G: Collection<R> + ?Sized,
    {
        if self.load_all(gateway).await.is_err() {
            warn!(resource = %R::KIND, "write succeeded but the list could not be refreshed");
        }
    }
}
