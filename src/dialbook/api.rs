//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every client operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns the state** of both panels: for each resource a store, an edit
//!   session and a search box
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no I/O of its own beyond what the gateway does, and never formats
//! output.
//!
//! ## Generic Over Gateway
//!
//! `DialbookApi<G: Gateway>` works with any gateway:
//! - Production: `DialbookApi<HttpGateway>`
//! - Testing and demo mode: `DialbookApi<InMemoryGateway>`

use crate::commands;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::model::{Country, Prefix, PrefixId, Resource};
use crate::search::{CountrySearch, PrefixSearch, SearchBox, SearchMode};
use crate::session::EditSession;
use crate::store::EntityStore;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything one resource's screen needs.
pub struct Panel<R: Resource, M: SearchMode> {
    pub store: EntityStore<R>,
    pub session: EditSession<R>,
    pub search: SearchBox<M>,
}

impl<R: Resource, M: SearchMode> Default for Panel<R, M> {
    fn default() -> Self {
        Self {
            store: EntityStore::new(),
            session: EditSession::new(),
            search: SearchBox::new(),
        }
    }
}

pub struct DialbookApi<G: Gateway> {
    gateway: G,
    config_dir: PathBuf,
    countries: Panel<Country, CountrySearch>,
    prefixes: Panel<Prefix, PrefixSearch>,
}

impl<G: Gateway> DialbookApi<G> {
    pub fn new(gateway: G, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            config_dir: config_dir.into(),
            countries: Panel::default(),
            prefixes: Panel::default(),
        }
    }

    /// Bound every submit by `timeout`.
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.countries.session = EditSession::new().with_timeout(timeout);
        self.prefixes.session = EditSession::new().with_timeout(timeout);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn countries(&self) -> &Panel<Country, CountrySearch> {
        &self.countries
    }

    pub fn prefixes(&self) -> &Panel<Prefix, PrefixSearch> {
        &self.prefixes
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load both lists at once.
    pub async fn mount(&mut self) -> Result<CmdResult> {
        commands::load::run(
            &mut self.countries.store,
            &mut self.prefixes.store,
            &self.gateway,
        )
        .await
    }

    pub fn list_countries(&self) -> Result<CmdResult> {
        commands::list::countries(&self.countries.store)
    }

    pub fn list_prefixes(&self) -> Result<CmdResult> {
        commands::list::prefixes(&self.prefixes.store, &self.countries.store)
    }

    pub async fn create_country(&mut self, fields: &[(String, String)]) -> Result<CmdResult> {
        let panel = &mut self.countries;
        commands::create::run(&mut panel.store, &mut panel.session, &self.gateway, fields).await
    }

    pub async fn create_prefix(&mut self, fields: &[(String, String)]) -> Result<CmdResult> {
        let panel = &mut self.prefixes;
        commands::create::run(&mut panel.store, &mut panel.session, &self.gateway, fields).await
    }

    pub async fn update_country(
        &mut self,
        code: &str,
        fields: &[(String, String)],
    ) -> Result<CmdResult> {
        let panel = &mut self.countries;
        let key = code.to_string();
        commands::update::run(
            &mut panel.store,
            &mut panel.session,
            &self.gateway,
            &key,
            fields,
        )
        .await
    }

    pub async fn update_prefix(
        &mut self,
        id: PrefixId,
        fields: &[(String, String)],
    ) -> Result<CmdResult> {
        let panel = &mut self.prefixes;
        commands::update::run(
            &mut panel.store,
            &mut panel.session,
            &self.gateway,
            &id,
            fields,
        )
        .await
    }

    pub async fn show_country(&mut self, code: &str) -> Result<CmdResult> {
        commands::show::run(&mut self.countries.store, &self.gateway, &code.to_string()).await
    }

    pub async fn show_prefix(&mut self, id: PrefixId) -> Result<CmdResult> {
        commands::show::run(&mut self.prefixes.store, &self.gateway, &id).await
    }

    pub fn request_country_delete(&mut self, code: &str) -> Result<CmdResult> {
        commands::delete::request(&mut self.countries.store, &code.to_string())
    }

    pub async fn confirm_country_delete(&mut self, code: &str) -> Result<CmdResult> {
        commands::delete::confirm(&mut self.countries.store, &self.gateway, &code.to_string())
            .await
    }

    pub fn cancel_country_delete(&mut self) -> Result<CmdResult> {
        commands::delete::cancel(&mut self.countries.store)
    }

    pub fn request_prefix_delete(&mut self, id: PrefixId) -> Result<CmdResult> {
        commands::delete::request(&mut self.prefixes.store, &id)
    }

    pub async fn confirm_prefix_delete(&mut self, id: PrefixId) -> Result<CmdResult> {
        commands::delete::confirm(&mut self.prefixes.store, &self.gateway, &id).await
    }

    pub fn cancel_prefix_delete(&mut self) -> Result<CmdResult> {
        commands::delete::cancel(&mut self.prefixes.store)
    }

    pub async fn search_countries(&mut self, mode: CountrySearch, term: &str) -> Result<CmdResult> {
        let panel = &mut self.countries;
        panel.search.set_mode(mode);
        panel.search.set_term(term)?;
        commands::search::countries(&mut panel.store, &self.gateway, &panel.search).await
    }

    pub async fn search_prefixes(&mut self, mode: PrefixSearch, term: &str) -> Result<CmdResult> {
        let panel = &mut self.prefixes;
        panel.search.set_mode(mode);
        panel.search.set_term(term)?;
        commands::search::prefixes(
            &mut panel.store,
            &self.countries.store,
            &self.gateway,
            &panel.search,
        )
        .await
    }

    pub async fn import_countries(&mut self, path: &Path) -> Result<CmdResult> {
        commands::import::run(&mut self.countries.store, &self.gateway, path).await
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, Record};
