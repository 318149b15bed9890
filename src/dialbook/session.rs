//! # Edit Session
//!
//! One session per resource type; at most one record is being edited at a time.
//!
//! ```text
//!            begin_create                 submit (valid)
//!   Idle ───────────────▶ ComposingCreate ─────────────▶ Submitting ──ok──▶ Idle
//!     │                        ▲   │ submit (invalid)        │
//!     │ begin_edit             │   └──── stays, errors set   │ err
//!     ▼                        └─────────────────────────────┘
//!   ComposingEdit ── same shape as above, back to ComposingEdit on failure
//! ```
//!
//! `cancel` returns to `Idle` from anywhere. Opening a new draft while one is
//! open discards the old one together with its validation errors.
//!
//! The submit timeout bounds the write itself. The list reload that follows
//! a saved write gets its own bound, and a slow or failed reload never turns
//! the save into a failure.
//!
//! While editing an existing record, its key is frozen: `set_field` on the
//! key field is rejected and the update is always addressed by the key the
//! session was opened with.

use crate::error::{DialbookError, Result, TransportError};
use crate::gateway::Collection;
use crate::model::Resource;
use crate::store::EntityStore;
use crate::validation::ValidationErrors;
use std::time::Duration;
use tracing::debug;

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState<K> {
    Idle,
    ComposingCreate,
    ComposingEdit { key: K },
    /// `editing` is the key being updated, `None` for a create.
    Submitting { editing: Option<K> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// The gateway accepted the draft; this is its answer.
    Saved(R),
    /// The draft failed validation and nothing was sent. See [`EditSession::errors`].
    Invalid,
}

pub struct EditSession<R: Resource> {
    state: SessionState<R::Key>,
    draft: R,
    errors: ValidationErrors<R::Field>,
    failure: Option<String>,
    timeout: Duration,
}

impl<R: Resource> Default for EditSession<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> EditSession<R> {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            draft: R::blank(),
            errors: ValidationErrors::new(),
            failure: None,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    /// Upper bound on how long `submit` may wait for the gateway.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> &SessionState<R::Key> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors<R::Field> {
        &self.errors
    }

    /// The gateway failure from the last submit, if it failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Whether the presentation layer should disable input for `field`.
    pub fn is_locked(&self, field: R::Field) -> bool {
        matches!(self.state, SessionState::ComposingEdit { .. }) && R::key_field() == Some(field)
    }

    pub fn begin_create(&mut self) {
        self.reset(SessionState::ComposingCreate, R::blank());
        debug!(resource = %R::KIND, "composing new record");
    }

    pub fn begin_edit(&mut self, record: &R) -> Result<()> {
        let key = record.key().ok_or_else(|| {
            DialbookError::Session(format!("cannot edit a {} that was never saved", R::KIND))
        })?;
        debug!(resource = %R::KIND, key = %key, "editing record");
        self.reset(SessionState::ComposingEdit { key }, record.clone());
        Ok(())
    }

    /// Update one draft field and clear that field's error only.
    pub fn set_field(&mut self, field: R::Field, value: impl Into<String>) -> Result<()> {
        match &self.state {
            SessionState::Idle => {
                return Err(DialbookError::Session("no draft is open".to_string()));
            }
            SessionState::Submitting { .. } => {
                return Err(DialbookError::Session(
                    "the draft is being submitted".to_string(),
                ));
            }
            SessionState::ComposingCreate | SessionState::ComposingEdit { .. } => {}
        }
        if self.is_locked(field) {
            return Err(DialbookError::ImmutableField(field.to_string()));
        }

        self.draft.set_field(field, value.into());
        self.errors.clear_field(field);
        Ok(())
    }

    /// Same as [`set_field`](Self::set_field), addressing the field by its form name.
    pub fn set_field_named(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: R::Field = name.parse()?;
        self.set_field(field, value)
    }

    /// Validate the draft and, if it is clean, send it through the store.
    ///
    /// Invalid drafts never reach the gateway. On a gateway failure the
    /// session stays open with the draft intact so the user can retry.
    pub async fn submit<G>(
        &mut self,
        store: &mut EntityStore<R>,
        gateway: &G,
    ) -> Result<SubmitOutcome<R>>
    where
        G: Collection<R> + ?Sized,
    {
        let editing = match &self.state {
            SessionState::Idle => {
                return Err(DialbookError::Session("no draft is open".to_string()));
            }
            SessionState::Submitting { .. } => {
                return Err(DialbookError::Session(
                    "a submission is already in flight".to_string(),
                ));
            }
            SessionState::ComposingCreate => None,
            SessionState::ComposingEdit { key } => Some(key.clone()),
        };

        let errors = self.draft.validate();
        if !errors.is_empty() {
            debug!(resource = %R::KIND, invalid = %errors, "draft rejected");
            self.errors = errors;
            return Ok(SubmitOutcome::Invalid);
        }

        self.errors.clear();
        self.failure = None;
        self.state = SessionState::Submitting {
            editing: editing.clone(),
        };
        let draft = self.draft.clone();

        let write = async {
            match &editing {
                None => store.send_create(gateway, &draft).await,
                Some(key) => store.send_update(gateway, key, &draft).await,
            }
        };
        let bounded = tokio::time::timeout(self.timeout, write).await;
        let result = match bounded {
            Ok(result) => result,
            Err(_) => Err(store.fail(self.timed_out("no answer"))),
        };

        match result {
            Ok(saved) => {
                self.refresh(store, gateway).await;
                debug!(resource = %R::KIND, "draft saved, session closed");
                self.reset(SessionState::Idle, R::blank());
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(err) => {
                self.failure = Some(err.to_string());
                self.state = match editing {
                    Some(key) => SessionState::ComposingEdit { key },
                    None => SessionState::ComposingCreate,
                };
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!(resource = %R::KIND, "draft discarded");
        }
        self.reset(SessionState::Idle, R::blank());
    }

    /// Reload the list after a saved write. A reload that fails or stalls is
    /// only recorded on the store; the write stands.
    async fn refresh<G>(&self, store: &mut EntityStore<R>, gateway: &G)
    where
        G: Collection<R> + ?Sized,
    {
        let reload = tokio::time::timeout(self.timeout, store.reconcile(gateway)).await;
        if reload.is_err() {
            store.fail(self.timed_out("list reload gave no answer"));
        }
    }

    fn timed_out(&self, what: &str) -> TransportError {
        TransportError::timeout(format!(
            "{} within {}s",
            what,
            self.timeout.as_secs_f32()
        ))
    }

    fn reset(&mut self, state: SessionState<R::Key>, draft: R) {
        self.state = state;
        self.draft = draft;
        self.errors.clear();
        self.failure = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;
    use crate::model::{Country, CountryField, Prefix, PrefixField};

    async fn loaded_countries(gw: &InMemoryGateway) -> EntityStore<Country> {
        let mut store = EntityStore::new();
        store.load_all(gw).await.unwrap();
        store
    }

    #[test]
    fn begin_create_opens_a_blank_draft() {
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        assert_eq!(session.state(), &SessionState::ComposingCreate);
        assert_eq!(session.draft(), &Country::blank());
    }

    #[test]
    fn key_is_frozen_while_editing() {
        let mut session = EditSession::<Country>::new();
        session
            .begin_edit(&Country::new("RU", "Russia", "+7"))
            .unwrap();

        assert!(session.is_locked(CountryField::Code));
        let err = session.set_field(CountryField::Code, "XX").unwrap_err();
        assert!(matches!(err, DialbookError::ImmutableField(ref f) if f == "code"));
        assert_eq!(session.draft().code, "RU");

        session.set_field(CountryField::Name, "Rossiya").unwrap();
        assert_eq!(session.draft().name, "Rossiya");
    }

    #[test]
    fn key_is_editable_while_creating() {
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        assert!(!session.is_locked(CountryField::Code));
        session.set_field_named("code", "RU").unwrap();
        assert_eq!(session.draft().code, "RU");
    }

    #[test]
    fn set_field_requires_an_open_draft() {
        let mut session = EditSession::<Prefix>::new();
        assert!(matches!(
            session.set_field(PrefixField::Prefix, "1"),
            Err(DialbookError::Session(_))
        ));
    }

    #[test]
    fn unknown_field_names_are_rejected() {
        let mut session = EditSession::<Prefix>::new();
        session.begin_create();
        assert!(matches!(
            session.set_field_named("id", "4"),
            Err(DialbookError::UnknownField(_))
        ));
    }

    #[test]
    fn unsaved_prefix_cannot_be_edited() {
        let mut session = EditSession::<Prefix>::new();
        assert!(session.begin_edit(&Prefix::draft("1", "US")).is_err());
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn invalid_draft_stays_open_and_never_reaches_the_gateway() {
        let gw = InMemoryGateway::new();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new();
        session.begin_create();

        let outcome = session.submit(&mut store, &gw).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(session.state(), &SessionState::ComposingCreate);
        assert_eq!(
            session.errors().fields().collect::<Vec<_>>(),
            vec![CountryField::Code, CountryField::Name, CountryField::PhoneCode]
        );
        assert_eq!(gw.calls(), vec!["countries.list"]);
    }

    #[tokio::test]
    async fn editing_a_field_clears_only_its_error() {
        let gw = InMemoryGateway::new();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        session.submit(&mut store, &gw).await.unwrap();

        session.set_field(CountryField::Name, "Russia").unwrap();

        assert!(session.errors().get(CountryField::Name).is_none());
        assert!(session.errors().get(CountryField::Code).is_some());
        // No re-validation: phone code is still flagged even though nothing changed.
        assert!(session.errors().get(CountryField::PhoneCode).is_some());
    }

    #[tokio::test]
    async fn successful_create_closes_the_session() {
        let gw = InMemoryGateway::new();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        session.set_field(CountryField::Code, "RU").unwrap();
        session.set_field(CountryField::Name, "Russia").unwrap();
        session.set_field(CountryField::PhoneCode, "+7").unwrap();

        let outcome = session.submit(&mut store, &gw).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Saved(Country::new("RU", "Russia", "+7"))
        );
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(store.records(), &[Country::new("RU", "Russia", "+7")]);
    }

    #[tokio::test]
    async fn edit_submits_an_update_by_the_original_key() {
        let gw = InMemoryGateway::seeded();
        let mut store = EntityStore::<Prefix>::new();
        store.load_all(&gw).await.unwrap();
        let target = store.records()[0].clone();

        let mut session = EditSession::<Prefix>::new();
        session.begin_edit(&target).unwrap();
        session.set_field(PrefixField::Prefix, "499").unwrap();
        let outcome = session.submit(&mut store, &gw).await.unwrap();

        let saved = match outcome {
            SubmitOutcome::Saved(p) => p,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(saved.id, target.id);
        assert_eq!(store.records()[0].prefix, "499");
        assert!(gw.calls().contains(&"prefixes.update".to_string()));
    }

    #[tokio::test]
    async fn gateway_failure_keeps_the_draft_open() {
        let gw = InMemoryGateway::seeded();
        let mut store = loaded_countries(&gw).await;
        let before = store.records().to_vec();
        let mut session = EditSession::<Country>::new();
        session
            .begin_edit(&Country::new("RU", "Russia", "+7"))
            .unwrap();
        session.set_field(CountryField::Name, "Changed").unwrap();

        gw.fail_next(TransportError::status(500, "database locked"));
        let err = session.submit(&mut store, &gw).await.unwrap_err();

        assert!(matches!(err, DialbookError::Transport(_)));
        assert_eq!(
            session.state(),
            &SessionState::ComposingEdit {
                key: "RU".to_string()
            }
        );
        assert_eq!(session.draft().name, "Changed");
        assert!(session.failure().unwrap().contains("database locked"));
        assert_eq!(store.records(), before.as_slice());
    }

    #[tokio::test]
    async fn slow_gateway_times_out_back_to_composing() {
        let gw = InMemoryGateway::new().with_delay(Duration::from_millis(300));
        let mut store = EntityStore::<Country>::new();
        let mut session = EditSession::<Country>::new().with_timeout(Duration::from_millis(20));
        session.begin_create();
        session.set_field(CountryField::Code, "RU").unwrap();
        session.set_field(CountryField::Name, "Russia").unwrap();
        session.set_field(CountryField::PhoneCode, "+7").unwrap();

        let err = session.submit(&mut store, &gw).await.unwrap_err();

        match err {
            DialbookError::Transport(t) => {
                assert_eq!(t.kind, crate::error::TransportErrorKind::Timeout)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(session.state(), &SessionState::ComposingCreate);
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn slow_reload_after_a_saved_create_still_closes_the_session() {
        let gw = InMemoryGateway::new();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new().with_timeout(Duration::from_millis(50));
        session.begin_create();
        session.set_field(CountryField::Code, "RU").unwrap();
        session.set_field(CountryField::Name, "Russia").unwrap();
        session.set_field(CountryField::PhoneCode, "+7").unwrap();

        gw.delay_next_call("countries.list", Duration::from_millis(300));
        let outcome = session.submit(&mut store, &gw).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Saved(Country::new("RU", "Russia", "+7"))
        );
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(gw.countries(), vec![Country::new("RU", "Russia", "+7")]);
        assert!(store.is_empty());
        assert!(store.last_error().unwrap().contains("reload"));
    }

    #[tokio::test]
    async fn failed_reload_after_a_saved_update_still_closes_the_session() {
        let gw = InMemoryGateway::seeded();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new();
        session
            .begin_edit(&Country::new("FR", "France", "+33"))
            .unwrap();
        session.set_field(CountryField::Name, "République française").unwrap();

        gw.fail_next_call("countries.list", TransportError::status(503, "busy"));
        let outcome = session.submit(&mut store, &gw).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(store.find(&"FR".to_string()).unwrap().name, "France");
        assert!(store.last_error().unwrap().contains("busy"));
    }

    #[tokio::test]
    async fn opening_a_new_draft_discards_the_old_one() {
        let gw = InMemoryGateway::new();
        let mut store = loaded_countries(&gw).await;
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        session.submit(&mut store, &gw).await.unwrap();
        assert!(!session.errors().is_empty());

        session
            .begin_edit(&Country::new("US", "United States", "+1"))
            .unwrap();

        assert!(session.errors().is_empty());
        assert_eq!(session.draft().code, "US");
    }

    #[tokio::test]
    async fn cancel_and_idle_submit() {
        let gw = InMemoryGateway::new();
        let mut store = EntityStore::<Country>::new();
        let mut session = EditSession::<Country>::new();
        session.begin_create();
        session.set_field(CountryField::Code, "RU").unwrap();

        session.cancel();

        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.draft(), &Country::blank());
        assert!(matches!(
            session.submit(&mut store, &gw).await,
            Err(DialbookError::Session(_))
        ));
        assert!(gw.calls().is_empty());
    }
}
