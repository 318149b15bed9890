use super::{Collection, CountryLookup, GatewayResult, PrefixFilter};
use crate::error::TransportError;
use crate::model::{Country, Prefix, PrefixId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// In-memory stand-in for the collection service.
///
/// Behaves like a well-mannered server: keeps insertion order, assigns
/// prefix ids, answers 404/409 where a real one would. Used by tests and by
/// the CLI's demo mode. Does NOT persist anything.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<ServerState>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct ServerState {
    countries: Vec<Country>,
    prefixes: Vec<Prefix>,
    next_prefix_id: PrefixId,
    failures: VecDeque<(Option<String>, TransportError)>,
    stalls: VecDeque<(String, Duration)>,
    calls: Vec<String>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small catalog for demo mode.
    pub fn seeded() -> Self {
        Self::new()
            .with_countries(vec![
                Country::new("RU", "Russia", "+7"),
                Country::new("US", "United States", "+1"),
                Country::new("DE", "Germany", "+49"),
                Country::new("FR", "France", "+33"),
            ])
            .with_prefixes(vec![
                Prefix::draft("495", "RU"),
                Prefix::draft("812", "RU"),
                Prefix::draft("212", "US"),
                Prefix::draft("30", "DE"),
                Prefix::draft("1", "FR"),
            ])
    }

    pub fn with_countries(self, countries: Vec<Country>) -> Self {
        self.lock().countries = countries;
        self
    }

    /// Prefixes without an id get one assigned, as on a real save.
    pub fn with_prefixes(self, prefixes: Vec<Prefix>) -> Self {
        {
            let mut state = self.lock();
            for prefix in prefixes {
                let stored = state.assign_id(prefix);
                state.prefixes.push(stored);
            }
        }
        self
    }

    /// Every call waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make the next call fail with `error`. Queued failures are consumed in order.
    pub fn fail_next(&self, error: TransportError) {
        self.lock().failures.push_back((None, error));
    }

    /// Make the next call named `call` (e.g. `"countries.list"`) fail.
    pub fn fail_next_call(&self, call: &str, error: TransportError) {
        self.lock()
            .failures
            .push_back((Some(call.to_string()), error));
    }

    /// Hold back the next call named `call` by `delay`, in place of any blanket delay.
    pub fn delay_next_call(&self, call: &str, delay: Duration) {
        self.lock().stalls.push_back((call.to_string(), delay));
    }

    /// Names of the operations served so far, e.g. `"countries.create"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn countries(&self) -> Vec<Country> {
        self.lock().countries.clone()
    }

    pub fn prefixes(&self) -> Vec<Prefix> {
        self.lock().prefixes.clone()
    }

    /// Change server data behind the client's back.
    pub fn insert_country(&self, country: Country) {
        self.lock().countries.push(country);
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        // A panic while holding the lock only happens in a failing test.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take_stall(&self, call: &str) -> Option<Duration> {
        let mut state = self.lock();
        let hit = state.stalls.iter().position(|(target, _)| target == call)?;
        state.stalls.remove(hit).map(|(_, delay)| delay)
    }

    async fn begin(&self, call: &str) -> GatewayResult<MutexGuard<'_, ServerState>> {
        if let Some(delay) = self.take_stall(call).or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.lock();
        state.calls.push(call.to_string());
        let hit = state
            .failures
            .iter()
            .position(|(target, _)| target.as_deref().map_or(true, |t| t == call));
        if let Some((_, err)) = hit.and_then(|i| state.failures.remove(i)) {
            return Err(err);
        }
        Ok(state)
    }
}

impl ServerState {
    fn assign_id(&mut self, mut prefix: Prefix) -> Prefix {
        match prefix.id {
            Some(id) => self.next_prefix_id = self.next_prefix_id.max(id),
            None => {
                self.next_prefix_id += 1;
                prefix.id = Some(self.next_prefix_id);
            }
        }
        prefix
    }

    fn country_index(&self, code: &str) -> GatewayResult<usize> {
        self.countries
            .iter()
            .position(|c| c.code == code)
            .ok_or_else(|| TransportError::status(404, format!("Country {} not found", code)))
    }

    fn prefix_index(&self, id: PrefixId) -> GatewayResult<usize> {
        self.prefixes
            .iter()
            .position(|p| p.id == Some(id))
            .ok_or_else(|| TransportError::status(404, format!("Prefix {} not found", id)))
    }

    fn insert_country(&mut self, country: &Country) -> GatewayResult<Country> {
        if self.countries.iter().any(|c| c.code == country.code) {
            return Err(TransportError::status(
                409,
                format!("Country {} already exists", country.code),
            ));
        }
        self.countries.push(country.clone());
        Ok(country.clone())
    }

    fn insert_prefix(&mut self, draft: &Prefix) -> Prefix {
        let stored = self.assign_id(Prefix { id: None, ..draft.clone() });
        self.prefixes.push(stored.clone());
        stored
    }
}

#[async_trait]
impl Collection<Country> for InMemoryGateway {
    async fn list(&self) -> GatewayResult<Vec<Country>> {
        let state = self.begin("countries.list").await?;
        Ok(state.countries.clone())
    }

    async fn get(&self, key: &String) -> GatewayResult<Country> {
        let state = self.begin("countries.get").await?;
        let idx = state.country_index(key)?;
        Ok(state.countries[idx].clone())
    }

    async fn create(&self, draft: &Country) -> GatewayResult<Country> {
        let mut state = self.begin("countries.create").await?;
        state.insert_country(draft)
    }

    async fn create_all(&self, drafts: &[Country]) -> GatewayResult<Vec<Country>> {
        let mut state = self.begin("countries.create_all").await?;
        // All or nothing, like a transactional bulk save.
        for (i, draft) in drafts.iter().enumerate() {
            let clash = state.countries.iter().any(|c| c.code == draft.code)
                || drafts[..i].iter().any(|d| d.code == draft.code);
            if clash {
                return Err(TransportError::status(
                    409,
                    format!("Country {} already exists", draft.code),
                ));
            }
        }
        drafts.iter().map(|d| state.insert_country(d)).collect()
    }

    async fn update(&self, key: &String, draft: &Country) -> GatewayResult<Country> {
        let mut state = self.begin("countries.update").await?;
        let idx = state.country_index(key)?;
        // The path key wins over whatever the body says.
        let stored = Country {
            code: key.clone(),
            ..draft.clone()
        };
        state.countries[idx] = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, key: &String) -> GatewayResult<()> {
        let mut state = self.begin("countries.delete").await?;
        let idx = state.country_index(key)?;
        state.countries.remove(idx);
        Ok(())
    }
}

#[async_trait]
impl Collection<Prefix> for InMemoryGateway {
    async fn list(&self) -> GatewayResult<Vec<Prefix>> {
        let state = self.begin("prefixes.list").await?;
        Ok(state.prefixes.clone())
    }

    async fn get(&self, key: &PrefixId) -> GatewayResult<Prefix> {
        let state = self.begin("prefixes.get").await?;
        let idx = state.prefix_index(*key)?;
        Ok(state.prefixes[idx].clone())
    }

    async fn create(&self, draft: &Prefix) -> GatewayResult<Prefix> {
        let mut state = self.begin("prefixes.create").await?;
        Ok(state.insert_prefix(draft))
    }

    async fn create_all(&self, drafts: &[Prefix]) -> GatewayResult<Vec<Prefix>> {
        let mut state = self.begin("prefixes.create_all").await?;
        Ok(drafts.iter().map(|d| state.insert_prefix(d)).collect())
    }

    async fn update(&self, key: &PrefixId, draft: &Prefix) -> GatewayResult<Prefix> {
        let mut state = self.begin("prefixes.update").await?;
        let idx = state.prefix_index(*key)?;
        let stored = Prefix {
            id: Some(*key),
            ..draft.clone()
        };
        state.prefixes[idx] = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, key: &PrefixId) -> GatewayResult<()> {
        let mut state = self.begin("prefixes.delete").await?;
        let idx = state.prefix_index(*key)?;
        state.prefixes.remove(idx);
        Ok(())
    }
}

#[async_trait]
impl CountryLookup for InMemoryGateway {
    async fn lookup(&self, value: &str) -> GatewayResult<Option<Country>> {
        let state = self.begin("countries.lookup").await?;
        let needle = value.trim();
        Ok(state
            .countries
            .iter()
            .find(|c| {
                c.code.eq_ignore_ascii_case(needle)
                    || c.name.to_lowercase() == needle.to_lowercase()
                    || c.phone_code == needle
            })
            .cloned())
    }
}

#[async_trait]
impl PrefixFilter for InMemoryGateway {
    async fn by_country_code(&self, code: &str) -> GatewayResult<Vec<Prefix>> {
        let state = self.begin("prefixes.by_country_code").await?;
        Ok(state
            .prefixes
            .iter()
            .filter(|p| p.country_code == code)
            .cloned()
            .collect())
    }

    async fn by_country_name(&self, name: &str) -> GatewayResult<Vec<Prefix>> {
        let state = self.begin("prefixes.by_country_name").await?;
        let name = name.to_lowercase();
        let codes: Vec<&str> = state
            .countries
            .iter()
            .filter(|c| c.name.to_lowercase() == name)
            .map(|c| c.code.as_str())
            .collect();
        Ok(state
            .prefixes
            .iter()
            .filter(|p| codes.contains(&p.country_code.as_str()))
            .cloned()
            .collect())
    }
}
