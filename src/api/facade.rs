//! Per-resource query operations and data-source selection.
//!
//! `ApiFacade` is the single entry point the presentation shells call. Each
//! operation resolves a connection mode, then either serves bundled fixture
//! data (offline/demo) or builds a canonical request, fetches it, and runs
//! the decoded result through the query cache.
//!
//! Transport and decode failures surface as typed `ApiError`s so callers can
//! tell "no data" from "fetch failed"; they are logged here and never panic.
//! Concurrent identical live fetches are not de-duplicated: both hit the
//! network and the last writer wins in the cache.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::decode::{DecodeError, JsonDecoder, Page, ResponseDecoder};
use crate::api::request::RequestBuilder;
use crate::api::transport::{HttpTransport, Transport};
use crate::api::ApiError;
use crate::auth::is_demo_token;
use crate::cache::QueryCache;
use crate::fixtures::{self, FixtureSet, Resource};
use crate::models::{
    Access, Account, Character, Currency, Item, TreasuryItem, WalletEntry, World, WvwMatch,
};

/// Default locale for localizable resources.
const DEFAULT_LOCALE: &str = "en";

/// Data source selected for one logical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Offline,
    Demo,
    Live,
}

/// Facade over the Web API: mode selection, request building, caching.
///
/// Construct one at startup and share it (`Arc`) across workers; every
/// operation is safe to call concurrently.
pub struct ApiFacade<T = HttpTransport, D = JsonDecoder>
where
    T: Transport,
    D: ResponseDecoder,
{
    transport: Arc<T>,
    decoder: D,
    cache: QueryCache,
    offline: AtomicBool,
    locale: String,
}

impl ApiFacade {
    /// Production facade: reqwest transport, JSON decoder, default cache.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self::with_parts(
            Arc::new(HttpTransport::new()?),
            JsonDecoder,
            QueryCache::new(),
        ))
    }
}

impl<T, D> ApiFacade<T, D>
where
    T: Transport,
    D: ResponseDecoder,
{
    /// Assemble a facade from injected parts. Tests use this with a canned
    /// transport; shells can swap the decoder.
    pub fn with_parts(transport: Arc<T>, decoder: D, cache: QueryCache) -> Self {
        Self {
            transport,
            decoder,
            cache,
            offline: AtomicBool::new(false),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Resolve the data source for a call. The reserved demo credential wins
    /// over the offline flag; everything else follows the flag.
    pub fn mode(&self, token: Option<&str>) -> ConnectionMode {
        if token.is_some_and(is_demo_token) {
            ConnectionMode::Demo
        } else if self.is_offline() {
            ConnectionMode::Offline
        } else {
            ConnectionMode::Live
        }
    }

    fn fixture_set(mode: ConnectionMode) -> FixtureSet {
        match mode {
            ConnectionMode::Demo => FixtureSet::Demo,
            _ => FixtureSet::Offline,
        }
    }

    /// Render, fetch and cache-decode one live request.
    ///
    /// The rendered URL is the cache key; an unchanged body skips the decode
    /// entirely. The decode closure also receives the response's total-count
    /// metadata for paginated endpoints.
    async fn live<V, F>(&self, request: &RequestBuilder, decode: F) -> Result<Arc<V>, ApiError>
    where
        V: Send + Sync + 'static,
        F: FnOnce(&D, &str, Option<usize>) -> Result<V, DecodeError>,
    {
        let url = request.render();
        debug!(url, "dispatching live query");

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "live query failed");
                return Err(e);
            }
        };

        let decoder = &self.decoder;
        let total = response.total;
        self.cache
            .get_or_decode(&url, &response.body, |raw| decode(decoder, raw, total))
            .map_err(ApiError::from)
    }

    // ===== Account-scoped resources =====

    /// The account behind an API key. `Ok(None)` when the server reports the
    /// resource absent; errors mean the fetch itself failed.
    pub async fn account(&self, token: &str) -> Result<Option<Account>, ApiError> {
        match self.mode(Some(token)) {
            mode @ (ConnectionMode::Offline | ConnectionMode::Demo) => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Account);
                Ok(Some(self.decoder.decode_one(raw)?))
            }
            ConnectionMode::Live => {
                let request = RequestBuilder::new().endpoint("account").auth(token);
                let result = self.live(&request, |d, raw, _| d.decode_one(raw)).await;
                absent_on_404(result.map(|account: Arc<Account>| (*account).clone()))
            }
        }
    }

    /// Content access flags of the account, as a set.
    pub async fn account_access(&self, token: &str) -> Result<HashSet<Access>, ApiError> {
        let account = self.account(token).await?;
        Ok(account
            .map(|a| a.access.into_iter().collect())
            .unwrap_or_default())
    }

    /// Wallet entries in server response order.
    pub async fn wallet(&self, token: &str) -> Result<Vec<WalletEntry>, ApiError> {
        match self.mode(Some(token)) {
            mode @ (ConnectionMode::Offline | ConnectionMode::Demo) => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Wallet);
                Ok(self.decoder.decode_list(raw)?)
            }
            ConnectionMode::Live => {
                let request = RequestBuilder::new().endpoint("account/wallet").auth(token);
                let entries = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*entries).clone())
            }
        }
    }

    /// Wallet entries joined with their currency records, fetched in
    /// parallel. Entries keep server order; an entry whose currency is not
    /// in the catalog carries `None`.
    pub async fn wallet_labeled(
        &self,
        token: &str,
    ) -> Result<Vec<(WalletEntry, Option<Currency>)>, ApiError> {
        let (wallet, currencies) =
            futures::try_join!(self.wallet(token), self.currencies(Some(token)))?;
        Ok(wallet
            .into_iter()
            .map(|entry| {
                let currency = currencies.iter().find(|c| c.id == entry.id).cloned();
                (entry, currency)
            })
            .collect())
    }

    /// Character names only (the roster index).
    pub async fn character_names(&self, token: &str) -> Result<Vec<String>, ApiError> {
        match self.mode(Some(token)) {
            mode @ (ConnectionMode::Offline | ConnectionMode::Demo) => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Characters);
                let characters: Vec<Character> = self.decoder.decode_list(raw)?;
                Ok(characters.into_iter().map(|c| c.name).collect())
            }
            ConnectionMode::Live => {
                let request = RequestBuilder::new().endpoint("characters").auth(token);
                let names = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*names).clone())
            }
        }
    }

    /// Full character roster.
    pub async fn characters(&self, token: &str) -> Result<Vec<Character>, ApiError> {
        match self.mode(Some(token)) {
            mode @ (ConnectionMode::Offline | ConnectionMode::Demo) => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Characters);
                Ok(self.decoder.decode_list(raw)?)
            }
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("characters")
                    .ids_all()
                    .locale(&self.locale)
                    .auth(token);
                let roster = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*roster).clone())
            }
        }
    }

    /// Contents of a guild's treasury. Requires a key with guild access.
    pub async fn guild_treasury(
        &self,
        token: &str,
        guild_id: &str,
    ) -> Result<Vec<TreasuryItem>, ApiError> {
        match self.mode(Some(token)) {
            mode @ (ConnectionMode::Offline | ConnectionMode::Demo) => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::GuildTreasury);
                Ok(self.decoder.decode_list(raw)?)
            }
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint(&format!("guild/{guild_id}/treasury"))
                    .auth(token);
                let treasury = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*treasury).clone())
            }
        }
    }

    // ===== Public (unauthenticated) resources =====

    /// Every world, in server response order.
    pub async fn worlds(&self, token: Option<&str>) -> Result<Vec<World>, ApiError> {
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("worlds")
                    .ids_all()
                    .locale(&self.locale);
                let worlds = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*worlds).clone())
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Worlds);
                Ok(self.decoder.decode_list(raw)?)
            }
        }
    }

    /// Worlds by id batch. Ids are deduplicated and sorted before rendering
    /// so overlapping batches share one cache key.
    pub async fn worlds_by_ids(
        &self,
        token: Option<&str>,
        ids: &[u32],
    ) -> Result<Vec<World>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("worlds")
                    .ids(ids.iter().copied())
                    .locale(&self.locale);
                let worlds = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*worlds).clone())
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Worlds);
                let all: Vec<World> = self.decoder.decode_list(raw)?;
                Ok(all.into_iter().filter(|w| ids.contains(&w.id)).collect())
            }
        }
    }

    /// Item records by id batch, normalized the same way as `worlds_by_ids`.
    pub async fn items(&self, token: Option<&str>, ids: &[u64]) -> Result<Vec<Item>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("items")
                    .ids(ids.iter().copied())
                    .locale(&self.locale);
                let items = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*items).clone())
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Items);
                let all: Vec<Item> = self.decoder.decode_list(raw)?;
                Ok(all.into_iter().filter(|i| ids.contains(&i.id)).collect())
            }
        }
    }

    /// One page of the item catalog, with total-count metadata when the
    /// server reports it.
    pub async fn items_page(
        &self,
        token: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> Result<Page<Item>, ApiError> {
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("items")
                    .param("page", &page.to_string())
                    .param("page_size", &page_size.to_string())
                    .locale(&self.locale);
                let page = self
                    .live(&request, |d, raw, total| d.decode_page(raw, total))
                    .await?;
                Ok((*page).clone())
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Items);
                let all: Vec<Item> = self.decoder.decode_list(raw)?;
                let total = Some(all.len());
                let items = all
                    .into_iter()
                    .skip(page * page_size)
                    .take(page_size)
                    .collect();
                Ok(Page { items, total })
            }
        }
    }

    /// Currency catalog, used to label wallet entries.
    pub async fn currencies(&self, token: Option<&str>) -> Result<Vec<Currency>, ApiError> {
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("currencies")
                    .ids_all()
                    .locale(&self.locale);
                let currencies = self.live(&request, |d, raw, _| d.decode_list(raw)).await?;
                Ok((*currencies).clone())
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::Currencies);
                Ok(self.decoder.decode_list(raw)?)
            }
        }
    }

    /// The WvW match a world participates in, if any.
    pub async fn wvw_match(
        &self,
        token: Option<&str>,
        world_id: u32,
    ) -> Result<Option<WvwMatch>, ApiError> {
        match self.mode(token) {
            ConnectionMode::Live => {
                let request = RequestBuilder::new()
                    .endpoint("wvw/matches")
                    .param("world", &world_id.to_string());
                let result = self.live(&request, |d, raw, _| d.decode_one(raw)).await;
                absent_on_404(result.map(|m: Arc<WvwMatch>| (*m).clone()))
            }
            mode => {
                let raw = fixtures::raw(Self::fixture_set(mode), Resource::WvwMatch);
                Ok(Some(self.decoder.decode_one(raw)?))
            }
        }
    }

    /// The shared query cache, exposed so shells can clear it on logout.
    pub fn query_cache(&self) -> &QueryCache {
        &self.cache
    }
}

/// Map the 404 family to "absent" for single-object lookups; every other
/// error stays an error so callers can distinguish the two.
fn absent_on_404<V>(result: Result<V, ApiError>) -> Result<Option<V>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
