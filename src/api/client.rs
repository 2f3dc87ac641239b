use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_stream::try_stream;
use bon::Builder;
use futures::Stream;
use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use url::Url;

use super::types::TransactionType;
use super::types::request::{
    ConnectWalletBody, GamesByCategoryQuery, PlaceBetBody, TransactionsQuery, TransferBody,
    UserBetsRequest,
};
use super::types::response::{
    AuthResponse, Bet, DatabaseCheckResponse, Game, HealthResponse, Transaction,
};
use crate::auth::{DEFAULT_STORAGE_PREFIX, Session, SessionKeys};
use crate::error::Error;
use crate::storage::{MemoryStore, SessionStore};
use crate::types::Decimal;
use crate::{API_URL_VAR, DEFAULT_HOST, Result, ToQueryParams as _, bearer_headers};

const DEFAULT_USER_AGENT: &str = "rs_betting_client";

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
#[non_exhaustive]
pub struct Config {
    /// Namespace of the persisted session keys: `{prefix}_token`, `{prefix}_user_id` and
    /// `{prefix}_wallet_address`. Defaults to `betting`.
    #[builder(into, default = DEFAULT_STORAGE_PREFIX.to_owned())]
    storage_prefix: String,
    /// Value of the `User-Agent` header sent with every request.
    #[builder(into, default = DEFAULT_USER_AGENT.to_owned())]
    user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

/// Client for the betting platform API.
///
/// Holds the session obtained from [`Client::authenticate_wallet`] and sends its token as
/// `Authorization: Bearer <token>` on every request. Methods that need a session fail with
/// [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) before touching the network when
/// none is held.
///
/// Cloning is cheap and clones share the session, so construct one client at startup and
/// hand it to whatever needs it.
///
/// # Example
///
/// ```no_run
/// use betting_client_sdk::api::{Client, Config};
/// use betting_client_sdk::types::dec;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:3001/api", Config::default())?;
///
/// let games = client.get_all_games().await?;
///
/// client.authenticate_wallet("0x56687bf447db6ffa42ffe2204a05edaa20f55839", "0xsignature").await?;
/// let bet = client
///     .place_bet(&games[0].id, dec!(1.5), &betting_client_sdk::generate_client_seed())
///     .await?;
/// println!("placed bet {} ({})", bet.id, bet.status);
/// # Ok(())
/// # }
/// ```
pub struct Client<St: SessionStore = MemoryStore> {
    inner: Arc<ClientInner<St>>,
}

struct ClientInner<St: SessionStore> {
    /// The [`Url`] the client was configured with.
    host: Url,
    /// `host` without a trailing slash; endpoint paths are appended to it.
    base: String,
    /// `base` with a trailing `/api` removed, where the health endpoints live.
    root: String,
    /// The inner [`ReqwestClient`] used to make requests.
    client: ReqwestClient,
    keys: SessionKeys,
    /// In-memory copy of the session, mirrored to `store` on every change.
    session: RwLock<Session>,
    store: St,
}

impl<St: SessionStore> Clone for Client<St> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<St: SessionStore + fmt::Debug> fmt::Debug for Client<St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.inner.host.as_str())
            .field("session", &*self.read_session())
            .field("store", &self.inner.store)
            .finish_non_exhaustive()
    }
}

impl Default for Client<MemoryStore> {
    fn default() -> Self {
        Client::new(DEFAULT_HOST, Config::default())
            .expect("Client with default endpoint should succeed")
    }
}

impl Client<MemoryStore> {
    /// Creates a client whose session lives only in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client fails to build.
    pub fn new(host: &str, config: Config) -> Result<Self> {
        Client::with_store(host, config, MemoryStore::new())
    }
}

impl<St: SessionStore> Client<St> {
    /// Creates a client backed by `store`, loading any session persisted there.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or cannot be a base, the HTTP client fails
    /// to build, or the store cannot be read.
    pub fn with_store(host: &str, config: Config, store: St) -> Result<Self> {
        let host = Url::parse(host)?;
        if host.cannot_be_a_base() {
            return Err(Error::validation(format!("{host} cannot be used as a base URL")));
        }

        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_str(&config.user_agent)?);
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        let base = host.as_str().trim_end_matches('/').to_owned();
        let root = base.strip_suffix("/api").unwrap_or(&base).to_owned();

        let keys = SessionKeys::new(&config.storage_prefix);
        let session = keys.load(&store)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            host = %host,
            authenticated = session.is_authenticated(),
            "client created"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                host,
                base,
                root,
                client,
                keys,
                session: RwLock::new(session),
                store,
            }),
        })
    }

    /// Creates a client against the URL in the `BETTING_API_URL` environment variable,
    /// falling back to [`DEFAULT_HOST`] when it is unset or empty.
    ///
    /// # Errors
    ///
    /// Same as [`Client::with_store`].
    pub fn from_env(config: Config, store: St) -> Result<Self> {
        let host = std::env::var(API_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());

        Client::with_store(host.trim(), config, store)
    }

    /// Returns the host URL for the client.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.inner.host
    }

    /// Returns the server root used by [`Self::check_health`] and [`Self::check_database`]:
    /// the host with a trailing `/api` removed.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.inner.root
    }

    /// Returns the backing session store.
    #[must_use]
    pub fn store(&self) -> &St {
        &self.inner.store
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.read_session().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_session().is_authenticated()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.read_session().user_id.clone()
    }

    #[must_use]
    pub fn wallet_address(&self) -> Option<String> {
        self.read_session().wallet_address.clone()
    }

    /// Replaces the session and persists all three fields. Nothing is validated.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Storage`](crate::error::Kind::Storage) error if the store rejects the
    /// write. Both the store and the in-memory session then keep the previous session.
    pub fn set_session(&self, token: String, user_id: String, wallet_address: String) -> Result<()> {
        self.replace_session(Session::new(token, user_id, wallet_address))?;

        #[cfg(feature = "tracing")]
        {
            let session = self.read_session();
            tracing::debug!(
                user_id = ?session.user_id,
                wallet_address = ?session.wallet_address,
                "session set"
            );
        }

        Ok(())
    }

    /// Drops the session and removes the three persisted keys.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Storage`](crate::error::Kind::Storage) error if the store rejects the
    /// removal. Both the store and the in-memory session then keep the previous session.
    pub fn clear_session(&self) -> Result<()> {
        self.replace_session(Session::default())?;

        #[cfg(feature = "tracing")]
        tracing::debug!("session cleared");

        Ok(())
    }

    /// Logs out. Equivalent to [`Self::clear_session`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::clear_session`].
    pub fn deauthenticate(&self) -> Result<()> {
        self.clear_session()
    }

    /// Exchanges a wallet signature for a session and stores it, along with `address`.
    ///
    /// `POST /auth/connect`
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the signature or the request fails, and a
    /// [`Kind::Storage`](crate::error::Kind::Storage) error if the session cannot be persisted.
    pub async fn authenticate_wallet(&self, address: &str, signature: &str) -> Result<AuthResponse> {
        let body = ConnectWalletBody { address, signature };
        let request = self
            .client()
            .request(Method::POST, self.url("/auth/connect"))
            .json(&body)
            .build()?;

        let response: AuthResponse =
            crate::request(self.client(), request, self.optional_auth()?).await?;

        self.set_session(
            response.token.clone(),
            response.user_id.clone(),
            address.to_owned(),
        )?;

        Ok(response)
    }

    /// `GET /games`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a valid list of games.
    pub async fn get_all_games(&self) -> Result<Vec<Game>> {
        self.get("/games", None).await
    }

    /// `GET /games?category=…`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a valid list of games.
    pub async fn get_games_by_category(&self, category: &str) -> Result<Vec<Game>> {
        let query = GamesByCategoryQuery { category }.query_params();
        self.get(&format!("/games{query}"), None).await
    }

    /// `GET /games/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, e.g. a `404` for an unknown id.
    pub async fn get_game(&self, game_id: &str) -> Result<Game> {
        self.get(&format!("/games/{game_id}"), None).await
    }

    /// Places a bet. `client_seed` is forwarded as-is for the provably-fair draw; see
    /// [`crate::generate_client_seed`] for a ready-made one.
    ///
    /// `POST /bets/place` with body `{gameId, betAmount, clientSeed}`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn place_bet(&self, game_id: &str, amount: Decimal, client_seed: &str) -> Result<Bet> {
        let headers = self.required_auth("place_bet")?;
        let body = PlaceBetBody {
            game_id,
            bet_amount: amount,
            client_seed,
        };
        let request = self
            .client()
            .request(Method::POST, self.url("/bets/place"))
            .json(&body)
            .build()?;

        crate::request(self.client(), request, Some(headers)).await
    }

    /// `GET /bets/{id}`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn get_bet(&self, bet_id: &str) -> Result<Bet> {
        let headers = self.required_auth("get_bet")?;
        self.get(&format!("/bets/{bet_id}"), Some(headers)).await
    }

    /// Asks the server to settle a pending bet. The request carries no body.
    ///
    /// `POST /bets/{id}/settle`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn settle_bet(&self, bet_id: &str) -> Result<Bet> {
        let headers = self.required_auth("settle_bet")?;
        let request = self
            .client()
            .request(Method::POST, self.url(&format!("/bets/{bet_id}/settle")))
            .build()?;

        crate::request(self.client(), request, Some(headers)).await
    }

    /// Lists the session user's bets. Requires both a token and a user id.
    ///
    /// `GET /bets/user/{userId}?status=…&limit=…&offset=…`, omitting unset parameters
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when the session lacks a token or a user id, otherwise an error if the request
    /// fails.
    pub async fn get_user_bets(&self, request: &UserBetsRequest) -> Result<Vec<Bet>> {
        let session = self.session();
        let (Some(token), Some(user_id)) = (session.token(), session.user_id()) else {
            return Err(Error::auth_required("get_user_bets"));
        };
        let headers = bearer_headers(token)?;

        let query = request.query_params();
        self.get(&format!("/bets/user/{user_id}{query}"), Some(headers))
            .await
    }

    /// `POST /transactions/deposit` with body `{amount, tokenSymbol}`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn deposit(&self, amount: Decimal, token_symbol: &str) -> Result<Transaction> {
        self.transfer("deposit", amount, token_symbol).await
    }

    /// `POST /transactions/withdraw` with body `{amount, tokenSymbol}`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn withdraw(&self, amount: Decimal, token_symbol: &str) -> Result<Transaction> {
        self.transfer("withdraw", amount, token_symbol).await
    }

    /// `GET /transactions[?type=…]`
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::AuthRequired`](crate::error::Kind::AuthRequired) error without sending
    /// anything when no session is held, otherwise an error if the request fails.
    pub async fn get_transactions(
        &self,
        transaction_type: Option<&TransactionType>,
    ) -> Result<Vec<Transaction>> {
        let headers = self.required_auth("get_transactions")?;
        let query = TransactionsQuery { transaction_type }.query_params();

        self.get(&format!("/transactions{query}"), Some(headers))
            .await
    }

    /// Calls `GET {root}/health`. Never fails: when the server cannot be reached, the result
    /// has `status = "offline"` and `error` set to the failure message.
    ///
    /// A reachable server's record is returned whatever its HTTP status. An answer that is
    /// not a health record (not JSON, or JSON without a string `status`) is also reported as
    /// `offline`, with the deserialization failure as `error`.
    pub async fn check_health(&self) -> HealthResponse {
        match self.get_root("health").await {
            Ok(health) => health,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, root = %self.root(), "health check failed");

                HealthResponse::offline(failure_message(&e))
            }
        }
    }

    /// Calls `GET {root}/db-check`. Never fails: when the server cannot be reached, or its
    /// answer is not a JSON object with a string `status`, the result has `status = "error"`,
    /// `database = "disconnected"` and `error` set.
    pub async fn check_database(&self) -> DatabaseCheckResponse {
        match self.get_root("db-check").await {
            Ok(check) => check,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, root = %self.root(), "database check failed");

                DatabaseCheckResponse::unreachable(failure_message(&e))
            }
        }
    }

    /// Streams every bet of the session user matching `request.status`, fetching
    /// `page_size` bets at a time starting from `request.offset`.
    ///
    /// The stream ends after the first page shorter than `page_size`, and stops at the first
    /// error, which it yields.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use betting_client_sdk::api::Client;
    /// use betting_client_sdk::api::types::BetStatus;
    /// use betting_client_sdk::api::types::request::UserBetsRequest;
    /// use futures::StreamExt as _;
    ///
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let request = UserBetsRequest::builder().status(BetStatus::Won).build();
    /// let stream = client.stream_user_bets(request, 50);
    /// futures::pin_mut!(stream);
    ///
    /// while let Some(bet) = stream.next().await {
    ///     println!("{}", bet?.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn stream_user_bets(
        &self,
        request: UserBetsRequest,
        page_size: u32,
    ) -> impl Stream<Item = Result<Bet>> + '_ {
        let start = request.offset.unwrap_or_default();

        self.stream_pages(
            move |client, limit, offset| {
                let page = UserBetsRequest {
                    status: request.status.clone(),
                    limit: Some(limit),
                    offset: Some(offset),
                };
                async move { client.get_user_bets(&page).await }
            },
            start,
            page_size,
        )
    }

    /// Offset-paginated stream over `call`, which is handed the client, a limit and an offset.
    fn stream_pages<'client, Call, Fut, Data>(
        &'client self,
        call: Call,
        start: u32,
        page_size: u32,
    ) -> impl Stream<Item = Result<Data>> + 'client
    where
        Call: Fn(&'client Client<St>, u32, u32) -> Fut + 'client,
        Fut: Future<Output = Result<Vec<Data>>> + 'client,
        Data: 'client,
    {
        let limit = page_size.max(1);

        try_stream! {
            let mut offset = start;

            loop {
                let data = call(self, limit, offset).await?;
                let count = u32::try_from(data.len()).unwrap_or(u32::MAX);

                for item in data {
                    yield item;
                }

                if count < limit {
                    break;
                }

                offset = offset.saturating_add(count);
            }
        }
    }

    async fn transfer(
        &self,
        direction: &'static str,
        amount: Decimal,
        token_symbol: &str,
    ) -> Result<Transaction> {
        let headers = self.required_auth(direction)?;
        let body = TransferBody {
            amount,
            token_symbol,
        };
        let request = self
            .client()
            .request(Method::POST, self.url(&format!("/transactions/{direction}")))
            .json(&body)
            .build()?;

        crate::request(self.client(), request, Some(headers)).await
    }

    async fn get<Res: DeserializeOwned>(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<Res> {
        let headers = match headers {
            Some(headers) => Some(headers),
            None => self.optional_auth()?,
        };
        let request = self.client().request(Method::GET, self.url(path)).build()?;

        crate::request(self.client(), request, headers).await
    }

    /// Health-style request: any reachable JSON answer counts, whatever the status code.
    async fn get_root<Res: DeserializeOwned>(&self, endpoint: &str) -> Result<Res> {
        let mut request = self
            .client()
            .request(Method::GET, format!("{}/{endpoint}", self.inner.root))
            .build()?;
        if let Some(headers) = self.optional_auth()? {
            request.headers_mut().extend(headers);
        }

        let response = self.client().execute(request).await?;
        let body = response.text().await?;

        crate::serde_helpers::deserialize_with_warnings(serde_json::from_str(&body)?)
    }

    /// Bearer headers for the current token, or `AuthRequired` naming `operation`.
    fn required_auth(&self, operation: &'static str) -> Result<HeaderMap> {
        match self.read_session().token() {
            Some(token) => bearer_headers(token),
            None => Err(Error::auth_required(operation)),
        }
    }

    /// Bearer headers when a token is held; public endpoints still carry it.
    fn optional_auth(&self) -> Result<Option<HeaderMap>> {
        self.read_session().token().map(bearer_headers).transpose()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    fn client(&self) -> &ReqwestClient {
        &self.inner.client
    }

    /// Persists `next`, then swaps it in. The write lock is held across both so concurrent
    /// replacements reach the store and memory in the same order.
    fn replace_session(&self, next: Session) -> Result<()> {
        let mut session = self.write_session();
        self.inner.keys.persist(&self.inner.store, &next)?;
        *session = next;
        Ok(())
    }

    fn read_session(&self) -> RwLockReadGuard<'_, Session> {
        // The session is replaced wholesale, so a poisoned lock never holds a torn value.
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The innermost message of a failure, as reported by the health checks.
fn failure_message(error: &Error) -> String {
    error
        .inner()
        .map_or_else(|| error.to_string(), ToString::to_string)
}
