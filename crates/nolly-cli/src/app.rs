use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use nolly_api::account::AccountClient;
use nolly_api::catalog::CatalogClient;
use nolly_query::slices::{AccountEndpoints, CatalogEndpoints};
use nolly_query::{QueryClient, Session};
use nolly_store::SqliteTokenStore;
use tracing::instrument;

use crate::config::{AppConfig, ProfilePaths, parse_base_url};

/// Environment variable holding the catalog API read access token.
pub const TOKEN_ENV: &str = "NOLLY_TMDB_TOKEN";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Session, query client and endpoint definitions for one invocation.
#[derive(Debug)]
pub struct App {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Signed-in state backed by the token store.
    pub session: Session,
    /// Shared query cache.
    pub client: QueryClient,
    /// Account endpoint definitions.
    pub account: AccountEndpoints,
}

impl App {
    /// Loads config, opens the token store and builds the account client.
    ///
    /// # Errors
    ///
    /// Returns an error if config, storage or client setup fails.
    #[instrument(skip_all)]
    pub fn new(dir: Option<&Path>) -> Result<Self> {
        let paths = ProfilePaths::resolve(dir).context("failed to resolve profile paths")?;
        let config = AppConfig::load(&paths.config_file).context("failed to load config")?;

        let store =
            SqliteTokenStore::open(Some(&paths.store_dir)).context("failed to open token store")?;
        let session = Session::new(Arc::new(store));

        let mut builder = AccountClient::builder()
            .user_agent(USER_AGENT)
            .credentials(Arc::new(session.clone()));
        if let Some(url) = parse_base_url(config.account.base_url.as_deref())? {
            builder = builder.base_url(url);
        }
        let account_api = builder.build().context("failed to build account client")?;
        let account = AccountEndpoints::new(Arc::new(account_api), &session);

        let client = QueryClient::builder()
            .session(session.clone())
            .request_timeout(config.query.timeout())
            .build();

        Ok(Self {
            config,
            session,
            client,
            account,
        })
    }

    /// Builds catalog endpoints from the `NOLLY_TMDB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if `NOLLY_TMDB_TOKEN` is not set or the client fails to build.
    #[instrument(skip_all)]
    pub fn catalog(&self) -> Result<CatalogEndpoints> {
        let token = std::env::var(TOKEN_ENV)
            .with_context(|| format!("{TOKEN_ENV} environment variable is required"))?;

        let mut builder = CatalogClient::builder()
            .access_token(token)
            .user_agent(USER_AGENT);
        if let Some(url) = parse_base_url(self.config.catalog.base_url.as_deref())? {
            builder = builder.base_url(url);
        }
        let api = builder.build().context("failed to build catalog client")?;
        Ok(CatalogEndpoints::new(Arc::new(api)))
    }
}
