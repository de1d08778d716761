use std::sync::Arc;

use crate::auth::{AuthorizationResolver, JwtService, TokenService};
use crate::catalog::InMemoryCatalog;
use crate::core::Config;
use crate::core::error::Result;
use crate::core::seed;
use crate::db::Storage;
use crate::directory::TenantDirectory;
use crate::message::MessageBus;
use crate::orders::OrdersManager;
use crate::utils::{Clock, SystemClock};

/// Server state - shared handles to every service
///
/// Cloning is cheap: every field is an `Arc` or wraps one.
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | storage | redb database |
/// | directory | tenants, tables, staff |
/// | tokens | token issuer and verifier |
/// | resolver | token → AccessContext |
/// | catalog | menu used for pricing |
/// | orders | order lifecycle engine |
/// | bus | live event fan-out |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: Storage,
    pub directory: Arc<TenantDirectory>,
    pub tokens: TokenService,
    pub resolver: AuthorizationResolver,
    pub catalog: InMemoryCatalog,
    pub orders: Arc<OrdersManager>,
    pub bus: MessageBus,
    pub clock: Arc<dyn Clock>,
}

impl ServerState {
    /// Open the database under `work_dir`, wire the services and apply the
    /// seed file when configured
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let storage = Storage::open(config.database_path())?;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        let state = Self::assemble(config.clone(), storage, Arc::new(SystemClock))?;
        if let Some(path) = &config.seed_file {
            seed::load_seed_file(path, &state.directory, &state.catalog)?;
        }
        Ok(state)
    }

    /// State over an in-memory database (tests, demos)
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let storage = Storage::open_in_memory()?;
        Self::assemble(config, storage, clock)
    }

    fn assemble(config: Config, storage: Storage, clock: Arc<dyn Clock>) -> Result<Self> {
        let directory = Arc::new(TenantDirectory::new(storage.clone(), clock.clone())?);
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let tokens = TokenService::new(jwt, directory.clone());
        let resolver = AuthorizationResolver::new(tokens.clone());
        let catalog = InMemoryCatalog::new();
        let bus = MessageBus::with_capacity(config.bus_channel_capacity);
        let orders = Arc::new(OrdersManager::new(
            storage.clone(),
            directory.clone(),
            Arc::new(catalog.clone()),
            bus.clone(),
            clock.clone(),
            config.engine.clone(),
        ));

        Ok(Self {
            config,
            storage,
            directory,
            tokens,
            resolver,
            catalog,
            orders,
            bus,
            clock,
        })
    }
}
