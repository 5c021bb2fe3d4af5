use std::sync::Arc;

use crate::modules::lakes::adapters::outbound::in_memory::InMemoryLakeCatalog;
use crate::modules::lakes::adapters::outbound::postgres::PostgresLakeCatalog;
use crate::modules::lakes::core::ports::LakeCatalog;
use crate::modules::lakes::service::LakesService;
use crate::modules::simulations::adapters::outbound::in_memory::InMemorySimulations;
use crate::modules::simulations::adapters::outbound::postgres::PostgresSimulations;
use crate::modules::simulations::core::ports::{SimulationRepository, SimulationRunRepository};
use crate::modules::simulations::service::SimulationsService;
use crate::modules::users::adapters::outbound::in_memory::InMemoryAccounts;
use crate::modules::users::adapters::outbound::postgres::PostgresAccounts;
use crate::modules::users::core::ports::{RefreshTokenRepository, UserRepository};
use crate::modules::users::service::UsersService;
use crate::shared::core::security::{PasswordHasher, TokenIssuer};
use crate::shared::infrastructure::object_store::ObjectStore;
use crate::shared::infrastructure::object_store::s3::S3ObjectStore;
use crate::shared::infrastructure::postgres::{connect, migrate};
use crate::shell::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UsersService>,
    pub lakes: Arc<LakesService>,
    pub simulations: Arc<SimulationsService>,
}

impl AppState {
    /// Wires the services over the given adapters.
    pub fn assemble<A, S>(
        settings: &Settings,
        accounts: Arc<A>,
        catalog: Arc<dyn LakeCatalog>,
        simulations: Arc<S>,
        store: Arc<dyn ObjectStore>,
    ) -> Self
    where
        A: UserRepository + RefreshTokenRepository + 'static,
        S: SimulationRepository + SimulationRunRepository + 'static,
    {
        let users = UsersService::new(
            accounts.clone(),
            accounts,
            PasswordHasher::new(settings.bcrypt_cost),
            TokenIssuer::new(&settings.jwt_secret_key, settings.jwt_expire_minutes),
            settings.refresh_token_expire_days,
        );
        let lakes = Arc::new(LakesService::new(catalog, store));
        let simulations = SimulationsService::new(simulations.clone(), simulations, lakes.clone());
        Self {
            users: Arc::new(users),
            lakes,
            simulations: Arc::new(simulations),
        }
    }

    /// Postgres repositories when `DATABASE_URL` is set, in-memory ones
    /// otherwise. Rasters always come from S3.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::connect(&settings.s3()).await);

        let Some(url) = settings.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL is not set, data lives in memory only");
            return Ok(Self::assemble(
                settings,
                Arc::new(InMemoryAccounts::new()),
                Arc::new(InMemoryLakeCatalog::default()),
                Arc::new(InMemorySimulations::new()),
                store,
            ));
        };

        let pool = connect(url).await?;
        if settings.db_init_on_startup {
            migrate(&pool).await?;
        }
        Ok(Self::assemble(
            settings,
            Arc::new(PostgresAccounts::new(pool.clone())),
            Arc::new(PostgresLakeCatalog::new(pool.clone())),
            Arc::new(PostgresSimulations::new(pool)),
            store,
        ))
    }
}
