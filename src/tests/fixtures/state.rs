use std::sync::Arc;

use uuid::Uuid;

use crate::modules::lakes::adapters::outbound::in_memory::InMemoryLakeCatalog;
use crate::modules::simulations::adapters::outbound::in_memory::InMemorySimulations;
use crate::modules::users::adapters::outbound::in_memory::InMemoryAccounts;
use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
use crate::shell::config::Settings;
use crate::shell::state::AppState;
use crate::tests::fixtures::users::PASSWORD;

pub struct TestContext {
    pub state: AppState,
    pub accounts: Arc<InMemoryAccounts>,
    pub catalog: Arc<InMemoryLakeCatalog>,
    pub store: Arc<InMemoryObjectStore>,
    pub simulations: Arc<InMemorySimulations>,
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::from_lookup(|_| None).unwrap();
    settings.bcrypt_cost = 4;
    settings.jwt_secret_key = "test-secret".into();
    settings.jwt_expire_minutes = 15;
    settings
}

/// Application state over in-memory adapters only.
pub async fn make_test_context() -> TestContext {
    let accounts = Arc::new(InMemoryAccounts::new());
    let catalog = Arc::new(InMemoryLakeCatalog::default());
    let store = Arc::new(InMemoryObjectStore::new());
    let simulations = Arc::new(InMemorySimulations::new());
    let state = AppState::assemble(
        &test_settings(),
        accounts.clone(),
        catalog.clone(),
        simulations.clone(),
        store.clone(),
    );
    TestContext {
        state,
        accounts,
        catalog,
        store,
        simulations,
    }
}

pub async fn signed_up_user(state: &AppState, email: &str) -> (Uuid, String) {
    let pair = state.users.sign_up(email, PASSWORD).await.unwrap();
    let user = state.users.current_user(&pair.access_token).await.unwrap();
    (user.id, pair.access_token)
}

pub async fn signed_up_token(state: &AppState, email: &str) -> String {
    signed_up_user(state, email).await.1
}
