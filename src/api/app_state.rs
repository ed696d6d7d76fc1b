use std::sync::Arc;

use crate::{config::AppConfig, persistence::AccountStore, service::accounts::Accounts};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Accounts,
}
impl AppState {
    pub fn new(config: AppConfig, store: impl AccountStore + 'static) -> Self {
        Self {
            config: Arc::new(config),
            accounts: Accounts::new(Arc::new(store)),
        }
    }
}
