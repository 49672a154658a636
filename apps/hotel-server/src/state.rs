//! Application state.

use std::sync::Arc;

use auth::{JwtManager, PasswordHasher};
use hotel_store::Store;

use crate::config::Config;
use crate::services::price_client::PriceLookup;

/// Shared application state.
pub struct AppState<S: Store> {
    /// Server configuration.
    pub config: Config,
    /// Resource store.
    pub store: S,
    /// JWT manager.
    pub jwt_manager: JwtManager,
    /// Password hasher.
    pub hasher: PasswordHasher,
    /// Room price source.
    pub prices: Arc<dyn PriceLookup>,
}

impl<S: Store> AppState<S> {
    /// Creates new application state.
    pub fn new(
        config: Config,
        store: S,
        jwt_manager: JwtManager,
        prices: Arc<dyn PriceLookup>,
    ) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        Self {
            config,
            store,
            jwt_manager,
            hasher,
            prices,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;
