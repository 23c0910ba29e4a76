use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::RecordStore;
use crate::middleware::AuthGate;

/// Shared, read-only request state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn RecordStore>) -> Self {
        let keys = JwtKeys::new(
            &config.security.token_secret,
            config.security.jwt_expiry_hours,
        );
        let gate = AuthGate::new(
            config.security.bypass_routes.clone(),
            config.security.auth_cookie_name.clone(),
            keys,
        );

        Self {
            config: Arc::new(config),
            store,
            gate: Arc::new(gate),
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        self.gate.keys()
    }
}
