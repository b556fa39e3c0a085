use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{AttendanceStore, CredentialStore, MongoDB, StoreHealth, StudentStore};
use crate::recognizer::{ProcessRecognizer, Recognizer};
use crate::services::auth_service::AuthSettings;

/// Dependencies shared by every handler, resolved once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub students: Arc<dyn StudentStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub health: Arc<dyn StoreHealth>,
    pub recognizer: Arc<dyn Recognizer>,
    pub auth: AuthSettings,
    pub frontend_url: String,
}

impl AppState {
    pub fn new(db: MongoDB, config: &AppConfig) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            students: db.clone(),
            attendance: db.clone(),
            health: db,
            recognizer: Arc::new(ProcessRecognizer::new(&config.recognizer)),
            auth: AuthSettings::from_config(config),
            frontend_url: config.frontend_url.clone(),
        }
    }
}
