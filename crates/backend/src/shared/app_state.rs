use std::sync::Arc;

use crate::shared::data::store::SharedStore;
use crate::system::auth::jwt::AuthSettings;

/// Состояние приложения, доступное всем обработчикам
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(store: SharedStore, auth: AuthSettings) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }
}
