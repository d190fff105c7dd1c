use std::sync::Arc;

use crate::{auth::JwtKeys, domain::ports::inbound::UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserService>, jwt: JwtKeys) -> Self {
        Self {
            user_service,
            jwt: Arc::new(jwt),
        }
    }
}
