use std::sync::Arc;

use services::services::scrollrack::DecklistValidator;

pub mod config;
pub mod error;
pub mod routes;

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    validator: Arc<dyn DecklistValidator>,
}

impl AppState {
    pub fn new(validator: Arc<dyn DecklistValidator>) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &dyn DecklistValidator {
        self.validator.as_ref()
    }
}
