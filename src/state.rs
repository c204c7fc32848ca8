use std::sync::Arc;

use crate::services::storage::TripStore;
use crate::services::trip_parser::TripParser;

pub struct AppState {
    pub parser: TripParser,
    pub store: Arc<dyn TripStore>,
}
