// Application state for HTTP handlers
use crate::application::flight_service::FlightService;

#[derive(Clone)]
pub struct AppState {
    pub flight_service: FlightService,
}
