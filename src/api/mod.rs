pub mod request;
pub mod response;
pub mod routes;

pub use request::PredictRequest;
pub use response::{ErrorResponse, HealthResponse, PredictResponse, ReadyResponse};
pub use routes::{create_router, AppState};
