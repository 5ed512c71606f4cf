//! HTTP surface over the authentication service.

mod extractors;
mod handlers;
mod routes;
mod state;

pub use extractors::ValidatedJson;
pub use handlers::{LockRequest, MessageResponse, SignInRequest, SignUpRequest};
pub use routes::create_router;
pub use state::AppState;
