//! Route configuration.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    sign_in, sign_out, sign_up_customer, sign_up_employee, switch_locked, verify_account,
};
use super::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/authentication", authentication_routes())
        .nest("/api/v1/account", account_routes())
        .with_state(state)
}

fn authentication_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/sign-up/customers", post(sign_up_customer))
        .route("/sign-up/employees", post(sign_up_employee))
        .route("/customer/verification/:token", get(verify_account))
        .route("/employee/verification/:token", get(verify_account))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/verification/:token", get(verify_account))
        .route("/lock", patch(switch_locked))
}
