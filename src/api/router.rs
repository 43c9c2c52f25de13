use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, checkin_book, checkout_book, get_book_state, get_reservation,
    list_book_reservations, list_open_reservations,
};

/// Creates the API router with the reservation endpoints
///
/// Command endpoints (Write operations):
/// - POST /books/:book_id/checkout - Check a book out
/// - POST /books/:book_id/checkin - Check a book back in
///
/// Query endpoints (Read operations):
/// - GET /books/:book_id/reservations - Reservation history of a book
/// - GET /books/:book_id/state - Whether the calling actor holds the book
/// - GET /reservations/open - Books the calling actor currently holds
/// - GET /reservations/:reservation_id - A single reservation
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/books/:book_id/checkout", post(checkout_book))
        .route("/books/:book_id/checkin", post(checkin_book))
        // Query endpoints (Read operations)
        .route("/books/:book_id/reservations", get(list_book_reservations))
        .route("/books/:book_id/state", get(get_book_state))
        .route("/reservations/open", get(list_open_reservations))
        .route("/reservations/:reservation_id", get(get_reservation))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
