use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    handlers::{self, AppState},
    openapi::create_openapi_router,
    pages,
};

/// Creates the router with the REST API and the HTML screens
///
/// REST endpoints (JSON):
/// - /api/books, /api/members: list, create, get, update, delete
/// - /api/loans: list, create, get, delete
/// - POST /api/loans/:id/return - Return a book
/// - POST /api/loans/overdue - Mark overdue loans
///
/// HTML screens:
/// - / (menu), /books, /members, /loans and their forms
///
/// API documentation:
/// - /swagger-ui, /api-docs/openapi.json
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        .merge(api_routes())
        .merge(page_routes())
        // Add application state
        .with_state(state)
        .merge(create_openapi_router())
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route(
            "/api/books/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route(
            "/api/members",
            get(handlers::list_members).post(handlers::create_member),
        )
        .route(
            "/api/members/:id",
            get(handlers::get_member)
                .put(handlers::update_member)
                .delete(handlers::delete_member),
        )
        .route(
            "/api/loans",
            get(handlers::list_loans).post(handlers::create_loan),
        )
        .route("/api/loans/overdue", post(handlers::detect_overdue))
        .route(
            "/api/loans/:id",
            get(handlers::get_loan).delete(handlers::delete_loan),
        )
        .route("/api/loans/:id/return", post(handlers::return_loan))
}

fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::menu))
        // Books
        .route("/books", get(pages::books))
        .route("/books/new", get(pages::new_book))
        .route("/books/save", post(pages::save_book))
        .route("/books/edit/:id", get(pages::edit_book))
        .route("/books/delete/:id", get(pages::delete_book))
        // Members
        .route("/members", get(pages::members))
        .route("/members/new", get(pages::new_member))
        .route("/members/save", post(pages::save_member))
        .route("/members/edit/:id", get(pages::edit_member))
        .route("/members/delete/:id", get(pages::delete_member))
        // Loans
        .route("/loans", get(pages::loans))
        .route("/loans/new", get(pages::new_loan))
        .route("/loans/save", post(pages::save_loan))
        .route("/loans/return/:id", get(pages::return_loan))
        .route("/loans/delete/:id", get(pages::delete_loan))
}
