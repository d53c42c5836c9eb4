//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{handlers, types};
use crate::domain::LoanStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "0.1.0",
        description = "Library REST API: books, members and loans"
    ),
    paths(
        // Health
        handlers::health_check,
        // Books
        handlers::list_books,
        handlers::get_book,
        handlers::create_book,
        handlers::update_book,
        handlers::delete_book,
        // Members
        handlers::list_members,
        handlers::get_member,
        handlers::create_member,
        handlers::update_member,
        handlers::delete_member,
        // Loans
        handlers::list_loans,
        handlers::create_loan,
        handlers::get_loan,
        handlers::delete_loan,
        handlers::return_loan,
        handlers::detect_overdue,
    ),
    components(
        schemas(
            types::BookRequest,
            types::BookResponse,
            types::MemberRequest,
            types::MemberResponse,
            types::LoanRequest,
            types::LoanResponse,
            types::OverdueScanResponse,
            types::ErrorResponse,
            LoanStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "books", description = "Book catalogue"),
        (name = "members", description = "Library members"),
        (name = "loans", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, JSON document at `/api-docs/openapi.json`
pub fn create_openapi_router() -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui");
    Router::new().merge(swagger_ui.url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rest_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/books",
            "/api/books/{id}",
            "/api/members",
            "/api/members/{id}",
            "/api/loans",
            "/api/loans/{id}",
            "/api/loans/{id}/return",
            "/api/loans/overdue",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("LoanResponse"));
        assert!(schemas.contains_key("LoanStatus"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
