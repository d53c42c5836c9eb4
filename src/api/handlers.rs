use crate::application::{self, ApplicationError, EntityKind, ServiceDependencies};
use crate::domain::{BookId, LoanId, MemberId, commands::SaveLoan};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    today,
    types::{
        BookRequest, BookResponse, ErrorResponse, LoanRequest, LoanResponse, MemberRequest,
        MemberResponse, OverdueScanResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

// ============================================================================
// Books
// ============================================================================

/// GET /api/books - 書籍一覧
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookResponse>)
    )
)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = application::list_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /api/books/:id - 書籍詳細（無ければ404）
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book found", body = BookResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = application::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(BookResponse::from(book)))
}

/// POST /api/books - 書籍を登録
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid book", body = ErrorResponse),
        (status = 409, description = "ISBN already registered", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = application::save_book(&state.service_deps, req.into_command(None)).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// PUT /api/books/:id - 書籍を更新（ストレージ上はupsert）
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book saved", body = BookResponse),
        (status = 400, description = "Invalid book", body = ErrorResponse),
        (status = 409, description = "ISBN already registered", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let cmd = req.into_command(Some(BookId::from_uuid(book_id)));
    let book = application::save_book(&state.service_deps, cmd).await?;
    Ok(Json(BookResponse::from(book)))
}

/// DELETE /api/books/:id - 書籍を削除
///
/// 存在しなければ404。書籍の貸出も削除される。
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book and its loans deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Members
// ============================================================================

/// GET /api/members - 会員一覧
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "members",
    responses(
        (status = 200, description = "All members", body = Vec<MemberResponse>)
    )
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = application::list_members(&state.service_deps).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "members",
    params(("id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member =
        application::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// POST /api/members - 会員を登録
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "members",
    request_body = MemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let member = application::save_member(&state.service_deps, req.into_command(None)).await?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "members",
    params(("id" = Uuid, Path, description = "Member ID")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member saved", body = MemberResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let cmd = req.into_command(Some(MemberId::from_uuid(member_id)));
    let member = application::save_member(&state.service_deps, cmd).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// DELETE /api/members/:id - 会員を削除（無ければ404）
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "members",
    params(("id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member and their loans deleted"),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Loans
// ============================================================================

/// GET /api/loans - 貸出一覧
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans", body = Vec<LoanResponse>)
    )
)]
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = application::list_loans(&state.service_deps).await?;
    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

/// POST /api/loans - 新しい貸出を作成
///
/// 書籍と会員をIDから解決してから貸出サービスに渡す。
/// - 書籍・会員が存在しなければ404
/// - ボディが `null` なら400
/// - 日付を省略すると今日から14日間
#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Loan body is null", body = ErrorResponse),
        (status = 404, description = "Book or member not found", body = ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Option<LoanRequest>>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let deps = &state.service_deps;

    let cmd = match req {
        Some(req) => {
            let book = application::get_book(deps, BookId::from_uuid(req.book_id)).await?;
            let member =
                application::get_member(deps, MemberId::from_uuid(req.member_id)).await?;
            Some(SaveLoan {
                start_date: req.start_date,
                due_date: req.due_date,
                status: req.status,
                ..SaveLoan::new(book.id, member.id)
            })
        }
        None => None,
    };

    let loan = application::save_loan(deps, cmd, today()).await?;
    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// GET /api/loans/:id - 貸出詳細
///
/// サービスは `None` を返すだけなので、404への変換はここで行う。
#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan found", body = LoanResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = application::get_loan(&state.service_deps, LoanId::from_uuid(loan_id))
        .await?
        .ok_or_else(|| ApplicationError::not_found(EntityKind::Loan, loan_id))?;
    Ok(Json(LoanResponse::from(loan)))
}

/// DELETE /api/loans/:id - 貸出を削除
///
/// 存在しなくても204を返す。
#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 204, description = "Loan deleted, or it did not exist")
    )
)]
pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/loans/:id/return - 書籍を返却
///
/// 返却した貸出を200で返す。貸出が無ければ何もせず204。
#[utoipa::path(
    post,
    path = "/api/loans/{id}/return",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned", body = LoanResponse),
        (status = 204, description = "Loan does not exist, nothing to do")
    )
)]
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let returned =
        application::mark_returned(&state.service_deps, LoanId::from_uuid(loan_id), today())
            .await?;

    Ok(match returned {
        Some(loan) => (StatusCode::OK, Json(LoanResponse::from(loan))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /api/loans/overdue - 延滞検出を実行
#[utoipa::path(
    post,
    path = "/api/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Overdue scan finished", body = OverdueScanResponse)
    )
)]
pub async fn detect_overdue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverdueScanResponse>, ApiError> {
    let marked_overdue = application::mark_overdue_loans(&state.service_deps, today()).await?;
    Ok(Json(OverdueScanResponse { marked_overdue }))
}
