use crate::application;
use crate::domain::{BookId, LoanId, LoanStatus, MemberId, commands::SaveLoan};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::PageError,
    handlers::AppState,
    today,
    types::{BookForm, LoanForm, MemberForm},
    views,
};

type PageResult = Result<Html<String>, PageError>;
type RedirectResult = Result<Redirect, PageError>;

pub async fn menu() -> Html<String> {
    Html(views::menu_page())
}

// ============================================================================
// Books
// ============================================================================

pub async fn books(State(state): State<Arc<AppState>>) -> PageResult {
    let books = application::list_books(&state.service_deps).await?;
    Ok(Html(views::books_page(&books)))
}

pub async fn new_book() -> Html<String> {
    Html(views::book_form_page(None))
}

/// 書籍フォームの送信（新規・編集共通）
pub async fn save_book(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BookForm>,
) -> RedirectResult {
    application::save_book(&state.service_deps, form.into()).await?;
    Ok(Redirect::to("/books"))
}

pub async fn edit_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> PageResult {
    let book = application::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Html(views::book_form_page(Some(&book))))
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> RedirectResult {
    application::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Redirect::to("/books"))
}

// ============================================================================
// Members
// ============================================================================

pub async fn members(State(state): State<Arc<AppState>>) -> PageResult {
    let members = application::list_members(&state.service_deps).await?;
    Ok(Html(views::members_page(&members)))
}

pub async fn new_member() -> Html<String> {
    Html(views::member_form_page(None))
}

pub async fn save_member(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MemberForm>,
) -> RedirectResult {
    application::save_member(&state.service_deps, form.into()).await?;
    Ok(Redirect::to("/members"))
}

pub async fn edit_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> PageResult {
    let member =
        application::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Html(views::member_form_page(Some(&member))))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> RedirectResult {
    application::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Redirect::to("/members"))
}

// ============================================================================
// Loans
// ============================================================================

/// 貸出一覧（書籍名・会員名を表示するため3つの一覧を並行取得する）
pub async fn loans(State(state): State<Arc<AppState>>) -> PageResult {
    let deps = &state.service_deps;
    let (loans, books, members) = futures::try_join!(
        application::list_loans(deps),
        application::list_books(deps),
        application::list_members(deps),
    )?;
    Ok(Html(views::loans_page(&loans, &books, &members)))
}

pub async fn new_loan(State(state): State<Arc<AppState>>) -> PageResult {
    let deps = &state.service_deps;
    let (books, members) = futures::try_join!(
        application::list_books(deps),
        application::list_members(deps),
    )?;
    Ok(Html(views::loan_form_page(&books, &members)))
}

/// 貸出フォームの送信
///
/// 書籍・会員を解決し、Active状態で保存する。
pub async fn save_loan(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoanForm>,
) -> RedirectResult {
    let deps = &state.service_deps;
    let book = application::get_book(deps, BookId::from_uuid(form.book_id)).await?;
    let member = application::get_member(deps, MemberId::from_uuid(form.member_id)).await?;

    let cmd = SaveLoan {
        start_date: form.start_date,
        due_date: form.due_date,
        status: Some(LoanStatus::Active),
        ..SaveLoan::new(book.id, member.id)
    };
    application::save_loan(deps, Some(cmd), today()).await?;
    Ok(Redirect::to("/loans"))
}

/// 返却（貸出が無ければ何もしない）
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> RedirectResult {
    application::mark_returned(&state.service_deps, LoanId::from_uuid(loan_id), today())
        .await?;
    Ok(Redirect::to("/loans"))
}

pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> RedirectResult {
    application::delete_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;
    Ok(Redirect::to("/loans"))
}
