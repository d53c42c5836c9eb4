use crate::application::{ApplicationError, EntityKind};
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{types::ErrorResponse, views};

/// ステータスコード・エラー種別・メッセージへの対応付け
///
/// 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す。
fn classify(err: &ApplicationError) -> (StatusCode, &'static str, String) {
    match err {
        // 404 Not Found - リクエストされたリソースが存在しない
        ApplicationError::NotFound { kind, .. } => {
            let error_type = match kind {
                EntityKind::Book => "BOOK_NOT_FOUND",
                EntityKind::Member => "MEMBER_NOT_FOUND",
                EntityKind::Loan => "LOAN_NOT_FOUND",
            };
            (StatusCode::NOT_FOUND, error_type, err.to_string())
        }

        // 400 Bad Request - 必須の値が無い・参照先が無い
        ApplicationError::InvalidArgument(msg) => {
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
        }

        // 409 Conflict - ISBN・メールアドレスの重複
        ApplicationError::Duplicate(msg) => (StatusCode::CONFLICT, "DUPLICATE", msg.clone()),

        // 500 Internal Server Error - ストレージ障害
        ApplicationError::Repository(e) => {
            tracing::error!(error = ?e, "Repository error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "REPOSITORY_ERROR",
                "An unexpected error occurred".to_string(),
            )
        }
    }
}

/// REST API層のエラー型（JSONで返す）
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = classify(&self.0);
        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

/// HTML画面用のエラー型（エラーページを返す）
#[derive(Debug)]
pub struct PageError(ApplicationError);

impl From<ApplicationError> for PageError {
    fn from(err: ApplicationError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _, message) = classify(&self.0);
        (status, Html(views::error_page(status, &message))).into_response()
    }
}
