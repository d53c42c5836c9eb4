pub mod error;
pub mod handlers;
pub mod openapi;
pub mod pages;
pub mod router;
pub mod types;
pub mod views;

pub use error::{ApiError, PageError};
pub use router::create_router;
pub use types::*;

/// サーバーのローカル日付（貸出日・返却日・延滞判定の基準）
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
