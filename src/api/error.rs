use crate::application::reservation::{InvalidStateError, ReservationApplicationError};
use crate::ports::RepositoryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(ReservationApplicationError);

impl From<ReservationApplicationError> for ApiError {
    fn from(err: ReservationApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 401 Unauthorized - アクセスポリシーで拒否
            ReservationApplicationError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Actor is not authenticated".to_string(),
            ),

            // 404 Not Found
            ReservationApplicationError::BookNotFound(_) => (
                StatusCode::NOT_FOUND,
                "BOOK_NOT_FOUND",
                "Book not found".to_string(),
            ),
            ReservationApplicationError::ReservationNotFound(_) => (
                StatusCode::NOT_FOUND,
                "RESERVATION_NOT_FOUND",
                "Reservation not found".to_string(),
            ),
            // 借りていない書籍の返却も404で返すが、コードで区別できるようにする
            ReservationApplicationError::InvalidState(InvalidStateError::NotCheckedOut {
                ..
            }) => (
                StatusCode::NOT_FOUND,
                "NOT_CHECKED_OUT",
                "Book is not checked out by this actor".to_string(),
            ),

            // 409 Conflict - 既に貸出中
            ReservationApplicationError::InvalidState(ref e @ InvalidStateError::AlreadyCheckedOut {
                ..
            }) => (StatusCode::CONFLICT, "ALREADY_CHECKED_OUT", e.to_string()),
            ReservationApplicationError::Repository(RepositoryError::OpenReservationExists(_)) => (
                StatusCode::CONFLICT,
                "ALREADY_CHECKED_OUT",
                "Book was checked out concurrently".to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ReservationApplicationError::InvalidState(
                ref e @ InvalidStateError::CheckinPrecedesCheckout { .. },
            ) => {
                tracing::error!("Clock went backwards: {}", e);
                internal_error("INVALID_STATE")
            }
            ReservationApplicationError::LedgerCorrupted(ref e) => {
                tracing::error!("Reservation ledger violation: {}", e);
                internal_error("LEDGER_CORRUPTED")
            }
            ReservationApplicationError::Repository(ref e) => {
                tracing::error!("Reservation repository error: {}", e);
                internal_error("REPOSITORY_ERROR")
            }
            ReservationApplicationError::BookCatalogError(ref e) => {
                tracing::error!("Book catalog error: {}", e);
                internal_error("BOOK_CATALOG_ERROR")
            }
            ReservationApplicationError::AccessPolicyError(ref e) => {
                tracing::error!("Access policy error: {}", e);
                internal_error("ACCESS_POLICY_ERROR")
            }
            ReservationApplicationError::AuthorDirectoryError(ref e) => {
                tracing::error!("Author directory error: {}", e);
                internal_error("AUTHOR_DIRECTORY_ERROR")
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

fn internal_error(error_type: &'static str) -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_type,
        "An unexpected error occurred".to_string(),
    )
}
