use crate::domain::{ActorId, BookId, LedgerViolation, ReservationId};
use crate::ports::RepositoryError;
use thiserror::Error;

/// 予約の状態が操作に合わない
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    /// この利用者はこの書籍を借りていない
    #[error("book was never checked out by this actor")]
    NotCheckedOut { book_id: BookId, actor_id: ActorId },

    /// 書籍は既に貸出中
    #[error("book is already checked out (reservation {reservation_id})")]
    AlreadyCheckedOut {
        book_id: BookId,
        reservation_id: ReservationId,
    },

    /// 返却時刻が貸出時刻より前
    #[error("checkin would precede checkout of reservation {reservation_id}")]
    CheckinPrecedesCheckout { reservation_id: ReservationId },
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ReservationApplicationError {
    /// アクセスポリシーで拒否された（未認証）
    #[error("Actor is not authenticated")]
    NotAuthenticated,

    /// 書籍が存在しない
    #[error("Book {} not found", .0.value())]
    BookNotFound(BookId),

    /// 予約が存在しない
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    /// 操作の順序が不正
    #[error("Invalid reservation state: {0}")]
    InvalidState(InvalidStateError),

    /// 予約リポジトリのエラー（そのまま伝播する）
    #[error("Reservation repository error")]
    Repository(#[source] RepositoryError),

    /// 保存済みの台帳が不変条件を満たしていない
    #[error("Reservation ledger is corrupted")]
    LedgerCorrupted(#[source] LedgerViolation),

    /// BookCatalogのエラー
    #[error("Book catalog error")]
    BookCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// AccessPolicyのエラー
    #[error("Access policy error")]
    AccessPolicyError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// AuthorDirectoryのエラー
    #[error("Author directory error")]
    AuthorDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RepositoryError> for ReservationApplicationError {
    fn from(err: RepositoryError) -> Self {
        ReservationApplicationError::Repository(err)
    }
}

impl From<InvalidStateError> for ReservationApplicationError {
    fn from(err: InvalidStateError) -> Self {
        ReservationApplicationError::InvalidState(err)
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ReservationApplicationError>;
