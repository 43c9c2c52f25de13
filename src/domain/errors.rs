use thiserror::Error;

use super::{BookId, ReservationId};

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckinError {
    /// 既に返却済み（checked_in_at は一度設定されたら変更不可）
    #[error("reservation {0} is already checked in")]
    AlreadyCheckedIn(ReservationId),
    /// 返却時刻が貸出時刻より前
    #[error("checkin of reservation {0} precedes its checkout")]
    CheckinPrecedesCheckout(ReservationId),
}

/// 予約台帳の不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerViolation {
    /// 同一書籍に未返却の予約が複数存在する
    #[error("book {book_id:?} has {count} open reservations")]
    MultipleOpenReservations { book_id: BookId, count: usize },
    /// 返却時刻が貸出時刻より前の行がある
    #[error("reservation {0} was checked in before it was checked out")]
    CheckinBeforeCheckout(ReservationId),
    /// 別の書籍の行が混入している
    #[error("reservation {0} belongs to another book")]
    ForeignBook(ReservationId),
}
