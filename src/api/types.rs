use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BookId, Ledger, Reservation, ReservationState};

/// 予約レスポンス（POST /books/:book_id/checkout, checkin など）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub reservation_id: i64,
    pub book_id: Uuid,
    pub actor_id: Uuid,
    pub checked_out_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        let status = if reservation.is_open() { "open" } else { "closed" };

        Self {
            reservation_id: reservation.id.value(),
            book_id: reservation.book_id.value(),
            actor_id: reservation.actor_id.value(),
            checked_out_at: reservation.checked_out_at,
            checked_in_at: reservation.checked_in_at,
            status: status.to_string(),
        }
    }
}

/// 書籍の予約履歴レスポンス（GET /books/:book_id/reservations）
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub book_id: Uuid,
    /// 現在借りている利用者（貸出中でなければ null）
    pub current_holder: Option<Uuid>,
    pub reservations: Vec<ReservationResponse>,
}

impl From<Ledger> for LedgerResponse {
    fn from(ledger: Ledger) -> Self {
        let book_id = ledger.book_id().value();
        let current_holder = ledger.open_reservation().map(|r| r.actor_id.value());

        Self {
            book_id,
            current_holder,
            reservations: ledger
                .into_entries()
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
        }
    }
}

/// 呼び出し元の利用者から見た書籍の状態（GET /books/:book_id/state）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationStateResponse {
    pub book_id: Uuid,
    pub checked_out: bool,
    /// 利用者の未返却の予約（借りていなければ null）
    pub reservation: Option<ReservationResponse>,
}

impl ReservationStateResponse {
    pub fn new(book_id: BookId, state: ReservationState) -> Self {
        let checked_out = state.is_checked_out();
        let reservation = match state {
            ReservationState::CheckedOut(reservation) => Some(reservation.into()),
            ReservationState::Available => None,
        };

        Self {
            book_id: book_id.value(),
            checked_out,
            reservation,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
