use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActorId, BookId, CheckinError, ReservationId};

/// 予約 - 1冊の書籍の1回の貸出サイクル（貸出〜返却）
///
/// 台帳の1行。貸出時に `checked_in_at = None` で作成され、
/// 返却時に一度だけ `checked_in_at` が設定される。削除はされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub book_id: BookId,
    pub actor_id: ActorId,
    pub checked_out_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// 未返却（書籍が貸出中）か
    pub fn is_open(&self) -> bool {
        self.checked_in_at.is_none()
    }
}

/// (書籍, 利用者) の組に対する状態
///
/// 状態フィールドは持たず、台帳から導出する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReservationState {
    /// 未返却の予約がない
    Available,
    /// 未返却の予約がある
    CheckedOut(Reservation),
}

impl ReservationState {
    pub fn is_checked_out(&self) -> bool {
        matches!(self, ReservationState::CheckedOut(_))
    }
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの予約は返却できない（checked_in_at は上書きしない）
/// - 返却時刻は貸出時刻以降であること
///
/// 副作用なし。返却済みの新しいReservationを返す。
pub fn check_in(
    reservation: &Reservation,
    checked_in_at: DateTime<Utc>,
) -> Result<Reservation, CheckinError> {
    if !reservation.is_open() {
        return Err(CheckinError::AlreadyCheckedIn(reservation.id));
    }

    if checked_in_at < reservation.checked_out_at {
        return Err(CheckinError::CheckinPrecedesCheckout(reservation.id));
    }

    Ok(Reservation {
        checked_in_at: Some(checked_in_at),
        ..reservation.clone()
    })
}
