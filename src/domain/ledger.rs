use serde::Serialize;

use super::{BookId, LedgerViolation, Reservation};

/// 予約台帳 - 1冊の書籍の予約履歴（ID昇順）
///
/// 「誰がいつこの書籍を借りていたか」に答えるための読み取り専用ビュー。
/// 現在の状態は常にこの履歴から導出し、キャッシュしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ledger {
    book_id: BookId,
    entries: Vec<Reservation>,
}

impl Ledger {
    pub fn new(book_id: BookId, mut entries: Vec<Reservation>) -> Self {
        entries.sort_by_key(|r| r.id);
        Self { book_id, entries }
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn entries(&self) -> &[Reservation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Reservation> {
        self.entries
    }

    /// 書籍の未返却の予約（複数ある場合はIDが最大のもの）
    pub fn open_reservation(&self) -> Option<&Reservation> {
        self.entries
            .iter()
            .filter(|r| r.is_open())
            .max_by_key(|r| r.id)
    }

    /// 台帳の不変条件を検証する
    ///
    /// - 未返却の予約は書籍ごとに高々1件
    /// - checked_out_at <= checked_in_at
    /// - すべての行がこの書籍のもの
    pub fn verify(&self) -> Result<(), LedgerViolation> {
        for entry in &self.entries {
            if entry.book_id != self.book_id {
                return Err(LedgerViolation::ForeignBook(entry.id));
            }
            if let Some(checked_in_at) = entry.checked_in_at {
                if checked_in_at < entry.checked_out_at {
                    return Err(LedgerViolation::CheckinBeforeCheckout(entry.id));
                }
            }
        }

        let open = self.entries.iter().filter(|r| r.is_open()).count();
        if open > 1 {
            return Err(LedgerViolation::MultipleOpenReservations {
                book_id: self.book_id,
                count: open,
            });
        }

        Ok(())
    }
}
