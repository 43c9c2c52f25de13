use crate::domain::{ActorId, BookId, Reservation, ReservationId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 予約リポジトリのエラー
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 対象の行が存在しない、または既に返却済み
    #[error("open reservation {0} not found")]
    NotFound(ReservationId),

    /// 書籍に未返却の予約が既に存在する（ストレージ層の一意制約違反）
    #[error("book {} already has an open reservation", .0.value())]
    OpenReservationExists(BookId),

    /// 接続障害などその他の永続化エラー
    #[error("reservation store failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Backend(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// 予約リポジトリポート
///
/// 追記専用の予約台帳を保存・取得する。
/// 行の意味は解釈せず、状態遷移の判断はアプリケーション層が行う。
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// 新しい予約行を追加する（checked_in_at = NULL）
    ///
    /// 未返却の予約が既にあるかどうかは確認しない。
    /// ストレージ層の一意制約に違反した場合は `OpenReservationExists` を返す。
    async fn append_checkout(
        &self,
        book_id: BookId,
        actor_id: ActorId,
        checked_out_at: DateTime<Utc>,
    ) -> Result<Reservation>;

    /// (書籍, 利用者) の未返却の予約を取得する
    ///
    /// 複数ある場合はIDが最大のものを返す。
    async fn find_open_reservation(
        &self,
        book_id: BookId,
        actor_id: ActorId,
    ) -> Result<Option<Reservation>>;

    /// 書籍の未返却の予約を利用者を問わず取得する
    async fn find_open_reservation_for_book(&self, book_id: BookId)
    -> Result<Option<Reservation>>;

    /// 予約を返却済みにする
    ///
    /// 行が存在しない、または既に返却済みの場合は `NotFound` を返す。
    /// 2回目の呼び出しが黙って成功することはない。
    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Reservation>;

    /// IDで予約を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> Result<Option<Reservation>>;

    /// 書籍の予約履歴をID昇順で取得する
    async fn ledger_for_book(&self, book_id: BookId) -> Result<Vec<Reservation>>;

    /// 利用者の未返却の予約をID降順で取得する
    async fn find_open_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>>;
}
