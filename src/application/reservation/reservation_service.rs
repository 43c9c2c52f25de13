use crate::domain::{
    self, ActorId, AuthorId, BookId, CheckinError, Ledger, Operation, Reservation,
    ReservationId, ReservationState, commands::*,
};
use crate::ports::*;
use std::sync::Arc;

use super::book_locks::BookLocks;
use super::errors::{InvalidStateError, ReservationApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub reservation_repository: Arc<dyn ReservationRepository>,
    pub book_catalog: Arc<dyn BookCatalog>,
    pub access_policy: Arc<dyn AccessPolicy>,
    pub author_directory: Arc<dyn AuthorDirectory>,
    pub clock: Arc<dyn Clock>,
    pub book_locks: Arc<BookLocks>,
}

/// アクセスポリシーで利用者を確認するヘルパー関数
///
/// checkout, checkinで共通利用される。
/// 許可された場合は認証済みの利用者IDを返す。
async fn authorize(
    deps: &ServiceDependencies,
    actor_id: Option<ActorId>,
    book_id: BookId,
    operation: Operation,
) -> Result<ActorId> {
    let allowed = deps
        .access_policy
        .can_act(actor_id, book_id, operation)
        .await
        .map_err(ReservationApplicationError::AccessPolicyError)?;

    match (allowed, actor_id) {
        (true, Some(actor_id)) => Ok(actor_id),
        _ => Err(ReservationApplicationError::NotAuthenticated),
    }
}

/// 書籍の存在を確認するヘルパー関数
async fn ensure_book_exists(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let exists = deps
        .book_catalog
        .exists(book_id)
        .await
        .map_err(ReservationApplicationError::BookCatalogError)?;

    if !exists {
        return Err(ReservationApplicationError::BookNotFound(book_id));
    }

    Ok(())
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 利用者がアクセスポリシーを満たすこと（未認証は NotAuthenticated）
/// - 書籍が存在すること（存在しなければ BookNotFound）
/// - 書籍に未返却の予約がないこと（あれば InvalidState::AlreadyCheckedOut）
///
/// 返却済みの後に再度貸し出すことは正当であり、新しい予約行が追加される。
/// 既存の行は変更しない。
///
/// # 一貫性保証
///
/// 同一書籍への呼び出しは書籍ごとのロックで直列化される。
/// プロセスをまたいだ競合はストレージの一意制約で検出され、
/// `Repository(OpenReservationExists)` として返る（内部で再試行はしない）。
///
/// # 戻り値
/// 作成された予約
pub async fn checkout(deps: &ServiceDependencies, cmd: CheckoutBook) -> Result<Reservation> {
    // 1. アクセスポリシー確認
    let actor_id = authorize(deps, cmd.actor_id, cmd.book_id, Operation::Checkout).await?;

    // 2. 書籍の存在確認
    ensure_book_exists(deps, cmd.book_id).await?;

    // 3. 書籍単位で直列化
    let _guard = deps.book_locks.lock(cmd.book_id).await;

    // 4. 未返却の予約がないことを確認
    if let Some(open) = deps
        .reservation_repository
        .find_open_reservation_for_book(cmd.book_id)
        .await?
    {
        return Err(InvalidStateError::AlreadyCheckedOut {
            book_id: cmd.book_id,
            reservation_id: open.id,
        }
        .into());
    }

    // 5. 新しい予約行を追加
    let now = deps.clock.now();
    let reservation = deps
        .reservation_repository
        .append_checkout(cmd.book_id, actor_id, now)
        .await?;

    Ok(reservation)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 利用者がアクセスポリシーを満たすこと
/// - 書籍が存在すること
/// - この利用者の未返却の予約があること（なければ InvalidState::NotCheckedOut）
///
/// 見つかった予約1件だけを返却済みにし、他の行には触れない。
///
/// # 戻り値
/// 返却済みになった予約
pub async fn checkin(deps: &ServiceDependencies, cmd: CheckinBook) -> Result<Reservation> {
    // 1. アクセスポリシー確認
    let actor_id = authorize(deps, cmd.actor_id, cmd.book_id, Operation::Checkin).await?;

    // 2. 書籍の存在確認
    ensure_book_exists(deps, cmd.book_id).await?;

    // 3. 書籍単位で直列化
    let _guard = deps.book_locks.lock(cmd.book_id).await;

    // 4. 未返却の予約を取得
    let open = deps
        .reservation_repository
        .find_open_reservation(cmd.book_id, actor_id)
        .await?
        .ok_or(InvalidStateError::NotCheckedOut {
            book_id: cmd.book_id,
            actor_id,
        })?;

    // 5. ドメイン層の純粋関数で遷移を検証
    let now = deps.clock.now();
    let closed = domain::check_in(&open, now).map_err(|e| match e {
        CheckinError::AlreadyCheckedIn(_) => InvalidStateError::NotCheckedOut {
            book_id: cmd.book_id,
            actor_id,
        },
        CheckinError::CheckinPrecedesCheckout(reservation_id) => {
            InvalidStateError::CheckinPrecedesCheckout { reservation_id }
        }
    })?;

    // 6. 行が未返却のままであることを条件に更新
    let reservation = deps
        .reservation_repository
        .close_reservation(open.id, now)
        .await?;

    debug_assert_eq!(reservation.checked_in_at, closed.checked_in_at);

    Ok(reservation)
}

/// 書籍の予約履歴を取得する
///
/// 「誰がいつこの書籍を借りていたか」に答える。
/// 台帳が不変条件を満たさない場合は `LedgerCorrupted` を返し、壊れた履歴は返さない。
pub async fn reservation_history(deps: &ServiceDependencies, book_id: BookId) -> Result<Ledger> {
    ensure_book_exists(deps, book_id).await?;

    let entries = deps
        .reservation_repository
        .ledger_for_book(book_id)
        .await?;

    let ledger = Ledger::new(book_id, entries);
    ledger
        .verify()
        .map_err(ReservationApplicationError::LedgerCorrupted)?;

    Ok(ledger)
}

/// IDで予約を取得する
pub async fn find_reservation(
    deps: &ServiceDependencies,
    reservation_id: ReservationId,
) -> Result<Reservation> {
    deps.reservation_repository
        .find_by_id(reservation_id)
        .await?
        .ok_or(ReservationApplicationError::ReservationNotFound(reservation_id))
}

/// (書籍, 利用者) の現在の状態を取得する
///
/// 状態は履歴から導出する。
pub async fn current_state(
    deps: &ServiceDependencies,
    book_id: BookId,
    actor_id: ActorId,
) -> Result<ReservationState> {
    let open = deps
        .reservation_repository
        .find_open_reservation(book_id, actor_id)
        .await?;

    Ok(match open {
        Some(reservation) => ReservationState::CheckedOut(reservation),
        None => ReservationState::Available,
    })
}

/// 利用者が現在借りている予約の一覧を取得する
pub async fn open_reservations_for_actor(
    deps: &ServiceDependencies,
    actor_id: ActorId,
) -> Result<Vec<Reservation>> {
    let reservations = deps
        .reservation_repository
        .find_open_by_actor(actor_id)
        .await?;

    Ok(reservations)
}

/// 著者名から著者IDを取得する（存在しなければ作成）
///
/// 同じ名前で何度呼び出しても同じIDを返す。
pub async fn find_or_create_author(deps: &ServiceDependencies, name: &str) -> Result<AuthorId> {
    deps.author_directory
        .find_or_create_by_name(name)
        .await
        .map_err(ReservationApplicationError::AuthorDirectoryError)
}
