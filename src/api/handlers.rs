use crate::application::reservation::{
    ReservationApplicationError, ServiceDependencies, checkin as execute_checkin,
    checkout as execute_checkout, current_state, find_reservation, open_reservations_for_actor,
    reservation_history,
};
use crate::domain::{
    ActorId, BookId, ReservationId,
    commands::{CheckinBook, CheckoutBook},
};
use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{LedgerResponse, ReservationResponse, ReservationStateResponse},
};

/// 利用者IDを運ぶリクエストヘッダー
pub const ACTOR_HEADER: &str = "x-actor-id";

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Extractors
// ============================================================================

/// リクエストの利用者
///
/// `x-actor-id` ヘッダーから読み取る。ヘッダーがない、またはUUIDとして
/// 解釈できない場合は `None` となり、アクセスポリシーで拒否される。
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Option<ActorId>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor_id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(ActorId::from_uuid);

        Ok(CurrentActor(actor_id))
    }
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /books/:book_id/checkout - 書籍を借りる
///
/// 強制されるビジネスルール:
/// - 利用者が認証済みであること
/// - 書籍が存在すること
/// - 書籍が貸出中でないこと
pub async fn checkout_book(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor_id): CurrentActor,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let cmd = CheckoutBook {
        book_id: BookId::from_uuid(book_id),
        actor_id,
    };

    let reservation = execute_checkout(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// POST /books/:book_id/checkin - 書籍を返却する
///
/// 強制されるビジネスルール:
/// - 利用者が認証済みであること
/// - 書籍が存在すること
/// - この利用者が書籍を借りていること
pub async fn checkin_book(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor_id): CurrentActor,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let cmd = CheckinBook {
        book_id: BookId::from_uuid(book_id),
        actor_id,
    };

    let reservation = execute_checkin(&state.service_deps, cmd).await?;

    Ok((StatusCode::OK, Json(reservation.into())))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books/:book_id/reservations - 書籍の予約履歴
pub async fn list_book_reservations(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<LedgerResponse>, ApiError> {
    let ledger = reservation_history(&state.service_deps, BookId::from_uuid(book_id)).await?;

    Ok(Json(ledger.into()))
}

/// GET /reservations/open - 呼び出し元の利用者が借りている予約の一覧
pub async fn list_open_reservations(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor_id): CurrentActor,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let actor_id = actor_id.ok_or(ReservationApplicationError::NotAuthenticated)?;

    let reservations = open_reservations_for_actor(&state.service_deps, actor_id).await?;

    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// GET /books/:book_id/state - 呼び出し元の利用者がこの書籍を借りているか
pub async fn get_book_state(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor_id): CurrentActor,
    Path(book_id): Path<Uuid>,
) -> Result<Json<ReservationStateResponse>, ApiError> {
    let actor_id = actor_id.ok_or(ReservationApplicationError::NotAuthenticated)?;
    let book_id = BookId::from_uuid(book_id);

    let reservation_state = current_state(&state.service_deps, book_id, actor_id).await?;

    Ok(Json(ReservationStateResponse::new(book_id, reservation_state)))
}

/// GET /reservations/:reservation_id - 予約をIDで取得
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation =
        find_reservation(&state.service_deps, ReservationId::from_i64(reservation_id)).await?;

    Ok(Json(reservation.into()))
}
