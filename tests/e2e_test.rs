use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use rusty_library_checkout::adapters::mock::{
    ActorService, AuthorDirectory, BookCatalog, FixedClock, ReservationRepository,
};
use rusty_library_checkout::api::handlers::{ACTOR_HEADER, AppState};
use rusty_library_checkout::api::router::create_router;
use rusty_library_checkout::api::types::*;
use rusty_library_checkout::application::reservation::{
    AuthenticatedActorPolicy, BookLocks, ServiceDependencies,
};
use rusty_library_checkout::domain::value_objects::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーション
///
/// インメモリのアダプターと実際のAPIルーターを使用します。
/// モックはテスト側から操作できるように保持します。
struct TestApp {
    router: axum::Router,
    repository: Arc<ReservationRepository>,
    catalog: Arc<BookCatalog>,
    actors: Arc<ActorService>,
    clock: Arc<FixedClock>,
}

fn setup_e2e_app() -> TestApp {
    let repository = Arc::new(ReservationRepository::new());
    let catalog = Arc::new(BookCatalog::new());
    let actors = Arc::new(ActorService::new());
    let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(100, 0).unwrap()));

    let service_deps = ServiceDependencies {
        reservation_repository: repository.clone(),
        book_catalog: catalog.clone(),
        access_policy: Arc::new(AuthenticatedActorPolicy::new(actors.clone())),
        author_directory: Arc::new(AuthorDirectory::new()),
        clock: clock.clone(),
        book_locks: Arc::new(BookLocks::new()),
    };

    let app_state = Arc::new(AppState { service_deps });

    TestApp {
        router: create_router(app_state),
        repository,
        catalog,
        actors,
        clock,
    }
}

/// テスト用の利用者と本をセットアップ
fn setup_test_entities(app: &TestApp) -> (ActorId, BookId) {
    let actor_id = ActorId::new();
    let book_id = BookId::new();

    app.actors.authenticate(actor_id);
    app.catalog.add_book(book_id);

    (actor_id, book_id)
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: String,
    actor_id: Option<ActorId>,
) -> axum::response::Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(actor_id) = actor_id {
        request = request.header(ACTOR_HEADER, actor_id.value().to_string());
    }

    app.router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_reservation_flow() {
    let app = setup_e2e_app();
    let (actor_id, book_id) = setup_test_entities(&app);

    // Step 1: 貸出（POST /books/:book_id/checkout）
    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkout", book_id.value()),
        Some(actor_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let checked_out: ReservationResponse = read_json(response).await;
    assert_eq!(checked_out.reservation_id, 1);
    assert_eq!(checked_out.book_id, book_id.value());
    assert_eq!(checked_out.actor_id, actor_id.value());
    assert_eq!(checked_out.status, "open");
    assert!(checked_out.checked_in_at.is_none());

    // Step 2: 借りている本の一覧（GET /reservations/open）
    let response = send(&app, "GET", "/reservations/open".to_string(), Some(actor_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let open: Vec<ReservationResponse> = read_json(response).await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].reservation_id, 1);

    // Step 3: 返却（POST /books/:book_id/checkin）
    app.clock.set(Utc.timestamp_opt(150, 0).unwrap());
    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkin", book_id.value()),
        Some(actor_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let checked_in: ReservationResponse = read_json(response).await;
    assert_eq!(checked_in.reservation_id, 1);
    assert_eq!(checked_in.status, "closed");
    assert_eq!(
        checked_in.checked_in_at,
        Some(Utc.timestamp_opt(150, 0).unwrap())
    );

    // Step 4: 予約履歴（GET /books/:book_id/reservations）
    let response = send(
        &app,
        "GET",
        format!("/books/{}/reservations", book_id.value()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let ledger: LedgerResponse = read_json(response).await;
    assert_eq!(ledger.book_id, book_id.value());
    assert_eq!(ledger.current_holder, None);
    assert_eq!(ledger.reservations.len(), 1);
    assert_eq!(app.repository.row_count(), 1);
}

#[tokio::test]
async fn test_e2e_book_state_and_reservation_lookup() {
    let app = setup_e2e_app();
    let (actor_id, book_id) = setup_test_entities(&app);
    let state_uri = format!("/books/{}/state", book_id.value());

    // 借りる前は貸出中ではない
    let response = send(&app, "GET", state_uri.clone(), Some(actor_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let state: ReservationStateResponse = read_json(response).await;
    assert!(!state.checked_out);
    assert!(state.reservation.is_none());

    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkout", book_id.value()),
        Some(actor_id),
    )
    .await;
    let checked_out: ReservationResponse = read_json(response).await;

    let response = send(&app, "GET", state_uri, Some(actor_id)).await;
    let state: ReservationStateResponse = read_json(response).await;
    assert!(state.checked_out);
    assert_eq!(
        state.reservation.map(|r| r.reservation_id),
        Some(checked_out.reservation_id)
    );

    // 予約をIDで取得
    let response = send(
        &app,
        "GET",
        format!("/reservations/{}", checked_out.reservation_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let found: ReservationResponse = read_json(response).await;
    assert_eq!(found.book_id, book_id.value());
    assert_eq!(found.status, "open");

    let response = send(&app, "GET", "/reservations/999".to_string(), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "RESERVATION_NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_e2e_app();

    let response = send(&app, "GET", "/health".to_string(), None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_checkout_without_actor_header_is_unauthorized() {
    let app = setup_e2e_app();
    let (_, book_id) = setup_test_entities(&app);

    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkout", book_id.value()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "NOT_AUTHENTICATED");
    assert_eq!(app.repository.row_count(), 0);
}

#[tokio::test]
async fn test_e2e_malformed_actor_header_is_unauthorized() {
    let app = setup_e2e_app();
    let (_, book_id) = setup_test_entities(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/books/{}/checkout", book_id.value()))
                .header(ACTOR_HEADER, "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_e2e_checkout_unknown_book_is_not_found() {
    let app = setup_e2e_app();
    let (actor_id, _) = setup_test_entities(&app);

    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkout", BookId::new().value()),
        Some(actor_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "BOOK_NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_checkin_without_checkout_is_distinct_not_found() {
    let app = setup_e2e_app();
    let (actor_id, book_id) = setup_test_entities(&app);

    let response = send(
        &app,
        "POST",
        format!("/books/{}/checkin", book_id.value()),
        Some(actor_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "NOT_CHECKED_OUT");
    assert_eq!(app.repository.row_count(), 0);
}

#[tokio::test]
async fn test_e2e_double_checkout_is_conflict() {
    let app = setup_e2e_app();
    let (actor_id, book_id) = setup_test_entities(&app);
    let uri = format!("/books/{}/checkout", book_id.value());

    let response = send(&app, "POST", uri.clone(), Some(actor_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "POST", uri, Some(actor_id)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "ALREADY_CHECKED_OUT");
    assert_eq!(app.repository.row_count(), 1);
}

#[tokio::test]
async fn test_e2e_open_reservations_without_actor_is_unauthorized() {
    let app = setup_e2e_app();

    let response = send(&app, "GET", "/reservations/open".to_string(), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
