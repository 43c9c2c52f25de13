use crate::domain::{ActorId, BookId, Reservation, ReservationId};
use crate::ports::reservation_repository::{
    RepositoryError, ReservationRepository as ReservationRepositoryTrait, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Row, postgres::PgRow};

const RESERVATION_COLUMNS: &str = "id, book_id, actor_id, checked_out_at, checked_in_at";

/// PostgreSQLの行データをReservationに変換する
fn map_row_to_reservation(row: &PgRow) -> Result<Reservation> {
    Ok(Reservation {
        id: ReservationId::from_i64(row.try_get("id")?),
        book_id: BookId::from_uuid(row.try_get("book_id")?),
        actor_id: ActorId::from_uuid(row.try_get("actor_id")?),
        checked_out_at: row.try_get("checked_out_at")?,
        checked_in_at: row.try_get("checked_in_at")?,
    })
}

/// PostgreSQL implementation of ReservationRepository
///
/// Rows are only ever inserted or closed, never deleted. The partial unique
/// index `reservations_one_open_per_book` enforces at most one open row per
/// book even when two processes race past the application-level check.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new ReservationRepository with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(&self, sql: &str, bind: uuid::Uuid) -> Result<Vec<Reservation>> {
        sqlx::query(sql)
            .bind(bind)
            .fetch(&self.pool)
            .map(|row| -> Result<Reservation> { map_row_to_reservation(&row?) })
            .try_collect()
            .await
    }
}

#[async_trait]
impl ReservationRepositoryTrait for ReservationRepository {
    /// Insert a new open reservation row
    ///
    /// A unique violation on the open-row index is reported as
    /// `OpenReservationExists` so the caller can tell a lost race apart from
    /// a connectivity failure.
    async fn append_checkout(
        &self,
        book_id: BookId,
        actor_id: ActorId,
        checked_out_at: DateTime<Utc>,
    ) -> Result<Reservation> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO reservations (book_id, actor_id, checked_out_at)
            VALUES ($1, $2, $3)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(book_id.value())
        .bind(actor_id.value())
        .bind(checked_out_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::OpenReservationExists(book_id)
            }
            other => RepositoryError::from(other),
        })?;

        let reservation = map_row_to_reservation(&row)?;
        tracing::debug!(
            reservation_id = reservation.id.value(),
            book_id = %book_id.value(),
            "reservation appended"
        );

        Ok(reservation)
    }

    /// Highest-id open row for the (book, actor) pair
    ///
    /// Served by the (book_id, actor_id, checked_in_at) index.
    async fn find_open_reservation(
        &self,
        book_id: BookId,
        actor_id: ActorId,
    ) -> Result<Option<Reservation>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE book_id = $1 AND actor_id = $2 AND checked_in_at IS NULL
            ORDER BY id DESC
            LIMIT 1
            "#
        ))
        .bind(book_id.value())
        .bind(actor_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_reservation).transpose()
    }

    async fn find_open_reservation_for_book(
        &self,
        book_id: BookId,
    ) -> Result<Option<Reservation>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE book_id = $1 AND checked_in_at IS NULL
            ORDER BY id DESC
            LIMIT 1
            "#
        ))
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_reservation).transpose()
    }

    /// Close an open row
    ///
    /// The `checked_in_at IS NULL` guard makes the update conditional, so a
    /// second close of the same row matches nothing and yields `NotFound`.
    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Reservation> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE reservations
            SET checked_in_at = $2
            WHERE id = $1 AND checked_in_at IS NULL
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(reservation_id.value())
        .bind(checked_in_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(reservation_id))?;

        tracing::debug!(
            reservation_id = reservation_id.value(),
            "reservation closed"
        );

        map_row_to_reservation(&row)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> Result<Option<Reservation>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE id = $1
            "#
        ))
        .bind(reservation_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_reservation).transpose()
    }

    async fn ledger_for_book(&self, book_id: BookId) -> Result<Vec<Reservation>> {
        self.fetch_many(
            &format!(
                r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE book_id = $1
                ORDER BY id ASC
                "#
            ),
            book_id.value(),
        )
        .await
    }

    async fn find_open_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>> {
        self.fetch_many(
            &format!(
                r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE actor_id = $1 AND checked_in_at IS NULL
                ORDER BY id DESC
                "#
            ),
            actor_id.value(),
        )
        .await
    }
}
