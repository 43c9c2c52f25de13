use crate::domain::{ActorId, BookId, Reservation, ReservationId};
use crate::ports::reservation_repository::{
    RepositoryError, ReservationRepository as ReservationRepositoryTrait, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// In-memory implementation of ReservationRepository
///
/// Rows live in a Vec in insertion order, so a row's position is its id - 1.
/// Mirrors the PostgreSQL schema: ids start at 1 and only grow, and a second
/// open row for the same book is rejected like the partial unique index.
#[derive(Debug)]
pub struct ReservationRepository {
    rows: Mutex<Vec<Reservation>>,
}

impl ReservationRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Total number of rows, open or closed
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Snapshot of every row in id order
    pub fn all(&self) -> Vec<Reservation> {
        self.rows.lock().unwrap().clone()
    }
}

impl Default for ReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepositoryTrait for ReservationRepository {
    async fn append_checkout(
        &self,
        book_id: BookId,
        actor_id: ActorId,
        checked_out_at: DateTime<Utc>,
    ) -> Result<Reservation> {
        let mut rows = self.rows.lock().unwrap();

        if rows.iter().any(|r| r.book_id == book_id && r.is_open()) {
            return Err(RepositoryError::OpenReservationExists(book_id));
        }

        let reservation = Reservation {
            id: ReservationId::from_i64(rows.len() as i64 + 1),
            book_id,
            actor_id,
            checked_out_at,
            checked_in_at: None,
        };
        rows.push(reservation.clone());

        Ok(reservation)
    }

    async fn find_open_reservation(
        &self,
        book_id: BookId,
        actor_id: ActorId,
    ) -> Result<Option<Reservation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.book_id == book_id && r.actor_id == actor_id && r.is_open())
            .max_by_key(|r| r.id)
            .cloned())
    }

    async fn find_open_reservation_for_book(
        &self,
        book_id: BookId,
    ) -> Result<Option<Reservation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.book_id == book_id && r.is_open())
            .max_by_key(|r| r.id)
            .cloned())
    }

    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Reservation> {
        let mut rows = self.rows.lock().unwrap();

        let row = rows
            .iter_mut()
            .find(|r| r.id == reservation_id && r.is_open())
            .ok_or(RepositoryError::NotFound(reservation_id))?;
        row.checked_in_at = Some(checked_in_at);

        Ok(row.clone())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> Result<Option<Reservation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == reservation_id).cloned())
    }

    async fn ledger_for_book(&self, book_id: BookId) -> Result<Vec<Reservation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| r.book_id == book_id).cloned().collect())
    }

    async fn find_open_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.actor_id == actor_id && r.is_open())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let repo = ReservationRepository::new();

        let first = repo
            .append_checkout(BookId::new(), ActorId::new(), at(100))
            .await
            .unwrap();
        let second = repo
            .append_checkout(BookId::new(), ActorId::new(), at(50))
            .await
            .unwrap();

        assert_eq!(first.id.value(), 1);
        assert_eq!(second.id.value(), 2);
        assert!(first.is_open());
    }

    #[tokio::test]
    async fn test_append_rejects_second_open_row_for_book() {
        let repo = ReservationRepository::new();
        let book_id = BookId::new();

        repo.append_checkout(book_id, ActorId::new(), at(100))
            .await
            .unwrap();
        let result = repo.append_checkout(book_id, ActorId::new(), at(110)).await;

        assert!(matches!(
            result,
            Err(RepositoryError::OpenReservationExists(id)) if id == book_id
        ));
        assert_eq!(repo.row_count(), 1);
    }

    #[tokio::test]
    async fn test_close_twice_fails_second_time() {
        let repo = ReservationRepository::new();
        let reservation = repo
            .append_checkout(BookId::new(), ActorId::new(), at(100))
            .await
            .unwrap();

        let closed = repo.close_reservation(reservation.id, at(150)).await.unwrap();
        assert_eq!(closed.checked_in_at, Some(at(150)));

        let result = repo.close_reservation(reservation.id, at(200)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(id)) if id == reservation.id));

        // 最初の返却時刻は変わらない
        let stored = repo.find_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.checked_in_at, Some(at(150)));
    }

    #[tokio::test]
    async fn test_close_missing_row_is_not_found() {
        let repo = ReservationRepository::new();

        let result = repo
            .close_reservation(ReservationId::from_i64(99), at(100))
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_open_reservation_ignores_closed_rows() {
        let repo = ReservationRepository::new();
        let book_id = BookId::new();
        let actor_id = ActorId::new();

        let first = repo.append_checkout(book_id, actor_id, at(100)).await.unwrap();
        repo.close_reservation(first.id, at(150)).await.unwrap();
        assert!(
            repo.find_open_reservation(book_id, actor_id)
                .await
                .unwrap()
                .is_none()
        );

        let second = repo.append_checkout(book_id, actor_id, at(200)).await.unwrap();
        let open = repo
            .find_open_reservation(book_id, actor_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(open.id, second.id);
    }

    #[tokio::test]
    async fn test_ledger_and_open_by_actor() {
        let repo = ReservationRepository::new();
        let book_a = BookId::new();
        let book_b = BookId::new();
        let actor_id = ActorId::new();

        let a1 = repo.append_checkout(book_a, actor_id, at(100)).await.unwrap();
        repo.close_reservation(a1.id, at(110)).await.unwrap();
        repo.append_checkout(book_a, actor_id, at(120)).await.unwrap();
        repo.append_checkout(book_b, actor_id, at(130)).await.unwrap();

        let ledger = repo.ledger_for_book(book_a).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.windows(2).all(|w| w[0].id < w[1].id));

        let open = repo.find_open_by_actor(actor_id).await.unwrap();
        let ids: Vec<i64> = open.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
