mod access_policy;
mod book_locks;
mod errors;
mod reservation_service;

pub use access_policy::AuthenticatedActorPolicy;
pub use book_locks::BookLocks;
pub use errors::{InvalidStateError, ReservationApplicationError, Result};
pub use reservation_service::{
    ServiceDependencies, checkin, checkout, current_state, find_or_create_author, find_reservation,
    open_reservations_for_actor, reservation_history,
};
