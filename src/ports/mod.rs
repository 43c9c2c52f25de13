pub mod access_policy;
pub mod actor_service;
pub mod author_directory;
pub mod book_catalog;
pub mod clock;
pub mod reservation_repository;

pub use access_policy::AccessPolicy;
pub use actor_service::ActorService;
pub use author_directory::AuthorDirectory;
pub use book_catalog::BookCatalog;
pub use clock::Clock;
pub use reservation_repository::{RepositoryError, ReservationRepository};
