pub mod actor_service;
pub mod author_directory;
pub mod book_catalog;
pub mod clock;
pub mod reservation_repository;

pub use actor_service::ActorService;
pub use author_directory::AuthorDirectory;
pub use book_catalog::BookCatalog;
pub use clock::FixedClock;
pub use reservation_repository::ReservationRepository;
