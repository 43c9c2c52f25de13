pub mod author_directory;
pub mod book_catalog;
pub mod reservation_repository;

// パブリックに型を再エクスポート
pub use author_directory::AuthorDirectory as PostgresAuthorDirectory;
pub use book_catalog::BookCatalog as PostgresBookCatalog;
pub use reservation_repository::ReservationRepository as PostgresReservationRepository;
