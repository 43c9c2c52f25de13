pub mod commands;
pub mod errors;
pub mod ledger;
pub mod reservation;
pub mod value_objects;

pub use errors::*;
pub use ledger::Ledger;
pub use reservation::*;
pub use value_objects::*;
