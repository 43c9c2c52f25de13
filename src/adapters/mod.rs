pub mod clock;
pub mod gateway;
pub mod mock;
pub mod postgres;

pub use clock::SystemClock;
pub use gateway::GatewayActorService;
