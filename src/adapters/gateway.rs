use crate::domain::value_objects::ActorId;
use crate::ports::actor_service::{ActorService, Result};
use async_trait::async_trait;

/// ActorService for deployments behind an authenticating gateway
///
/// The gateway strips any client-supplied `x-actor-id` header and sets it
/// only after a successful sign-in, so every identity that reaches the
/// service is already authenticated. Requests without the header still
/// arrive as `None` and are rejected by the access policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayActorService;

#[async_trait]
impl ActorService for GatewayActorService {
    async fn is_authenticated(&self, _actor_id: ActorId) -> Result<bool> {
        Ok(true)
    }
}
