use crate::domain::value_objects::ActorId;
use crate::ports::actor_service::{ActorService as ActorServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mock implementation of ActorService
///
/// Tracks which actors currently hold a session.
#[derive(Debug)]
pub struct ActorService {
    authenticated: Mutex<HashSet<ActorId>>,
}

impl ActorService {
    pub fn new() -> Self {
        Self {
            authenticated: Mutex::new(HashSet::new()),
        }
    }

    /// Log an actor in for testing purposes
    pub fn authenticate(&self, actor_id: ActorId) {
        self.authenticated.lock().unwrap().insert(actor_id);
    }

    /// Log an actor out for testing purposes
    pub fn sign_out(&self, actor_id: ActorId) {
        self.authenticated.lock().unwrap().remove(&actor_id);
    }
}

impl Default for ActorService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorServiceTrait for ActorService {
    async fn is_authenticated(&self, actor_id: ActorId) -> Result<bool> {
        Ok(self.authenticated.lock().unwrap().contains(&actor_id))
    }
}
