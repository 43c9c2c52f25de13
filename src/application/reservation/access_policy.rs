use crate::domain::{ActorId, BookId, Operation};
use crate::ports::access_policy::{AccessPolicy, Result};
use crate::ports::ActorService;
use async_trait::async_trait;
use std::sync::Arc;

/// 認証済みの利用者のみ貸出・返却を許可するポリシー
///
/// ビジネスルール：
/// - 利用者が存在しない（未ログイン）場合は拒否
/// - ActorServiceで認証済みと確認できた場合のみ許可
/// - 書籍・操作の種類による区別はしない
pub struct AuthenticatedActorPolicy {
    actor_service: Arc<dyn ActorService>,
}

impl AuthenticatedActorPolicy {
    pub fn new(actor_service: Arc<dyn ActorService>) -> Self {
        Self { actor_service }
    }
}

#[async_trait]
impl AccessPolicy for AuthenticatedActorPolicy {
    async fn can_act(
        &self,
        actor_id: Option<ActorId>,
        _book_id: BookId,
        _operation: Operation,
    ) -> Result<bool> {
        match actor_id {
            Some(actor_id) => self.actor_service.is_authenticated(actor_id).await,
            None => Ok(false),
        }
    }
}
