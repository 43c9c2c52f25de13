use crate::domain::value_objects::{ActorId, BookId, Operation};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アクセスポリシーポート
///
/// どの利用者がどの書籍に対して操作できるかを判定する。
/// `actor_id` が `None`（未認証）の場合は常に `false` を返すこと。
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn can_act(
        &self,
        actor_id: Option<ActorId>,
        book_id: BookId,
        operation: Operation,
    ) -> Result<bool>;
}
