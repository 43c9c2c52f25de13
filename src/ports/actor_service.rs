use crate::domain::value_objects::ActorId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者（会員・司書）認証ポート
///
/// セッションや資格情報は認証コンテキストが管理する。
/// 予約コンテキストは利用者が認証済みかどうかだけを問い合わせる。
#[async_trait]
pub trait ActorService: Send + Sync {
    async fn is_authenticated(&self, actor_id: ActorId) -> Result<bool>;
}
