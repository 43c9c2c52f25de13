use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍カタログポート
///
/// 予約コンテキストとカタログコンテキストの境界を維持する。
/// 予約コンテキストはBookIDのみを知り、書籍詳細は知らない。
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// 書籍が存在するか確認する
    async fn exists(&self, book_id: BookId) -> Result<bool>;
}
