use crate::domain::value_objects::AuthorId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 著者ディレクトリポート
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    /// 著者名から著者IDを取得する（存在しなければ作成）
    ///
    /// 冪等：同じ名前で何度呼び出しても同じIDを返す。
    async fn find_or_create_by_name(&self, name: &str) -> Result<AuthorId>;
}
