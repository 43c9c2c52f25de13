use crate::domain::BookId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 書籍ごとの書き込みロック表
///
/// 同一書籍に対する貸出・返却を1つずつ直列化する（シングルライター）。
/// 未返却予約の確認から追加までの間に別の呼び出しが割り込まないようにする。
/// プロセスをまたぐ競合はストレージ層の一意制約で検出する。
#[derive(Debug, Default)]
pub struct BookLocks {
    locks: Mutex<HashMap<BookId, Arc<AsyncMutex<()>>>>,
}

impl BookLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書籍のロックを取得する
    ///
    /// ガードが破棄されるまで同じ書籍に対する他の呼び出しは待機する。
    pub async fn lock(&self, book_id: BookId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // 誰も保持していないエントリを掃除する
            locks.retain(|id, lock| *id == book_id || Arc::strong_count(lock) > 1);
            locks.entry(book_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// 保持中のエントリ数
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
