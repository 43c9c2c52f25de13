use serde::{Deserialize, Serialize};

use super::{ActorId, BookId};

/// コマンド：書籍を貸し出す
///
/// `actor_id` が `None` の場合は未認証の利用者を表す。
/// 時刻はコマンドに含めず、Clockポートから取得する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutBook {
    pub book_id: BookId,
    pub actor_id: Option<ActorId>,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinBook {
    pub book_id: BookId,
    pub actor_id: Option<ActorId>,
}
