use chrono::{DateTime, Utc};

/// 時計ポート
///
/// 予約の時刻は呼び出し側の時計から与えられ、エンジン内部では生成しない。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
