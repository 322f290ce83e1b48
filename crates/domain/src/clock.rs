//! # Clock（時刻プロバイダ）
//!
//! サービス層での `Utc::now()` 直接呼び出しを置き換え、
//! テストで固定時刻を注入可能にするための抽象化。
//!
//! メールテンプレートのフッター（著作権表記の年）とセッション有効期限の
//! 判定がこの trait を経由するため、レンダリングと認可判定は
//! 入力 + 注入時刻の純粋関数になる。

use chrono::{DateTime, Datelike, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;

   /// 現在の西暦年を返す（メールフッターの著作権表記用）
   fn current_year(&self) -> i32 {
      self.now().year()
   }
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
