//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::KioskEventId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator はキューイベントの ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（reconciler タスクと操作側の両方から共有される）
pub trait IdGenerator: Send + Sync {
    fn generate_event_id(&self) -> KioskEventId;
}

/// UlidGenerator は Clock の時刻と乱数から ULID を作る
///
/// FixedClock を渡すと timestamp 部分が決定的になります（乱数部分は毎回異なる）。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_event_id(&self) -> KioskEventId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        KioskEventId::from(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let ids: HashSet<_> = (0..1_000).map(|_| id_gen.generate_event_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn fixed_clock_pins_the_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_event_id();
        let id2 = id_gen.generate_event_id();

        // ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert_eq!(id2.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }
}
