//! VisitLog port - 「最近使ったもの」ログ
//!
//! スキャン送信時に記録されます。中身の使い方（ナビゲーションの履歴表示など）は
//! kiosk の外側の関心事です。

pub trait VisitLog: Send + Sync {
    fn record(&self, path: &str, label: &str);
}
