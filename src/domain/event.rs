use chrono::{DateTime, Utc};
use crate::domain::model::{BookingId, Money, RoomId, StayPeriod};

/// ドメインイベント列挙型
/// 予約台帳で起きたビジネス上の重要なイベントを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// 予約が確定された
    BookingConfirmed(BookingConfirmed),
    /// 予約の支払いが完了した
    BookingPaid(BookingPaid),
    /// 予約がキャンセルされた
    BookingCancelled(BookingCancelled),
}

impl DomainEvent {
    /// イベント種別名を取得
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::BookingConfirmed(_) => "BookingConfirmed",
            DomainEvent::BookingPaid(_) => "BookingPaid",
            DomainEvent::BookingCancelled(_) => "BookingCancelled",
        }
    }

    /// イベント発生日時を取得
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::BookingConfirmed(e) => e.occurred_at,
            DomainEvent::BookingPaid(e) => e.occurred_at,
            DomainEvent::BookingCancelled(e) => e.occurred_at,
        }
    }

    /// 対象の予約IDを取得
    pub fn booking_id(&self) -> BookingId {
        match self {
            DomainEvent::BookingConfirmed(e) => e.booking_id,
            DomainEvent::BookingPaid(e) => e.booking_id,
            DomainEvent::BookingCancelled(e) => e.booking_id,
        }
    }
}

/// 予約確定イベント
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmed {
    /// 予約ID
    pub booking_id: BookingId,
    /// 客室ID
    pub room_id: RoomId,
    /// 宿泊期間
    pub period: StayPeriod,
    /// 合計金額
    pub total_price: Money,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl BookingConfirmed {
    /// 新しい予約確定イベントを作成
    pub fn new(booking_id: BookingId, room_id: RoomId, period: StayPeriod, total_price: Money) -> Self {
        Self {
            booking_id,
            room_id,
            period,
            total_price,
            occurred_at: Utc::now(),
        }
    }
}

/// 支払い完了イベント
#[derive(Debug, Clone, PartialEq)]
pub struct BookingPaid {
    /// 予約ID
    pub booking_id: BookingId,
    /// 支払い金額
    pub amount: Money,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl BookingPaid {
    /// 新しい支払い完了イベントを作成
    pub fn new(booking_id: BookingId, amount: Money) -> Self {
        Self {
            booking_id,
            amount,
            occurred_at: Utc::now(),
        }
    }
}

/// 予約キャンセルイベント
#[derive(Debug, Clone, PartialEq)]
pub struct BookingCancelled {
    /// 予約ID
    pub booking_id: BookingId,
    /// 空室に戻った客室ID
    pub room_id: RoomId,
    /// 解放された宿泊期間
    pub period: StayPeriod,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl BookingCancelled {
    /// 新しい予約キャンセルイベントを作成
    pub fn new(booking_id: BookingId, room_id: RoomId, period: StayPeriod) -> Self {
        Self {
            booking_id,
            room_id,
            period,
            occurred_at: Utc::now(),
        }
    }
}
