use crate::domain::event::{BookingConfirmed, BookingPaid, DomainEvent};
use crate::domain::model::{BookingId, BookingStatus, GuestContact, Money, Room, RoomId, StayPeriod};
use crate::domain::service::PricingService;
use chrono::{DateTime, Utc};

use std::fmt;

/// Booking集約
/// 1つの客室を [start, end) の期間確保する予約
#[derive(Debug, Clone)]
pub struct Booking {
    id: BookingId,
    room_id: RoomId,
    guest: GuestContact,
    period: StayPeriod,
    total_price: Money,
    paid: bool,
    created_at: DateTime<Utc>,
    domain_events: Vec<DomainEvent>,
}

impl Booking {
    /// 新しい予約を確定する
    /// 合計金額は客室の1泊料金と宿泊数から計算され、支払いフラグはfalse
    pub fn confirm(id: BookingId, room: &Room, guest: GuestContact, period: StayPeriod) -> Self {
        let total_price = PricingService::price_for_period(room, &period);
        let event = BookingConfirmed::new(id, room.id(), period, total_price);

        Self {
            id,
            room_id: room.id(),
            guest,
            period,
            total_price,
            paid: false,
            created_at: Utc::now(),
            domain_events: vec![DomainEvent::BookingConfirmed(event)],
        }
    }

    /// 永続化されたデータで予約を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: BookingId,
        room_id: RoomId,
        guest: GuestContact,
        period: StayPeriod,
        total_price: Money,
        paid: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id,
            guest,
            period,
            total_price,
            paid,
            created_at,
            domain_events: Vec::new(),
        }
    }

    /// 予約IDを取得
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// 客室IDを取得
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// 宿泊者を取得
    pub fn guest(&self) -> &GuestContact {
        &self.guest
    }

    /// 宿泊期間を取得
    pub fn period(&self) -> StayPeriod {
        self.period
    }

    /// 合計金額を取得
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// 支払い済みか
    pub fn is_paid(&self) -> bool {
        self.paid
    }

    /// 作成日時を取得
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 予約ステータスを取得
    pub fn status(&self) -> BookingStatus {
        if self.paid {
            BookingStatus::Paid
        } else {
            BookingStatus::Confirmed
        }
    }

    /// ドメインイベントを取得してクリア
    pub fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.domain_events)
    }

    /// 指定した客室・期間と重なるか
    pub fn conflicts_with(&self, room_id: RoomId, period: &StayPeriod) -> bool {
        self.room_id == room_id && self.period.overlaps(period)
    }

    /// 支払い済みにする
    /// 既に支払い済みの場合は何もせずfalseを返す
    pub fn mark_paid(&mut self) -> bool {
        if self.paid {
            return false;
        }
        self.paid = true;
        self.domain_events
            .push(DomainEvent::BookingPaid(BookingPaid::new(self.id, self.total_price)));
        true
    }
}

// 未発行のドメインイベントは同一性に含めない
impl PartialEq for Booking {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.room_id == other.room_id
            && self.guest == other.guest
            && self.period == other.period
            && self.total_price == other.total_price
            && self.paid == other.paid
            && self.created_at == other.created_at
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Booking[id={}, roomId={}, guest={}, email={}, {}, total={}, paid={}]",
            self.id,
            self.room_id,
            self.guest.name(),
            self.guest.email(),
            self.period,
            self.total_price,
            self.paid
        )
    }
}
