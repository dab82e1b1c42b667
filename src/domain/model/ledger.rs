use crate::domain::error::DomainError;
use crate::domain::event::{BookingCancelled, DomainEvent};
use crate::domain::model::{Booking, BookingId, RoomId};

use std::collections::HashSet;

/// 予約台帳
/// 現在有効なすべての予約を所有する唯一の状態
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    domain_events: Vec<DomainEvent>,
}

impl BookingLedger {
    /// 空の台帳を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 永続化された予約から台帳を再構築
    /// 予約IDの重複、同一客室での期間の重なりはエラー
    pub fn from_bookings(bookings: Vec<Booking>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for (index, booking) in bookings.iter().enumerate() {
            if !seen.insert(booking.id()) {
                return Err(DomainError::InvalidValue(format!(
                    "予約IDが重複しています: {}",
                    booking.id()
                )));
            }
            let period = booking.period();
            if let Some(conflict) = bookings[..index]
                .iter()
                .find(|other| other.conflicts_with(booking.room_id(), &period))
            {
                return Err(DomainError::InvalidValue(format!(
                    "予約 {} と {} の宿泊期間が重複しています",
                    conflict.id(),
                    booking.id()
                )));
            }
        }

        Ok(Self {
            bookings,
            domain_events: Vec::new(),
        })
    }

    /// すべての予約を取得
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// 予約件数
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// 予約が1件もないか
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// 指定した客室の予約を取得
    pub fn bookings_for_room(&self, room_id: RoomId) -> impl Iterator<Item = &Booking> {
        self.bookings
            .iter()
            .filter(move |booking| booking.room_id() == room_id)
    }

    /// 予約IDで予約を検索
    pub fn get(&self, booking_id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id() == booking_id)
    }

    /// 予約IDで予約を検索（変更用）
    pub fn get_mut(&mut self, booking_id: BookingId) -> Option<&mut Booking> {
        self.bookings
            .iter_mut()
            .find(|booking| booking.id() == booking_id)
    }

    /// メールアドレスで予約を検索（大文字小文字を区別しない完全一致）
    pub fn find_by_email(&self, email: &str) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|booking| booking.guest().matches_email(email))
            .cloned()
            .collect()
    }

    /// 予約を追加
    /// 空室確認は呼び出し側（予約サービス）の責務
    pub fn append(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    /// 予約を削除
    /// 削除した予約を返す。存在しない場合はNone
    pub fn remove(&mut self, booking_id: BookingId) -> Option<Booking> {
        let index = self
            .bookings
            .iter()
            .position(|booking| booking.id() == booking_id)?;
        let removed = self.bookings.remove(index);

        self.domain_events
            .push(DomainEvent::BookingCancelled(BookingCancelled::new(
                removed.id(),
                removed.room_id(),
                removed.period(),
            )));

        Some(removed)
    }

    /// 台帳と各予約に溜まったドメインイベントを取得してクリア
    pub fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        let mut events: Vec<DomainEvent> = self
            .bookings
            .iter_mut()
            .flat_map(|booking| booking.take_domain_events())
            .collect();
        events.append(&mut self.domain_events);
        events
    }
}
