// ドメインサービス
// 客室カタログと予約台帳にまたがる純粋な計算を実装

use crate::domain::error::DomainError;
use crate::domain::model::{BookingLedger, Money, Room, RoomCatalog, RoomId, StayPeriod};
use chrono::NaiveDate;

/// 料金サービス
/// 1泊料金 × 宿泊数を計算し、最後に一度だけ小数点以下2桁に丸める
pub struct PricingService;

impl PricingService {
    /// 宿泊期間の合計料金を計算する
    ///
    /// # Arguments
    /// * `room` - 対象の客室
    /// * `start` - チェックイン日
    /// * `end` - チェックアウト日（この日は宿泊に含まない）
    ///
    /// # Returns
    /// * `Ok(Money)` - 合計料金
    /// * `Err(DomainError::InvalidRange)` - 宿泊数が0以下
    pub fn price(room: &Room, start: NaiveDate, end: NaiveDate) -> Result<Money, DomainError> {
        let period = StayPeriod::new(start, end)?;
        Ok(Self::price_for_period(room, &period))
    }

    /// 検証済みの宿泊期間から合計料金を計算する
    pub fn price_for_period(room: &Room, period: &StayPeriod) -> Money {
        room.nightly_price().multiply(period.nights()).round2()
    }
}

/// 空室確認サービス
/// 台帳の予約を客室ごとに全件走査する
pub struct AvailabilityChecker<'a> {
    catalog: &'a RoomCatalog,
    ledger: &'a BookingLedger,
}

impl<'a> AvailabilityChecker<'a> {
    /// 新しい空室確認サービスを作成
    ///
    /// # Arguments
    /// * `catalog` - 客室カタログ
    /// * `ledger` - 予約台帳
    pub fn new(catalog: &'a RoomCatalog, ledger: &'a BookingLedger) -> Self {
        Self { catalog, ledger }
    }

    /// 客室が指定期間に空いているか判定する
    ///
    /// # Returns
    /// * `Ok(true)` - 重なる予約がない
    /// * `Ok(false)` - 重なる予約がある
    /// * `Err(DomainError::InvalidRange)` - チェックアウト日がチェックイン日以前
    pub fn is_available(
        &self,
        room_id: RoomId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, DomainError> {
        let period = StayPeriod::new(start, end)?;
        Ok(self.is_available_for(room_id, &period))
    }

    /// 検証済みの宿泊期間で空室判定する
    pub fn is_available_for(&self, room_id: RoomId, period: &StayPeriod) -> bool {
        !self
            .ledger
            .bookings_for_room(room_id)
            .any(|booking| booking.period().overlaps(period))
    }

    /// 指定期間に空いている客室をカタログ順で取得する
    /// カテゴリ指定は大文字小文字を区別しない。空文字は指定なしとして扱う
    ///
    /// # Arguments
    /// * `start` - チェックイン日
    /// * `end` - チェックアウト日
    /// * `category` - カテゴリ（任意）
    pub fn search_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<Room>, DomainError> {
        let period = StayPeriod::new(start, end)?;
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        Ok(self
            .catalog
            .all_rooms()
            .iter()
            .filter(|room| category.map_or(true, |c| room.is_in_category(c)))
            .filter(|room| self.is_available_for(room.id(), &period))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Booking, BookingId, GuestContact};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn book(ledger: &mut BookingLedger, room: &Room, start: &str, end: &str) {
        ledger.append(Booking::confirm(
            BookingId::new(),
            room,
            GuestContact::new("Guest", "g@x.com").unwrap(),
            StayPeriod::new(date(start), date(end)).unwrap(),
        ));
    }

    #[test]
    fn test_price_multiplies_nightly_rate() {
        let room = RoomCatalog::default_rooms().remove(0);
        let price = PricingService::price(&room, date("2024-01-01"), date("2024-01-03")).unwrap();
        assert_eq!(price.amount(), Decimal::from_str("3000.00").unwrap());
    }

    #[test]
    fn test_price_rounds_once_at_the_end() {
        // 33.335 × 3 = 100.005 → 100.01（1泊ごとに丸めると 33.34 × 3 = 100.02）
        let rate = Money::new(Decimal::from_str("33.335").unwrap()).unwrap();
        let room = Room::new(RoomId::new(), "999", "Odd", rate);
        let price = PricingService::price(&room, date("2024-01-01"), date("2024-01-04")).unwrap();
        assert_eq!(price.amount(), Decimal::from_str("100.01").unwrap());
    }

    #[test]
    fn test_price_invalid_range() {
        let room = RoomCatalog::default_rooms().remove(0);
        let result = PricingService::price(&room, date("2024-01-01"), date("2024-01-01"));
        assert_eq!(result, Err(DomainError::InvalidRange));
    }

    #[test]
    fn test_is_available() {
        let catalog = RoomCatalog::new(RoomCatalog::default_rooms()).unwrap();
        let room = catalog.all_rooms()[0].clone();
        let mut ledger = BookingLedger::new();
        book(&mut ledger, &room, "2024-01-01", "2024-01-03");

        let checker = AvailabilityChecker::new(&catalog, &ledger);
        assert!(!checker
            .is_available(room.id(), date("2024-01-02"), date("2024-01-04"))
            .unwrap());
        assert!(checker
            .is_available(room.id(), date("2024-01-03"), date("2024-01-05"))
            .unwrap());
        assert_eq!(
            checker.is_available(room.id(), date("2024-01-05"), date("2024-01-03")),
            Err(DomainError::InvalidRange)
        );
    }

    #[test]
    fn test_search_available_filters_booked_rooms() {
        let catalog = RoomCatalog::new(RoomCatalog::default_rooms()).unwrap();
        let booked = catalog.all_rooms()[0].clone();
        let mut ledger = BookingLedger::new();
        book(&mut ledger, &booked, "2024-01-01", "2024-01-05");

        let checker = AvailabilityChecker::new(&catalog, &ledger);
        let rooms = checker
            .search_available(date("2024-01-02"), date("2024-01-03"), None)
            .unwrap();

        assert_eq!(rooms.len(), 4);
        assert!(rooms.iter().all(|r| r.id() != booked.id()));
    }

    #[test]
    fn test_search_available_category_filter() {
        let catalog = RoomCatalog::new(RoomCatalog::default_rooms()).unwrap();
        let ledger = BookingLedger::new();
        let checker = AvailabilityChecker::new(&catalog, &ledger);

        let deluxe = checker
            .search_available(date("2024-01-01"), date("2024-01-02"), Some("deluxe"))
            .unwrap();
        assert_eq!(deluxe.len(), 2);
        assert!(deluxe.iter().all(|r| r.category() == "Deluxe"));

        let any = checker
            .search_available(date("2024-01-01"), date("2024-01-02"), Some("  "))
            .unwrap();
        assert_eq!(any.len(), 5);

        let none = checker
            .search_available(date("2024-01-01"), date("2024-01-02"), Some("Penthouse"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_available_invalid_range() {
        let catalog = RoomCatalog::new(RoomCatalog::default_rooms()).unwrap();
        let ledger = BookingLedger::new();
        let checker = AvailabilityChecker::new(&catalog, &ledger);

        let result = checker.search_available(date("2024-01-02"), date("2024-01-02"), None);
        assert_eq!(result, Err(DomainError::InvalidRange));
    }
}
