use chrono::{Days, NaiveDate};
use hotel_reservation::application::service::BookingApplicationService;
use hotel_reservation::application::ApplicationError;
use hotel_reservation::domain::model::{
    Booking, BookingId, BookingLedger, GuestContact, Money, Room, RoomCatalog, RoomId, StayPeriod,
};
use hotel_reservation::domain::port::{BookingRepository, Logger, RepositoryError};
use hotel_reservation::domain::service::{AvailabilityChecker, PricingService};
use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base_date().checked_add_days(Days::new(offset)).unwrap()
}

fn room_with_price(cents: i64) -> Room {
    Room::new(
        RoomId::new(),
        "101",
        "Standard",
        Money::new(Decimal::new(cents, 2)).unwrap(),
    )
}

struct NoopRepository;

#[async_trait]
impl BookingRepository for NoopRepository {
    async fn load_bookings(&self) -> Result<Vec<Booking>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn save_bookings(&self, _bookings: &[Booking]) -> Result<(), RepositoryError> {
        Ok(())
    }
}

struct SilentLogger;

impl Logger for SilentLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

fn service() -> BookingApplicationService {
    BookingApplicationService::new(
        RoomCatalog::new(RoomCatalog::default_rooms()).unwrap(),
        BookingLedger::new(),
        Arc::new(NoopRepository),
        Arc::new(SilentLogger),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// 宿泊期間のプロパティベーステスト
proptest! {
    /// 重なり判定は対称
    #[test]
    fn test_overlap_is_symmetric(
        s1 in 0u64..60, n1 in 1u64..15,
        s2 in 0u64..60, n2 in 1u64..15,
    ) {
        let a = StayPeriod::new(day(s1), day(s1 + n1)).unwrap();
        let b = StayPeriod::new(day(s2), day(s2 + n2)).unwrap();

        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// 重なるのは共通の宿泊日があるときだけ
    #[test]
    fn test_overlap_matches_shared_nights(
        s1 in 0u64..60, n1 in 1u64..15,
        s2 in 0u64..60, n2 in 1u64..15,
    ) {
        let a = StayPeriod::new(day(s1), day(s1 + n1)).unwrap();
        let b = StayPeriod::new(day(s2), day(s2 + n2)).unwrap();
        let shares_night = (s1..s1 + n1).any(|d| (s2..s2 + n2).contains(&d));

        prop_assert_eq!(a.overlaps(&b), shares_night);
    }

    /// 宿泊数はチェックイン日とチェックアウト日の差
    #[test]
    fn test_nights_equals_day_difference(start in 0u64..365, nights in 1u64..60) {
        let period = StayPeriod::new(day(start), day(start + nights)).unwrap();
        prop_assert_eq!(u64::from(period.nights()), nights);
    }

    /// チェックアウト日がチェックイン日以前なら作成できない
    #[test]
    fn test_non_positive_range_rejected(start in 0u64..365, back in 0u64..30) {
        let end = base_date()
            .checked_add_days(Days::new(start))
            .unwrap()
            .checked_sub_days(Days::new(back))
            .unwrap();
        prop_assert!(StayPeriod::new(day(start), end).is_err());
    }
}

// 料金計算のプロパティベーステスト
proptest! {
    /// 1泊増やすと料金は1泊分だけ増える
    #[test]
    fn test_price_is_linear_in_nights(
        cents in 1i64..10_000_000,
        start in 0u64..365,
        nights in 1u64..30,
    ) {
        let room = room_with_price(cents);
        let shorter = PricingService::price(&room, day(start), day(start + nights)).unwrap();
        let longer = PricingService::price(&room, day(start), day(start + nights + 1)).unwrap();

        prop_assert_eq!(longer.amount() - shorter.amount(), room.nightly_price().amount());
    }

    /// 料金は常に小数点以下2桁
    #[test]
    fn test_price_has_two_decimal_places(
        mills in 1i64..10_000_000,
        nights in 1u64..30,
    ) {
        // 小数点以下3桁の料金でも結果は2桁に丸められる
        let room = Room::new(
            RoomId::new(),
            "101",
            "Standard",
            Money::new(Decimal::new(mills, 3)).unwrap(),
        );
        let price = PricingService::price(&room, day(0), day(nights)).unwrap();

        prop_assert_eq!(price.amount().scale(), 2);
        prop_assert_eq!(price.round2(), price);
    }
}

// 空室確認のプロパティベーステスト
proptest! {
    /// 検索結果の客室はどれも既存の予約と重ならない
    #[test]
    fn test_search_results_never_overlap(
        stays in prop::collection::vec((0usize..5, 0u64..30, 1u64..7), 0..12),
        query_start in 0u64..30,
        query_nights in 1u64..7,
    ) {
        let rooms = RoomCatalog::default_rooms();
        let catalog = RoomCatalog::new(rooms.clone()).unwrap();
        let mut ledger = BookingLedger::new();
        for (room_index, start, nights) in stays {
            let period = StayPeriod::new(day(start), day(start + nights)).unwrap();
            let room = &rooms[room_index];
            let free = AvailabilityChecker::new(&catalog, &ledger).is_available_for(room.id(), &period);
            if free {
                ledger.append(Booking::confirm(
                    BookingId::new(),
                    room,
                    GuestContact::new("Guest", "guest@x.com").unwrap(),
                    period,
                ));
            }
        }

        let query = StayPeriod::new(day(query_start), day(query_start + query_nights)).unwrap();
        let available = AvailabilityChecker::new(&catalog, &ledger)
            .search_available(query.start(), query.end(), None)
            .unwrap();

        for room in &available {
            prop_assert!(ledger
                .bookings_for_room(room.id())
                .all(|b| !b.period().overlaps(&query)));
        }
        // 検索されなかった客室には重なる予約がある
        for room in catalog.all_rooms() {
            if !available.iter().any(|r| r.id() == room.id()) {
                prop_assert!(ledger
                    .bookings_for_room(room.id())
                    .any(|b| b.period().overlaps(&query)));
            }
        }
    }
}

// 予約サービスのプロパティベーステスト
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// 重ならない期間の予約はどちらも成功する
    #[test]
    fn test_disjoint_ranges_both_succeed(
        s1 in 0u64..30,
        n1 in 1u64..10,
        gap in 0u64..10,
        n2 in 1u64..10,
    ) {
        let service = service();
        let room_id = service.all_rooms()[0].id();
        let s2 = s1 + n1 + gap;

        let (first, second) = runtime().block_on(async {
            let first = service
                .create_booking(room_id, "Alice", "a@x.com", day(s1), day(s1 + n1))
                .await;
            let second = service
                .create_booking(room_id, "Bob", "b@x.com", day(s2), day(s2 + n2))
                .await;
            (first, second)
        });

        prop_assert!(first.is_ok());
        prop_assert!(second.is_ok());
    }

    /// 重なる期間の2件目は RoomUnavailable で失敗し、台帳は変わらない
    #[test]
    fn test_overlapping_second_booking_fails(
        s1 in 0u64..30,
        n1 in 1u64..10,
        offset in 0u64..10,
        n2 in 1u64..10,
    ) {
        // 2件目のチェックイン日は1件目の宿泊期間内
        let s2 = s1 + offset % n1;
        let service = service();
        let room_id = service.all_rooms()[0].id();

        let (second, count) = runtime().block_on(async {
            service
                .create_booking(room_id, "Alice", "a@x.com", day(s1), day(s1 + n1))
                .await
                .unwrap();
            let second = service
                .create_booking(room_id, "Bob", "b@x.com", day(s2), day(s2 + n2))
                .await;
            (second, service.all_bookings().await.len())
        });

        prop_assert!(matches!(second, Err(ApplicationError::RoomUnavailable { .. })), "expected RoomUnavailable, got {:?}", second);
        prop_assert_eq!(count, 1);
    }
}
