use crate::application::ApplicationError;
use crate::domain::event::DomainEvent;
use crate::domain::model::{
    Booking, BookingId, BookingLedger, GuestContact, Money, Room, RoomCatalog, RoomId, StayPeriod,
};
use crate::domain::port::{BookingRepository, Logger, RepositoryError, RoomRepository};
use crate::domain::service::{AvailabilityChecker, PricingService};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

mod checkout_service;

pub use checkout_service::{CheckoutReceipt, CheckoutService};

const COMPONENT: &str = "BookingService";

/// 予約アプリケーションサービス
/// 台帳への変更はすべてこのサービスを経由し、重複予約がないことをここで保証する
pub struct BookingApplicationService {
    catalog: RoomCatalog,
    // 「重複確認 → 追加 → 永続化」を1つのロックの中で行う
    ledger: Mutex<BookingLedger>,
    booking_repository: Arc<dyn BookingRepository>,
    logger: Arc<dyn Logger>,
}

impl BookingApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `catalog` - 客室カタログ
    /// * `ledger` - 読み込み済みの予約台帳
    /// * `booking_repository` - 予約リポジトリ
    /// * `logger` - ロガー
    pub fn new(
        catalog: RoomCatalog,
        ledger: BookingLedger,
        booking_repository: Arc<dyn BookingRepository>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            catalog,
            ledger: Mutex::new(ledger),
            booking_repository,
            logger,
        }
    }

    /// 保存データからサービスを初期化する
    /// 客室データが存在しない、または読み込めない場合は初期の5室を投入してすぐに保存する
    ///
    /// # Returns
    /// * `Ok(Self)` - 初期化成功
    /// * `Err(ApplicationError::InitializationFailed)` - 初期客室の保存失敗、未対応の形式、予約データの破損など
    pub async fn initialize(
        room_repository: &dyn RoomRepository,
        booking_repository: Arc<dyn BookingRepository>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, ApplicationError> {
        let rooms = match room_repository.load_rooms().await {
            Ok(Some(rooms)) => rooms,
            Ok(None) => {
                logger.info(COMPONENT, "客室データがないため初期客室を投入します", None, None);
                Self::seed_rooms(room_repository).await?
            }
            // 新しい形式のファイルを上書きすると予約が客室を失うため、投入せずに中断する
            Err(e @ RepositoryError::Incompatible(_)) => {
                return Err(ApplicationError::InitializationFailed(format!(
                    "客室データの形式に対応していません: {}",
                    e
                )));
            }
            Err(e) => {
                logger.warn(
                    COMPONENT,
                    &format!("客室データを読み込めないため初期客室を投入します: {}", e),
                    None,
                    None,
                );
                Self::seed_rooms(room_repository).await?
            }
        };

        let catalog = RoomCatalog::new(rooms)
            .map_err(|e| ApplicationError::InitializationFailed(format!("客室カタログ: {}", e)))?;

        let bookings = booking_repository.load_bookings().await.map_err(|e| {
            ApplicationError::InitializationFailed(format!("予約データの読み込みに失敗: {}", e))
        })?;
        let ledger = BookingLedger::from_bookings(bookings)
            .map_err(|e| ApplicationError::InitializationFailed(format!("予約台帳: {}", e)))?;

        for booking in ledger.bookings() {
            if catalog.get_room(booking.room_id()).is_none() {
                logger.warn(
                    COMPONENT,
                    "カタログに存在しない客室の予約があります",
                    None,
                    Some(context(&[
                        ("booking_id", booking.id().to_string()),
                        ("room_id", booking.room_id().to_string()),
                    ])),
                );
            }
        }

        logger.info(
            COMPONENT,
            "予約サービスを初期化しました",
            None,
            Some(context(&[
                ("rooms", catalog.all_rooms().len().to_string()),
                ("bookings", ledger.len().to_string()),
            ])),
        );

        Ok(Self::new(catalog, ledger, booking_repository, logger))
    }

    /// 初期客室を作成して保存する
    async fn seed_rooms(room_repository: &dyn RoomRepository) -> Result<Vec<Room>, ApplicationError> {
        let rooms = RoomCatalog::default_rooms();
        room_repository.save_rooms(&rooms).await.map_err(|e| {
            ApplicationError::InitializationFailed(format!("初期客室の保存に失敗: {}", e))
        })?;
        Ok(rooms)
    }

    /// 重複を除いたカテゴリ名を昇順で取得
    pub fn list_categories(&self) -> Vec<String> {
        self.catalog.list_categories()
    }

    /// すべての客室を取得
    pub fn all_rooms(&self) -> &[Room] {
        self.catalog.all_rooms()
    }

    /// 客室IDで客室を取得
    ///
    /// # Returns
    /// * `Ok(&Room)` - 客室が見つかった
    /// * `Err(ApplicationError::RoomNotFound)` - 客室が存在しない
    pub fn get_room(&self, room_id: RoomId) -> Result<&Room, ApplicationError> {
        self.catalog
            .get_room(room_id)
            .ok_or(ApplicationError::RoomNotFound(room_id))
    }

    /// 客室が指定期間に空いているか判定
    pub async fn is_available(
        &self,
        room_id: RoomId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, ApplicationError> {
        self.get_room(room_id)?;
        let ledger = self.ledger.lock().await;
        let checker = AvailabilityChecker::new(&self.catalog, &ledger);
        Ok(checker.is_available(room_id, start, end)?)
    }

    /// 指定期間に空いている客室を検索
    ///
    /// # Arguments
    /// * `start` - チェックイン日
    /// * `end` - チェックアウト日
    /// * `category` - カテゴリ（任意、大文字小文字を区別しない）
    pub async fn search_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<Room>, ApplicationError> {
        let ledger = self.ledger.lock().await;
        let checker = AvailabilityChecker::new(&self.catalog, &ledger);
        Ok(checker.search_available(start, end, category)?)
    }

    /// 支払い前に表示する見積もり金額を計算
    pub fn quote(
        &self,
        room_id: RoomId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Money, ApplicationError> {
        let room = self.get_room(room_id)?;
        Ok(PricingService::price(room, start, end)?)
    }

    /// 予約を作成する
    /// 空室確認は検索時ではなく確定時にロックを保持したまま再度行う
    ///
    /// # Arguments
    /// * `room_id` - 客室ID
    /// * `guest_name` - 宿泊者名
    /// * `guest_email` - 宿泊者のメールアドレス
    /// * `start` - チェックイン日
    /// * `end` - チェックアウト日（この日は宿泊に含まない）
    ///
    /// # Returns
    /// * `Ok(Booking)` - 作成された予約（未払い）
    /// * `Err(ApplicationError::RoomNotFound)` - 客室が存在しない
    /// * `Err(ApplicationError::RoomUnavailable)` - 期間が既存の予約と重なる
    /// * `Err(ApplicationError::Persistence)` - 台帳には追加済みだが保存に失敗
    pub async fn create_booking(
        &self,
        room_id: RoomId,
        guest_name: &str,
        guest_email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Booking, ApplicationError> {
        let room = self.get_room(room_id)?;
        let period = StayPeriod::new(start, end)?;
        let guest = GuestContact::new(guest_name, guest_email)?;

        let mut ledger = self.ledger.lock().await;

        if !AvailabilityChecker::new(&self.catalog, &ledger).is_available_for(room_id, &period) {
            self.logger.debug(
                COMPONENT,
                "確定時の空室確認で重複が見つかりました",
                None,
                Some(context(&[
                    ("room_id", room_id.to_string()),
                    ("period", period.to_string()),
                ])),
            );
            return Err(ApplicationError::RoomUnavailable { room_id, period });
        }

        let booking = Booking::confirm(BookingId::new(), room, guest, period);
        let booking_id = booking.id();
        ledger.append(booking);

        self.persist(&mut ledger, booking_id).await?;
        // イベントは persist で取り出し済み
        ledger
            .get(booking_id)
            .cloned()
            .ok_or(ApplicationError::BookingNotFound(booking_id))
    }

    /// 予約をキャンセルする（物理削除）
    /// 存在しない予約IDは何もせずfalseを返す
    ///
    /// # Returns
    /// * `Ok(true)` - 削除して保存した
    /// * `Ok(false)` - 予約が存在しなかった
    /// * `Err(ApplicationError::Persistence)` - 台帳からは削除済みだが保存に失敗
    pub async fn cancel_booking(&self, booking_id: BookingId) -> Result<bool, ApplicationError> {
        let mut ledger = self.ledger.lock().await;

        if ledger.remove(booking_id).is_none() {
            return Ok(false);
        }

        self.persist(&mut ledger, booking_id).await?;
        Ok(true)
    }

    /// 予約を支払い済みにする
    /// 既に支払い済みでも台帳を保存し直すため、保存失敗後の再試行に使える
    ///
    /// # Returns
    /// * `Ok(Booking)` - 支払い済みの予約
    /// * `Err(ApplicationError::BookingNotFound)` - 予約が存在しない
    /// * `Err(ApplicationError::Persistence)` - フラグは更新済みだが保存に失敗
    pub async fn mark_paid(&self, booking_id: BookingId) -> Result<Booking, ApplicationError> {
        let mut ledger = self.ledger.lock().await;

        ledger
            .get_mut(booking_id)
            .ok_or(ApplicationError::BookingNotFound(booking_id))?
            .mark_paid();

        self.persist(&mut ledger, booking_id).await?;
        ledger
            .get(booking_id)
            .cloned()
            .ok_or(ApplicationError::BookingNotFound(booking_id))
    }

    /// メールアドレスで予約を検索（大文字小文字を区別しない完全一致）
    pub async fn find_bookings_by_email(&self, email: &str) -> Vec<Booking> {
        self.ledger.lock().await.find_by_email(email)
    }

    /// 予約IDで予約を取得
    pub async fn get_booking(&self, booking_id: BookingId) -> Option<Booking> {
        self.ledger.lock().await.get(booking_id).cloned()
    }

    /// 台帳の全予約を取得
    pub async fn all_bookings(&self) -> Vec<Booking> {
        self.ledger.lock().await.bookings().to_vec()
    }

    /// 台帳全体を保存し、溜まったドメインイベントをログに出力する
    /// 保存に失敗してもメモリ上の変更は巻き戻さない
    async fn persist(
        &self,
        ledger: &mut BookingLedger,
        booking_id: BookingId,
    ) -> Result<(), ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let saved = self.booking_repository.save_bookings(ledger.bookings()).await;

        for event in ledger.take_domain_events() {
            self.log_event(&event, correlation_id);
        }

        saved.map_err(|source| {
            self.logger.error(
                COMPONENT,
                &format!("予約台帳の保存に失敗しました: {}", source),
                Some(correlation_id),
                Some(context(&[
                    ("booking_id", booking_id.to_string()),
                    ("bookings", ledger.len().to_string()),
                ])),
            );
            ApplicationError::Persistence { booking_id, source }
        })
    }

    fn log_event(&self, event: &DomainEvent, correlation_id: Uuid) {
        let mut fields = vec![
            ("event_type", event.event_type().to_string()),
            ("booking_id", event.booking_id().to_string()),
            ("occurred_at", event.occurred_at().to_rfc3339()),
        ];
        match event {
            DomainEvent::BookingConfirmed(e) => {
                fields.push(("room_id", e.room_id.to_string()));
                fields.push(("period", e.period.to_string()));
                fields.push(("total_price", e.total_price.to_string()));
            }
            DomainEvent::BookingPaid(e) => {
                fields.push(("amount", e.amount.to_string()));
            }
            DomainEvent::BookingCancelled(e) => {
                fields.push(("room_id", e.room_id.to_string()));
                fields.push(("period", e.period.to_string()));
            }
        }

        self.logger.info(
            COMPONENT,
            &format!("Event recorded: {}", event.event_type()),
            Some(correlation_id),
            Some(context(&fields)),
        );
    }
}

/// ログ用の追加コンテキストを作成
fn context(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
