use crate::application::service::BookingApplicationService;
use crate::application::ApplicationError;
use crate::domain::model::{Booking, BookingId, RoomId};
use crate::domain::port::{Logger, PaymentGateway, PaymentResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

const COMPONENT: &str = "CheckoutService";

/// チェックアウト結果
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// 支払い済みの予約
    pub booking: Booking,
    /// 決済結果
    pub payment: PaymentResult,
}

/// チェックアウトサービス
/// 予約確定 → 請求 → 支払い済み登録 を1つの流れとして実行する
/// 決済が拒否された場合は確定した予約を取り消す
pub struct CheckoutService {
    booking_service: Arc<BookingApplicationService>,
    payment_gateway: Arc<dyn PaymentGateway>,
    logger: Arc<dyn Logger>,
}

impl CheckoutService {
    /// 新しいチェックアウトサービスを作成
    ///
    /// # Arguments
    /// * `booking_service` - 予約アプリケーションサービス
    /// * `payment_gateway` - 決済ゲートウェイ
    /// * `logger` - ロガー
    pub fn new(
        booking_service: Arc<BookingApplicationService>,
        payment_gateway: Arc<dyn PaymentGateway>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            booking_service,
            payment_gateway,
            logger,
        }
    }

    /// 予約して支払う
    ///
    /// # Returns
    /// * `Ok(CheckoutReceipt)` - 予約と支払いが完了した
    /// * `Err(ApplicationError::PaymentDeclined)` - 決済が拒否され、予約は取り消された
    /// * `Err(ApplicationError)` - 予約の作成または保存に失敗
    pub async fn checkout(
        &self,
        room_id: RoomId,
        guest_name: &str,
        guest_email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CheckoutReceipt, ApplicationError> {
        // 先に予約を確定して客室を押さえる
        let booking = match self
            .booking_service
            .create_booking(room_id, guest_name, guest_email, start, end)
            .await
        {
            Ok(booking) => booking,
            Err(ApplicationError::Persistence { booking_id, source }) => {
                // 請求前なので、保存できなかった予約は取り消して客室を空ける
                self.release(booking_id, "予約を保存できなかったため取り消します")
                    .await;
                return Err(ApplicationError::Persistence { booking_id, source });
            }
            Err(e) => return Err(e),
        };

        let payment = self.payment_gateway.charge(booking.total_price()).await;

        let mut context = HashMap::new();
        context.insert("booking_id".to_string(), booking.id().to_string());
        context.insert("transaction_id".to_string(), payment.transaction_id.clone());
        context.insert("amount".to_string(), payment.amount.to_string());

        if !payment.success {
            self.logger.warn(
                COMPONENT,
                &format!("決済が拒否されたため予約を取り消します: {}", payment.message),
                None,
                Some(context),
            );
            self.release(booking.id(), "決済拒否後の取り消し").await;
            return Err(ApplicationError::PaymentDeclined {
                transaction_id: payment.transaction_id,
                message: payment.message,
            });
        }

        let booking = self.booking_service.mark_paid(booking.id()).await?;
        self.logger
            .info(COMPONENT, "チェックアウトが完了しました", None, Some(context));

        Ok(CheckoutReceipt { booking, payment })
    }

    /// 補償として予約を取り消す
    /// 取り消しの保存に失敗しても台帳からは削除されているため、ログに残すだけにする
    async fn release(&self, booking_id: BookingId, reason: &str) {
        let mut context = HashMap::new();
        context.insert("booking_id".to_string(), booking_id.to_string());

        match self.booking_service.cancel_booking(booking_id).await {
            Ok(_) => self.logger.info(COMPONENT, reason, None, Some(context)),
            Err(e) => self.logger.error(
                COMPONENT,
                &format!("{}: 取り消しを保存できませんでした: {}", reason, e),
                None,
                Some(context),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BookingLedger, Money, RoomCatalog};
    use crate::domain::port::{BookingRepository, RepositoryError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    struct FlakyRepository {
        saved: std::sync::Mutex<Vec<Booking>>,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl BookingRepository for FlakyRepository {
        async fn load_bookings(&self) -> Result<Vec<Booking>, RepositoryError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save_bookings(&self, bookings: &[Booking]) -> Result<(), RepositoryError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(RepositoryError::WriteFailed("disk full".to_string()));
            }
            *self.saved.lock().unwrap() = bookings.to_vec();
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

    // 常に同じ結果を返す決済ゲートウェイ
    struct FixedGateway(bool);

    #[async_trait]
    impl PaymentGateway for FixedGateway {
        async fn charge(&self, amount: Money) -> PaymentResult {
            let message = if self.0 {
                "Payment successful"
            } else {
                "Payment failed (simulated)"
            };
            PaymentResult {
                success: self.0,
                transaction_id: "txn-1".to_string(),
                amount,
                message: message.to_string(),
            }
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 請求の時点で保存を失敗させる決済ゲートウェイ
    struct DecliningGatewayBreakingStorage(Arc<FlakyRepository>);

    #[async_trait]
    impl PaymentGateway for DecliningGatewayBreakingStorage {
        async fn charge(&self, amount: Money) -> PaymentResult {
            self.0.fail_saves.store(true, Ordering::SeqCst);
            PaymentResult {
                success: false,
                transaction_id: "txn-2".to_string(),
                amount,
                message: "Payment failed (simulated)".to_string(),
            }
        }
    }

    fn services_with(
        repository: Arc<FlakyRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> (Arc<BookingApplicationService>, CheckoutService) {
        let logger: Arc<dyn Logger> = Arc::new(SilentLogger);
        let booking_service = Arc::new(BookingApplicationService::new(
            RoomCatalog::new(RoomCatalog::default_rooms()).unwrap(),
            BookingLedger::new(),
            repository,
            logger.clone(),
        ));
        let checkout = CheckoutService::new(booking_service.clone(), gateway, logger);
        (booking_service, checkout)
    }

    fn checkout_service(approve: bool) -> (Arc<BookingApplicationService>, CheckoutService) {
        services_with(
            Arc::new(FlakyRepository::default()),
            Arc::new(FixedGateway(approve)),
        )
    }

    #[tokio::test]
    async fn test_checkout_marks_booking_paid() {
        let (booking_service, checkout) = checkout_service(true);
        let room_id = booking_service.all_rooms()[0].id();

        let receipt = checkout
            .checkout(room_id, "Alice", "a@x.com", date("2024-01-01"), date("2024-01-03"))
            .await
            .unwrap();

        assert!(receipt.booking.is_paid());
        assert_eq!(receipt.payment.amount, receipt.booking.total_price());
        let stored = booking_service.get_booking(receipt.booking.id()).await.unwrap();
        assert!(stored.is_paid());
    }

    #[tokio::test]
    async fn test_declined_payment_releases_room() {
        let (booking_service, checkout) = checkout_service(false);
        let room_id = booking_service.all_rooms()[0].id();

        let result = checkout
            .checkout(room_id, "Alice", "a@x.com", date("2024-01-01"), date("2024-01-03"))
            .await;

        assert!(matches!(result, Err(ApplicationError::PaymentDeclined { .. })));
        assert!(booking_service.all_bookings().await.is_empty());
        assert!(booking_service
            .is_available(room_id, date("2024-01-01"), date("2024-01-03"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_room_is_never_charged() {
        let (booking_service, checkout) = checkout_service(true);
        let room_id = booking_service.all_rooms()[0].id();
        booking_service
            .create_booking(room_id, "Bob", "b@x.com", date("2024-01-01"), date("2024-01-05"))
            .await
            .unwrap();

        let result = checkout
            .checkout(room_id, "Alice", "a@x.com", date("2024-01-02"), date("2024-01-03"))
            .await;

        assert!(matches!(result, Err(ApplicationError::RoomUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_unsaved_booking_is_released_before_charging() {
        let repository = Arc::new(FlakyRepository::default());
        let (booking_service, checkout) =
            services_with(repository.clone(), Arc::new(FixedGateway(true)));
        let rooms: Vec<RoomId> = booking_service.all_rooms().iter().map(|r| r.id()).collect();

        repository.fail_saves.store(true, Ordering::SeqCst);
        let result = checkout
            .checkout(rooms[0], "Alice", "a@x.com", date("2024-01-01"), date("2024-01-03"))
            .await;
        assert!(matches!(result, Err(ApplicationError::Persistence { .. })));
        assert!(booking_service.all_bookings().await.is_empty());

        // 次の保存に失敗した予約が紛れ込まない
        repository.fail_saves.store(false, Ordering::SeqCst);
        let other = booking_service
            .create_booking(rooms[1], "Bob", "b@x.com", date("2024-01-01"), date("2024-01-03"))
            .await
            .unwrap();
        let saved = repository.saved.lock().unwrap().clone();
        assert_eq!(saved, vec![other]);
        assert!(booking_service
            .is_available(rooms[0], date("2024-01-01"), date("2024-01-03"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_declined_payment_reported_when_release_cannot_be_saved() {
        let repository = Arc::new(FlakyRepository::default());
        let (booking_service, checkout) = services_with(
            repository.clone(),
            Arc::new(DecliningGatewayBreakingStorage(repository.clone())),
        );
        let room_id = booking_service.all_rooms()[0].id();

        let result = checkout
            .checkout(room_id, "Alice", "a@x.com", date("2024-01-01"), date("2024-01-03"))
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::PaymentDeclined { ref transaction_id, .. }) if transaction_id == "txn-2"
        ));
        assert!(booking_service.all_bookings().await.is_empty());
    }
}
