use crate::domain::error::DomainError;
use crate::domain::model::{BookingId, RoomId, StayPeriod};
use crate::domain::port::RepositoryError;
use thiserror::Error;

/// アプリケーション層のエラー型
/// ドメインエラーや保存・決済の失敗をラップする
/// 起動時の初期化失敗以外はすべて呼び出し側で回復可能
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// ドメインエラー（無効な期間、無効な宿泊者情報など）
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),

    /// 客室が見つからない
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// 確定時点で指定期間に重なる予約がある
    #[error("Room {room_id} is not available for {period}")]
    RoomUnavailable { room_id: RoomId, period: StayPeriod },

    /// 予約が見つからない
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// メモリ上の台帳は更新済みだが永続化に失敗した
    #[error("Booking {booking_id} was updated in memory but could not be persisted: {source}")]
    Persistence {
        booking_id: BookingId,
        source: RepositoryError,
    },

    /// 決済が拒否された
    #[error("Payment declined: {message} (txn: {transaction_id})")]
    PaymentDeclined {
        transaction_id: String,
        message: String,
    },

    /// 起動時の保存データ初期化に失敗（回復不能）
    #[error("Storage initialization failed: {0}")]
    InitializationFailed(String),
}

impl ApplicationError {
    /// 無効な宿泊期間によるエラーか
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, ApplicationError::DomainError(DomainError::InvalidRange))
    }
}
