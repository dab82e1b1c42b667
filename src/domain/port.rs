// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{Booking, Money, Room};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
/// 重要度の低い順に並ぶ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// 文字列からLogLevelを作成（大文字小文字を区別しない）
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// 読み込みに失敗
    ReadFailed(String),
    /// 書き込みに失敗
    WriteFailed(String),
    /// 保存データが壊れている、または解釈できない
    Corrupted(String),
    /// 保存データは読めるが、このバージョンでは扱えない形式
    Incompatible(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ReadFailed(msg) => write!(f, "Read failed: {}", msg),
            RepositoryError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
            RepositoryError::Corrupted(msg) => write!(f, "Corrupted data: {}", msg),
            RepositoryError::Incompatible(msg) => write!(f, "Incompatible data: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 客室リポジトリトレイト
/// 客室カタログの永続化を抽象化する
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// すべての客室を読み込む
    ///
    /// # Returns
    /// * `Ok(Some(Vec<Room>))` - 保存済みの客室
    /// * `Ok(None)` - 保存データが存在しない
    /// * `Err(RepositoryError)` - 読み込み失敗、データ破損、または未対応のスキーマバージョン
    async fn load_rooms(&self) -> Result<Option<Vec<Room>>, RepositoryError>;

    /// すべての客室を保存する（全件置き換え）
    async fn save_rooms(&self, rooms: &[Room]) -> Result<(), RepositoryError>;
}

/// 予約リポジトリトレイト
/// 予約台帳の永続化を抽象化する
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// すべての予約を読み込む
    /// 保存データが存在しない場合は空のリストを返す
    ///
    /// # Returns
    /// * `Ok(Vec<Booking>)` - 予約のリスト
    /// * `Err(RepositoryError)` - 読み込み失敗またはデータ破損
    async fn load_bookings(&self) -> Result<Vec<Booking>, RepositoryError>;

    /// 台帳全体を保存する（全件置き換え）
    ///
    /// # Arguments
    /// * `bookings` - 台帳に含まれるすべての予約
    async fn save_bookings(&self, bookings: &[Booking]) -> Result<(), RepositoryError>;
}

/// 決済結果
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    /// 決済が成功したか
    pub success: bool,
    /// 取引ID
    pub transaction_id: String,
    /// 請求金額
    pub amount: Money,
    /// 表示用メッセージ
    pub message: String,
}

/// 決済ゲートウェイトレイト
/// 請求処理を抽象化するポート
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 指定金額を請求する
    /// 失敗はエラーではなく `success == false` の結果として返す
    async fn charge(&self, amount: Money) -> PaymentResult;
}
