use crate::domain::error::DomainError;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 客室の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    /// 新しい一意のRoomIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 文字列からRoomIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s.trim())?;
        Ok(Self(uuid))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

/// 予約の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// 新しい一意のBookingIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 文字列からBookingIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s.trim())?;
        Ok(Self(uuid))
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

/// 金額を表す値オブジェクト
/// 負の値は持たない。永続化時は10進数の文字列として表現される
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// 10進数から作成
    /// 負の金額はエラー
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    /// 0円
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// 金額を取得
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// 金額を乗算（丸めは行わない）
    pub fn multiply(&self, factor: u32) -> Money {
        Money(self.0 * Decimal::from(factor))
    }

    /// 小数点以下2桁に四捨五入（0.5は切り上げ）
    pub fn round2(&self) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        Money(rounded)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round2().0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// 宿泊期間を表す値オブジェクト
/// チェックイン日を含み、チェックアウト日を含まない半開区間 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayPeriod {
    /// 新しい宿泊期間を作成
    /// チェックアウト日はチェックイン日より後である必要がある
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// チェックイン日を取得
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// チェックアウト日を取得
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 宿泊数を取得
    pub fn nights(&self) -> u32 {
        // 構築時に end > start が保証されている
        (self.end - self.start).num_days() as u32
    }

    /// 他の期間と1泊でも重なるか判定
    /// [a1, a2) と [b1, b2) は a1 < b2 かつ b1 < a2 のとき重なる
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for StayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// 宿泊者の連絡先を表す値オブジェクト
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuestContact {
    name: String,
    email: String,
}

impl GuestContact {
    /// 新しい連絡先を作成
    /// バリデーション:
    /// - 氏名、メールアドレスは空でない必要がある
    pub fn new(name: &str, email: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(DomainError::InvalidGuest(
                "宿泊者名は空にできません".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(DomainError::InvalidGuest(
                "メールアドレスは空にできません".to_string(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// 氏名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// メールアドレスを取得
    pub fn email(&self) -> &str {
        &self.email
    }

    /// メールアドレスが一致するか（大文字小文字を区別しない）
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

/// 予約のステータス
/// キャンセルされた予約は台帳から削除されるため状態を持たない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// 確定済み（未払い）
    Confirmed,
    /// 支払い済み
    Paid,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Paid => "Paid",
        };
        write!(f, "{}", status_str)
    }
}
