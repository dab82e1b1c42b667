use crate::domain::error::DomainError;
use crate::domain::model::{Booking, BookingId, GuestContact, Money, Room, RoomId, StayPeriod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 現在のスキーマバージョン
pub const SCHEMA_VERSION: u32 = 1;

/// シリアライゼーションエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SerializationError {
    #[error("JSON serialization failed: {message}. Document type: {document_type}")]
    JsonSerializationFailed {
        message: String,
        document_type: String,
    },

    #[error("JSON deserialization failed: {message}. Expected type: {expected_type}, Input: {input_preview}")]
    JsonDeserializationFailed {
        message: String,
        expected_type: String,
        input_preview: String,
    },

    #[error("Schema version incompatibility: Expected version {expected}, found {actual}. Document type: {document_type}")]
    SchemaVersionIncompatible {
        expected: u32,
        actual: u32,
        document_type: String,
    },

    #[error("Missing required field: {field_name} in document type {document_type}")]
    MissingRequiredField {
        field_name: String,
        document_type: String,
    },

    #[error("Invalid record: {reason} in document type {document_type}")]
    InvalidRecord {
        reason: String,
        document_type: String,
    },
}

impl SerializationError {
    /// 入力データのプレビューを生成（デバッグ用、最大100文字）
    fn create_input_preview(input: &str) -> String {
        if input.chars().count() <= 100 {
            input.to_string()
        } else {
            format!("{}...", input.chars().take(97).collect::<String>())
        }
    }

    /// JSONデシリアライゼーションエラーを作成
    pub fn json_deserialization_failed(message: String, expected_type: &str, input: &str) -> Self {
        Self::JsonDeserializationFailed {
            message,
            expected_type: expected_type.to_string(),
            input_preview: Self::create_input_preview(input),
        }
    }
}

/// 保存ファイル上の予約レコード
/// フィールド順がそのままファイル上の順序になる
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub room_id: RoomId,
    pub guest_name: String,
    pub guest_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Money,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// ドメインオブジェクトからレコードを作成
    pub fn from_booking(booking: &Booking) -> Self {
        let period = booking.period();
        Self {
            id: booking.id(),
            room_id: booking.room_id(),
            guest_name: booking.guest().name().to_string(),
            guest_email: booking.guest().email().to_string(),
            start_date: period.start(),
            end_date: period.end(),
            total_price: booking.total_price(),
            paid: booking.is_paid(),
            created_at: booking.created_at(),
        }
    }

    /// レコードから予約を再構築
    /// 宿泊期間と宿泊者情報はドメインのバリデーションを通す
    pub fn into_booking(self) -> Result<Booking, DomainError> {
        let guest = GuestContact::new(&self.guest_name, &self.guest_email)?;
        let period = StayPeriod::new(self.start_date, self.end_date)?;
        Ok(Booking::reconstruct(
            self.id,
            self.room_id,
            guest,
            period,
            self.total_price,
            self.paid,
            self.created_at,
        ))
    }
}

#[derive(Serialize)]
struct RoomsDocumentRef<'a> {
    schema_version: u32,
    rooms: &'a [Room],
}

#[derive(Deserialize)]
struct RoomsDocument {
    rooms: Vec<Room>,
}

#[derive(Serialize)]
struct BookingsDocumentRef {
    schema_version: u32,
    bookings: Vec<BookingRecord>,
}

#[derive(Deserialize)]
struct BookingsDocument {
    bookings: Vec<BookingRecord>,
}

/// スナップショットシリアライザー
/// 客室カタログと予約台帳をバージョン付きJSON文書に変換する
pub struct SnapshotSerializer {
    /// サポートするスキーマバージョンの範囲
    supported_versions: std::ops::RangeInclusive<u32>,
}

impl SnapshotSerializer {
    /// 新しいシリアライザーを作成
    pub fn new() -> Self {
        Self {
            supported_versions: 1..=SCHEMA_VERSION, // 現在はバージョン1のみサポート
        }
    }

    /// 客室のリストをJSONにシリアライズ
    pub fn serialize_rooms(&self, rooms: &[Room]) -> Result<String, SerializationError> {
        let document = RoomsDocumentRef {
            schema_version: SCHEMA_VERSION,
            rooms,
        };
        serde_json::to_string_pretty(&document).map_err(|e| {
            SerializationError::JsonSerializationFailed {
                message: e.to_string(),
                document_type: "rooms".to_string(),
            }
        })
    }

    /// JSONから客室のリストにデシリアライズ
    pub fn deserialize_rooms(&self, json: &str) -> Result<Vec<Room>, SerializationError> {
        let value = self.parse_versioned(json, "rooms")?;
        let document: RoomsDocument = serde_json::from_value(value).map_err(|e| {
            SerializationError::json_deserialization_failed(e.to_string(), "RoomsDocument", json)
        })?;
        Ok(document.rooms)
    }

    /// 予約のリストをJSONにシリアライズ
    pub fn serialize_bookings(&self, bookings: &[Booking]) -> Result<String, SerializationError> {
        let document = BookingsDocumentRef {
            schema_version: SCHEMA_VERSION,
            bookings: bookings.iter().map(BookingRecord::from_booking).collect(),
        };
        serde_json::to_string_pretty(&document).map_err(|e| {
            SerializationError::JsonSerializationFailed {
                message: e.to_string(),
                document_type: "bookings".to_string(),
            }
        })
    }

    /// JSONから予約のリストにデシリアライズ
    pub fn deserialize_bookings(&self, json: &str) -> Result<Vec<Booking>, SerializationError> {
        let value = self.parse_versioned(json, "bookings")?;
        let document: BookingsDocument = serde_json::from_value(value).map_err(|e| {
            SerializationError::json_deserialization_failed(
                e.to_string(),
                "BookingsDocument",
                json,
            )
        })?;

        document
            .bookings
            .into_iter()
            .map(|record| {
                let id = record.id;
                record
                    .into_booking()
                    .map_err(|e| SerializationError::InvalidRecord {
                        reason: format!("booking {}: {}", id, e),
                        document_type: "bookings".to_string(),
                    })
            })
            .collect()
    }

    /// JSONの構文とスキーマバージョンを検証する
    fn parse_versioned(
        &self,
        json: &str,
        document_type: &str,
    ) -> Result<serde_json::Value, SerializationError> {
        // 入力の基本検証
        if json.trim().is_empty() {
            return Err(SerializationError::JsonDeserializationFailed {
                message: "Empty JSON input".to_string(),
                expected_type: document_type.to_string(),
                input_preview: "".to_string(),
            });
        }

        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            SerializationError::json_deserialization_failed(
                format!("Invalid JSON syntax: {}", e),
                document_type,
                json,
            )
        })?;

        let version = value
            .get("schema_version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| SerializationError::MissingRequiredField {
                field_name: "schema_version".to_string(),
                document_type: document_type.to_string(),
            })?;

        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if !self.supported_versions.contains(&version) {
            return Err(SerializationError::SchemaVersionIncompatible {
                expected: *self.supported_versions.end(),
                actual: version,
                document_type: document_type.to_string(),
            });
        }

        Ok(value)
    }
}

impl Default for SnapshotSerializer {
    fn default() -> Self {
        Self::new()
    }
}
