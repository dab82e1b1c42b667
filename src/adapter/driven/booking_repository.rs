use crate::adapter::driven::json_file::JsonFile;
use crate::adapter::storage_error::StorageError;
use crate::domain::model::Booking;
use crate::domain::port::{BookingRepository, RepositoryError};
use crate::domain::serialization::SnapshotSerializer;
use async_trait::async_trait;
use std::path::PathBuf;

/// JSONファイル予約リポジトリ
/// 予約台帳全体を1つのJSON文書として保存する
pub struct JsonBookingRepository {
    file: JsonFile,
    serializer: SnapshotSerializer,
}

impl JsonBookingRepository {
    /// 新しいJSONファイル予約リポジトリを作成
    ///
    /// # Arguments
    /// * `path` - 予約ファイルのパス
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            serializer: SnapshotSerializer::new(),
        }
    }
}

#[async_trait]
impl BookingRepository for JsonBookingRepository {
    async fn load_bookings(&self) -> Result<Vec<Booking>, RepositoryError> {
        // ファイルがなければ空の台帳
        let Some(content) = self.file.read().await? else {
            return Ok(Vec::new());
        };

        let bookings = self
            .serializer
            .deserialize_bookings(&content)
            .map_err(StorageError::from)?;
        Ok(bookings)
    }

    async fn save_bookings(&self, bookings: &[Booking]) -> Result<(), RepositoryError> {
        let json = self
            .serializer
            .serialize_bookings(bookings)
            .map_err(StorageError::from)?;
        self.file.write(&json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BookingId, GuestContact, RoomCatalog, StayPeriod};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("hotel-bookings-{}", Uuid::new_v4()))
            .join("bookings.json")
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty_ledger() {
        let repository = JsonBookingRepository::new(temp_path());
        assert!(repository.load_bookings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_ledger() {
        let path = temp_path();
        let repository = JsonBookingRepository::new(&path);
        let rooms = RoomCatalog::default_rooms();
        let first = Booking::confirm(
            BookingId::new(),
            &rooms[0],
            GuestContact::new("Alice", "a@x.com").unwrap(),
            StayPeriod::new(date("2024-01-01"), date("2024-01-03")).unwrap(),
        );
        let second = Booking::confirm(
            BookingId::new(),
            &rooms[1],
            GuestContact::new("Bob", "b@x.com").unwrap(),
            StayPeriod::new(date("2024-02-01"), date("2024-02-02")).unwrap(),
        );

        repository
            .save_bookings(&[first.clone(), second.clone()])
            .await
            .unwrap();
        assert_eq!(
            repository.load_bookings().await.unwrap(),
            vec![first.clone(), second]
        );

        repository.save_bookings(&[first.clone()]).await.unwrap();
        assert_eq!(repository.load_bookings().await.unwrap(), vec![first]);

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).unwrap();
        }
    }

    #[tokio::test]
    async fn test_unsupported_version_is_incompatible() {
        let path = temp_path();
        let dir = path.parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, r#"{"schema_version": 9, "bookings": []}"#).unwrap();

        let repository = JsonBookingRepository::new(&path);
        let result = repository.load_bookings().await;

        assert!(matches!(result, Err(RepositoryError::Incompatible(_))));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
