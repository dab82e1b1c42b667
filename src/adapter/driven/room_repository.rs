use crate::adapter::driven::json_file::JsonFile;
use crate::adapter::storage_error::StorageError;
use crate::domain::model::Room;
use crate::domain::port::{RepositoryError, RoomRepository};
use crate::domain::serialization::SnapshotSerializer;
use async_trait::async_trait;
use std::path::PathBuf;

/// JSONファイル客室リポジトリ
/// 客室カタログをバージョン付きJSON文書として保存する
pub struct JsonRoomRepository {
    file: JsonFile,
    serializer: SnapshotSerializer,
}

impl JsonRoomRepository {
    /// 新しいJSONファイル客室リポジトリを作成
    ///
    /// # Arguments
    /// * `path` - 客室ファイルのパス
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            serializer: SnapshotSerializer::new(),
        }
    }
}

#[async_trait]
impl RoomRepository for JsonRoomRepository {
    async fn load_rooms(&self) -> Result<Option<Vec<Room>>, RepositoryError> {
        let Some(content) = self.file.read().await? else {
            return Ok(None);
        };

        let rooms = self
            .serializer
            .deserialize_rooms(&content)
            .map_err(StorageError::from)?;
        Ok(Some(rooms))
    }

    async fn save_rooms(&self, rooms: &[Room]) -> Result<(), RepositoryError> {
        let json = self
            .serializer
            .serialize_rooms(rooms)
            .map_err(StorageError::from)?;
        self.file.write(&json).await?;
        Ok(())
    }
}
