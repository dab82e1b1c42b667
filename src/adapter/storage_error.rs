use crate::domain::port::RepositoryError;
use crate::domain::serialization::SerializationError;

/// ストレージエラー型
/// ファイル操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// ファイルの読み込みエラー
    ReadError(String),
    /// ファイルの書き込みエラー
    WriteError(String),
    /// ファイル内容の解釈エラー
    FormatError(String),
    /// 未対応のスキーマバージョン
    VersionError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ReadError(msg) => write!(f, "Storage read error: {}", msg),
            StorageError::WriteError(msg) => write!(f, "Storage write error: {}", msg),
            StorageError::FormatError(msg) => write!(f, "Storage format error: {}", msg),
            StorageError::VersionError(msg) => write!(f, "Storage version error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<SerializationError> for StorageError {
    fn from(err: SerializationError) -> Self {
        match err {
            SerializationError::SchemaVersionIncompatible { .. } => {
                StorageError::VersionError(err.to_string())
            }
            _ => StorageError::FormatError(err.to_string()),
        }
    }
}

/// StorageErrorからRepositoryErrorへの変換
impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReadError(msg) => RepositoryError::ReadFailed(msg),
            StorageError::WriteError(msg) => RepositoryError::WriteFailed(msg),
            StorageError::FormatError(msg) => RepositoryError::Corrupted(msg),
            StorageError::VersionError(msg) => RepositoryError::Incompatible(msg),
        }
    }
}
