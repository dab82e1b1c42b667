use crate::adapter::storage_error::StorageError;
use std::io::ErrorKind;
use std::path::PathBuf;

/// JSONファイルの読み書き
/// 書き込みは一時ファイルに書いてから置き換えるため、途中で失敗しても元のファイルは残る
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ファイルを読み込む
    ///
    /// # Returns
    /// * `Ok(Some(String))` - ファイルの内容
    /// * `Ok(None)` - ファイルが存在しない
    /// * `Err(StorageError)` - 読み込みに失敗
    pub async fn read(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError(format!(
                "{} の読み込みに失敗しました: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// ファイル全体を置き換える
    /// 親ディレクトリが存在しない場合は作成する
    pub async fn write(&self, content: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteError(format!(
                    "{} の作成に失敗しました: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, content).await.map_err(|e| {
            StorageError::WriteError(format!(
                "{} の書き込みに失敗しました: {}",
                tmp_path.display(),
                e
            ))
        })?;

        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StorageError::WriteError(format!(
                "{} の置き換えに失敗しました: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
