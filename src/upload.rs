// ==========================================
// 财务流水导入 - 上传文件接收
// ==========================================
// 职责: 将上传内容落盘到临时目录，返回文件路径供导入器读取
// 命名: <随机十六进制>-<原始文件名>，避免覆盖
// ==========================================

use crate::config::ImportConfigReader;
use crate::importer::error::{ImportError, ImportResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

/// 原始文件名缺失时使用的名称
const FALLBACK_FILE_NAME: &str = "upload.csv";

pub struct UploadDirectory {
    root: PathBuf,
}

impl UploadDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 按配置的上传目录创建
    pub async fn from_config<K: ImportConfigReader + ?Sized>(config: &K) -> ImportResult<Self> {
        Ok(Self::new(config.get_upload_dir().await?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 生成不可预测的落盘文件名（仅保留原始名称的最后一段）
    pub fn unique_file_name(original_name: &str) -> String {
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .unwrap_or(FALLBACK_FILE_NAME);

        format!("{}-{}", Uuid::new_v4().simple(), base)
    }

    /// 保存上传内容
    ///
    /// # 返回
    /// - Ok(PathBuf): 落盘后的完整路径
    /// - Err: 目录创建/文件写入失败
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> ImportResult<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(Self::unique_file_name(original_name));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| ImportError::FileReadError(format!("{}: {}", path.display(), e)))?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!(path = %path.display(), size = bytes.len(), "上传文件已保存");
        Ok(path)
    }

    /// 将本地文件复制到上传目录（原文件不动）
    ///
    /// # 说明
    /// - 导入成功后删除的是副本，调用方的原始文件保留
    pub async fn stage_file(&self, source: &Path) -> ImportResult<PathBuf> {
        let bytes = tokio::fs::read(source).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImportError::FileNotFound(source.display().to_string()),
            _ => ImportError::FileReadError(format!("{}: {}", source.display(), e)),
        })?;

        let original_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.store(&original_name, &bytes).await
    }
}
