// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use ledger_import::config::ImportConfigReader;
use ledger_import::domain::MalformedRowPolicy;
use ledger_import::ImportResult;
use std::path::PathBuf;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub policy: MalformedRowPolicy,
    pub delimiter: u8,
    pub upload_dir: PathBuf,
    pub delete_source: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            policy: MalformedRowPolicy::Reject,
            delimiter: b',',
            upload_dir: std::env::temp_dir(),
            delete_source: true,
        }
    }
}

impl MockConfig {
    /// 异常行跳过
    pub fn skipping() -> Self {
        Self {
            policy: MalformedRowPolicy::Skip,
            ..Self::default()
        }
    }

    /// 导入后保留源文件
    pub fn keep_source() -> Self {
        Self {
            delete_source: false,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_malformed_row_policy(&self) -> ImportResult<MalformedRowPolicy> {
        Ok(self.policy)
    }

    async fn get_delimiter(&self) -> ImportResult<u8> {
        Ok(self.delimiter)
    }

    async fn get_upload_dir(&self) -> ImportResult<PathBuf> {
        Ok(self.upload_dir.clone())
    }

    async fn get_delete_source_on_success(&self) -> ImportResult<bool> {
        Ok(self.delete_source)
    }
}
