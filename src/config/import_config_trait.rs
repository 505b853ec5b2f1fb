// ==========================================
// 财务流水导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::MalformedRowPolicy;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::PathBuf;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取异常行处理策略
    ///
    /// # 默认值
    /// - reject
    async fn get_malformed_row_policy(&self) -> ImportResult<MalformedRowPolicy>;

    /// 获取字段分隔符（单字节 ASCII）
    ///
    /// # 默认值
    /// - ','
    async fn get_delimiter(&self) -> ImportResult<u8>;

    /// 获取上传临时目录
    ///
    /// # 默认值
    /// - <data_dir>/ledger-import/tmp
    async fn get_upload_dir(&self) -> ImportResult<PathBuf>;

    /// 导入成功后是否删除源文件
    ///
    /// # 默认值
    /// - true
    async fn get_delete_source_on_success(&self) -> ImportResult<bool>;
}
