// ==========================================
// 财务流水导入 - 交易导入 Trait
// ==========================================
// 职责: 定义导入主接口（不包含实现）
// ==========================================

use crate::domain::Transaction;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// TransactionImporter Trait
// ==========================================
// 实现者: TransactionImporterImpl
#[async_trait]
pub trait TransactionImporter: Send + Sync {
    /// 从分隔文本文件导入交易流水
    ///
    /// # 参数
    /// - source_path: 源文件路径（首行为表头）
    ///
    /// # 返回
    /// - Ok(Vec<Transaction>): 已落库的交易，顺序与文件数据行一致
    /// - Err: 任一阶段失败（此时源文件保留，便于排查/重试）
    ///
    /// # 导入流程（5个阶段）
    /// 1. 读取并解析文件（全量读入）
    /// 2. 分类对账（一次查询 + 一次批量写入）
    /// 3. 交易物化（绑定分类）
    /// 4. 交易批量落库
    /// 5. 删除源文件（失败仅告警，不影响结果）
    async fn import_transactions<P: AsRef<Path> + Send>(
        &self,
        source_path: P,
    ) -> ImportResult<Vec<Transaction>>;

    /// 批量导入多个文件（严格串行）
    ///
    /// # 返回
    /// - 每个文件一个结果，顺序与入参一致
    ///
    /// # 说明
    /// - 串行执行，避免同进程内两次导入竞争创建同名分类
    /// - 某个文件失败不影响后续文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        source_paths: Vec<P>,
    ) -> Vec<ImportResult<Vec<Transaction>>>;
}
