// ==========================================
// 财务流水导入 - 交易 Repository Trait
// ==========================================
// 职责: 定义交易流水数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{NewTransaction, Transaction};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// TransactionRepository Trait
// ==========================================
// 实现者: LedgerRepositoryImpl（rusqlite）/ 测试内存实现
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// 由草稿构造未落库的交易（纯内存操作，保持顺序）
    fn create_transactions(&self, drafts: Vec<NewTransaction>) -> Vec<Transaction> {
        drafts.into_iter().map(Transaction::from).collect()
    }

    /// 批量保存交易（单事务，全部成功或全部回滚）
    ///
    /// # 说明
    /// - 空列表为 no-op
    /// - category_id 必须指向已落库的分类，否则返回外键约束错误
    async fn save_transactions(&self, transactions: &[Transaction]) -> RepositoryResult<()>;

    /// 列出全部交易（按写入顺序）
    async fn list_transactions(&self) -> RepositoryResult<Vec<Transaction>>;

    /// 统计交易数量
    async fn count_transactions(&self) -> RepositoryResult<usize>;
}
