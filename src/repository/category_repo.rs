// ==========================================
// 财务流水导入 - 分类 Repository Trait
// ==========================================
// 职责: 定义分类相关数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::Category;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// CategoryRepository Trait
// ==========================================
// 实现者: LedgerRepositoryImpl（rusqlite）/ 测试内存实现
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// 按名称集合查询已存在的分类
    ///
    /// # 参数
    /// - titles: 分类名称集合（精确匹配，区分大小写）
    ///
    /// # 返回
    /// - Ok(Vec<Category>): 已存在的分类（每个名称至多一条）
    /// - Err: 读失败
    async fn find_by_titles(&self, titles: &HashSet<String>) -> RepositoryResult<Vec<Category>>;

    /// 构造未落库的分类（纯内存操作，顺序与入参一致）
    fn create_categories(&self, titles: &[String]) -> Vec<Category>;

    /// 批量保存分类（单事务，全部成功或全部回滚）
    ///
    /// # 说明
    /// - 空列表为 no-op
    async fn save_categories(&self, categories: &[Category]) -> RepositoryResult<()>;

    /// 列出全部分类（按名称排序）
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}
