// ==========================================
// 内存仓储实现 - 用于集成测试
// ==========================================
// 特性:
// - 与 SQLite 实现一致的约束（分类名唯一、交易外键）
// - 故障注入（读失败 / 分类写失败 / 交易写失败）
// - 调用计数与批次记录，便于断言“无写入”
// ==========================================

use async_trait::async_trait;
use ledger_import::domain::{Category, Transaction};
use ledger_import::repository::{
    CategoryRepository, RepositoryError, RepositoryResult, TransactionRepository,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// 故障注入开关
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    pub fail_category_read: bool,
    pub fail_category_write: bool,
    pub fail_transaction_write: bool,
    /// 交易提交前删除该文件（模拟源文件被外部提前清理）
    pub remove_before_transaction_commit: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct StoreState {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    faults: FaultPlan,
    find_calls: usize,
    category_batches: Vec<usize>,
    transaction_batches: Vec<usize>,
}

/// 内存仓储（Clone 共享同一份状态）
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置已存在的分类
    pub fn with_categories(titles: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            for title in titles {
                state.categories.push(Category::new(*title));
            }
        }
        store
    }

    pub fn set_faults(&self, faults: FaultPlan) {
        self.lock().faults = faults;
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn category_by_title(&self, title: &str) -> Option<Category> {
        self.lock()
            .categories
            .iter()
            .find(|c| c.title == title)
            .cloned()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    pub fn find_calls(&self) -> usize {
        self.lock().find_calls
    }

    /// 每次 save_categories 调用的批次大小
    pub fn category_batches(&self) -> Vec<usize> {
        self.lock().category_batches.clone()
    }

    /// 每次 save_transactions 调用的批次大小
    pub fn transaction_batches(&self) -> Vec<usize> {
        self.lock().transaction_batches.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("内存仓储锁中毒")
    }
}

#[async_trait]
impl CategoryRepository for MemoryLedgerStore {
    async fn find_by_titles(&self, titles: &HashSet<String>) -> RepositoryResult<Vec<Category>> {
        let mut state = self.lock();
        state.find_calls += 1;
        if state.faults.fail_category_read {
            return Err(RepositoryError::DatabaseQueryError("模拟读失败".to_string()));
        }

        Ok(state
            .categories
            .iter()
            .filter(|c| titles.contains(&c.title))
            .cloned()
            .collect())
    }

    fn create_categories(&self, titles: &[String]) -> Vec<Category> {
        titles.iter().map(Category::new).collect()
    }

    async fn save_categories(&self, categories: &[Category]) -> RepositoryResult<()> {
        let mut state = self.lock();
        state.category_batches.push(categories.len());
        if state.faults.fail_category_write {
            return Err(RepositoryError::DatabaseTransactionError("模拟分类写失败".to_string()));
        }

        // 整批校验通过后再写入
        let mut titles: HashSet<&str> = state.categories.iter().map(|c| c.title.as_str()).collect();
        for category in categories {
            if !titles.insert(category.title.as_str()) {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "category.title: {}",
                    category.title
                )));
            }
        }

        state.categories.extend(categories.iter().cloned());
        Ok(())
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl TransactionRepository for MemoryLedgerStore {
    async fn save_transactions(&self, transactions: &[Transaction]) -> RepositoryResult<()> {
        let mut state = self.lock();
        state.transaction_batches.push(transactions.len());

        if let Some(path) = state.faults.remove_before_transaction_commit.take() {
            let _ = std::fs::remove_file(path);
        }
        if state.faults.fail_transaction_write {
            return Err(RepositoryError::DatabaseTransactionError("模拟交易写失败".to_string()));
        }

        let known: HashSet<&str> = state.categories.iter().map(|c| c.category_id.as_str()).collect();
        if let Some(orphan) = transactions.iter().find(|t| !known.contains(t.category_id.as_str())) {
            return Err(RepositoryError::ForeignKeyViolation(format!(
                "ledger_transaction.category_id: {}",
                orphan.category_id
            )));
        }

        state.transactions.extend(transactions.iter().cloned());
        Ok(())
    }

    async fn list_transactions(&self) -> RepositoryResult<Vec<Transaction>> {
        Ok(self.lock().transactions.clone())
    }

    async fn count_transactions(&self) -> RepositoryResult<usize> {
        Ok(self.lock().transactions.len())
    }
}
