// ==========================================
// 财务流水导入 - 分类/交易 Repository 实现
// ==========================================
// 职责: 实现分类与交易数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 每个批量写入在单个 SQLite 事务内完成
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::{Category, Transaction, TransactionFlow};
use crate::repository::category_repo::CategoryRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::transaction_repo::TransactionRepository;
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 单条 IN 查询的最大参数个数（低于 SQLite 默认变量上限）
const TITLE_QUERY_CHUNK: usize = 500;

// ==========================================
// LedgerRepositoryImpl
// ==========================================
pub struct LedgerRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(format!("锁获取失败: {}", e)))
    }

    fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            category_id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
        let flow_raw: String = row.get(3)?;
        let flow = flow_raw.parse::<TransactionFlow>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        Ok(Transaction {
            transaction_id: row.get(0)?,
            title: row.get(1)?,
            value: row.get(2)?,
            flow,
            category_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

#[async_trait]
impl CategoryRepository for LedgerRepositoryImpl {
    async fn find_by_titles(&self, titles: &HashSet<String>) -> RepositoryResult<Vec<Category>> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        // 排序后分块查询，保证结果顺序稳定
        let mut sorted: Vec<&String> = titles.iter().collect();
        sorted.sort();

        let conn = self.lock()?;
        let mut categories = Vec::with_capacity(sorted.len());

        for chunk in sorted.chunks(TITLE_QUERY_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT category_id, title, created_at FROM category WHERE title IN ({}) ORDER BY title",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), Self::map_category)?;
            for row in rows {
                categories.push(row?);
            }
        }

        debug!(requested = titles.len(), found = categories.len(), "分类查询完成");
        Ok(categories)
    }

    fn create_categories(&self, titles: &[String]) -> Vec<Category> {
        titles.iter().map(Category::new).collect()
    }

    async fn save_categories(&self, categories: &[Category]) -> RepositoryResult<()> {
        if categories.is_empty() {
            return Ok(());
        }

        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(RepositoryError::from_write)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO category (category_id, title, created_at) VALUES (?1, ?2, ?3)")
                .map_err(RepositoryError::from_write)?;
            for category in categories {
                stmt.execute(params![
                    category.category_id,
                    category.title,
                    category.created_at,
                ])
                .map_err(RepositoryError::from_write)?;
            }
        }
        tx.commit().map_err(RepositoryError::from_write)?;

        debug!(count = categories.len(), "分类批量保存完成");
        Ok(())
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT category_id, title, created_at FROM category ORDER BY title")?;
        let categories = stmt
            .query_map([], Self::map_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

#[async_trait]
impl TransactionRepository for LedgerRepositoryImpl {
    async fn save_transactions(&self, transactions: &[Transaction]) -> RepositoryResult<()> {
        if transactions.is_empty() {
            return Ok(());
        }

        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(RepositoryError::from_write)?;
        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO ledger_transaction (
                        transaction_id, title, value, flow, category_id, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .map_err(RepositoryError::from_write)?;
            for transaction in transactions {
                stmt.execute(params![
                    transaction.transaction_id,
                    transaction.title,
                    transaction.value,
                    transaction.flow.as_str(),
                    transaction.category_id,
                    transaction.created_at,
                ])
                .map_err(RepositoryError::from_write)?;
            }
        }
        tx.commit().map_err(RepositoryError::from_write)?;

        debug!(count = transactions.len(), "交易批量保存完成");
        Ok(())
    }

    async fn list_transactions(&self) -> RepositoryResult<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT transaction_id, title, value, flow, category_id, created_at
            FROM ledger_transaction
            ORDER BY rowid
            "#,
        )?;
        let transactions = stmt
            .query_map([], Self::map_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    async fn count_transactions(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM ledger_transaction", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
