// ==========================================
// 财务流水导入 - 交易导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 分类对账（落库）→ 物化 → 交易落库 → 清理源文件
// 说明: 分类与交易为两次独立提交，第二次失败时已提交的分类不回滚
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{CandidateRecord, Transaction};
use crate::importer::category_reconciler::CategoryReconciler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::record_parser::RecordParser;
use crate::importer::transaction_importer_trait::TransactionImporter;
use crate::importer::transaction_materializer::TransactionMaterializer;
use crate::repository::{CategoryRepository, TransactionRepository};
use futures::stream::{self, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 单次导入所需的配置快照
struct ImportSettings {
    parser: RecordParser,
    delete_source: bool,
}

// ==========================================
// TransactionImporterImpl - 交易导入器实现
// ==========================================
pub struct TransactionImporterImpl<C, T, K>
where
    C: CategoryRepository,
    T: TransactionRepository,
    K: ImportConfigReader,
{
    // 数据访问层
    category_repo: C,
    transaction_repo: T,

    // 配置读取器
    config: K,
}

impl<C, T, K> TransactionImporterImpl<C, T, K>
where
    C: CategoryRepository,
    T: TransactionRepository,
    K: ImportConfigReader,
{
    /// 创建新的 TransactionImporter 实例
    ///
    /// # 参数
    /// - category_repo: 分类仓储
    /// - transaction_repo: 交易仓储
    /// - config: 配置读取器
    pub fn new(category_repo: C, transaction_repo: T, config: K) -> Self {
        Self {
            category_repo,
            transaction_repo,
            config,
        }
    }

    pub fn category_repo(&self) -> &C {
        &self.category_repo
    }

    pub fn transaction_repo(&self) -> &T {
        &self.transaction_repo
    }

    async fn load_settings(&self) -> ImportResult<ImportSettings> {
        let policy = self.config.get_malformed_row_policy().await?;
        let delimiter = self.config.get_delimiter().await?;
        let delete_source = self.config.get_delete_source_on_success().await?;

        Ok(ImportSettings {
            parser: RecordParser::new(delimiter, policy),
            delete_source,
        })
    }

    /// 读取源文件并全量解析为候选记录
    async fn read_candidates(
        &self,
        path: &Path,
        parser: &RecordParser,
    ) -> ImportResult<Vec<CandidateRecord>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImportError::FileNotFound(path.display().to_string()),
            _ => ImportError::FileReadError(format!("{}: {}", path.display(), e)),
        })?;

        let mut records = parser.parse(bytes.as_slice());
        let candidates = records
            .by_ref()
            .collect::<ImportResult<Vec<CandidateRecord>>>()?;

        info!(
            rows = candidates.len(),
            skipped = records.skipped_rows(),
            policy = parser.policy().as_str(),
            "文件解析完成"
        );
        Ok(candidates)
    }

    /// 删除源文件（失败仅告警）
    async fn release_source(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "源文件已删除"),
            Err(e) => warn!(path = %path.display(), error = %e, "源文件删除失败，导入结果不受影响"),
        }
    }
}

#[async_trait::async_trait]
impl<C, T, K> TransactionImporter for TransactionImporterImpl<C, T, K>
where
    C: CategoryRepository + Send + Sync,
    T: TransactionRepository + Send + Sync,
    K: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, source_path), fields(import_id))]
    async fn import_transactions<P: AsRef<Path> + Send>(
        &self,
        source_path: P,
    ) -> ImportResult<Vec<Transaction>> {
        let start_time = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());

        let path: PathBuf = source_path.as_ref().to_path_buf();
        info!(path = %path.display(), "开始导入交易流水");

        let settings = self.load_settings().await?;

        // === 步骤 1: 读取并解析 ===
        debug!("步骤 1: 读取并解析文件");
        let candidates = self.read_candidates(&path, &settings.parser).await?;

        // === 步骤 2: 分类对账 ===
        debug!("步骤 2: 分类对账");
        let lookup = CategoryReconciler::new(&self.category_repo)
            .reconcile(&candidates)
            .await?;

        // === 步骤 3: 交易物化 ===
        debug!("步骤 3: 交易物化");
        let drafts = TransactionMaterializer::new(&lookup).materialize(&candidates)?;
        let transactions = self.transaction_repo.create_transactions(drafts);

        // === 步骤 4: 交易落库 ===
        debug!("步骤 4: 交易批量落库");
        self.transaction_repo.save_transactions(&transactions).await?;

        // === 步骤 5: 清理源文件 ===
        if settings.delete_source {
            self.release_source(&path).await;
        }

        info!(
            transactions = transactions.len(),
            created_categories = lookup.created().len(),
            reused_categories = lookup.reused_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "交易流水导入完成"
        );

        Ok(transactions)
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        source_paths: Vec<P>,
    ) -> Vec<ImportResult<Vec<Transaction>>> {
        info!(count = source_paths.len(), "开始批量导入文件");

        let results: Vec<ImportResult<Vec<Transaction>>> = stream::iter(source_paths)
            .then(|path| self.import_transactions(path))
            .collect()
            .await;

        for (idx, result) in results.iter().enumerate() {
            if let Err(e) = result {
                error!(file_index = idx, error = %e, "文件导入失败");
            }
        }

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
